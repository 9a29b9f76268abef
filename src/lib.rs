// Copyright 2025 Cowboy AI, LLC.

//! # Rosetta Templates
//!
//! Definition, validation and safe evolution of Rosetta Stone statement
//! templates stored in a knowledge graph.
//!
//! A template describes how a multi-argument statement (a subject and one or
//! more object positions) is represented as graph triples, and how its
//! human-readable label is rendered from the filled-in values.
//!
//! This crate provides:
//! - **Label grammar**: parsing and rendering of dynamic labels such as
//!   `{0} travels [to {1}]`
//! - **Property validation**: subject/object position rules, cardinality and
//!   existence checks against the graph
//! - **Compatibility engine**: which changes are legal once statements have
//!   been authored from a template
//! - **Action pipelines**: ordered validator and mutator steps for create and
//!   update commands
//! - **Graph projection**: the node shape encoding of templates, both ways
//!
//! ## Design Principles
//!
//! 1. **Ports, not storage**: the engine talks to the graph through small
//!    synchronous traits; [`InMemoryGraph`] is a complete in-process adapter
//! 2. **Fail fast**: every step either returns the next state or exactly one
//!    [`TemplateError`]
//! 3. **Positional properties**: the index of a property is its identity in
//!    the label grammar and is encoded by statement order
//! 4. **Append-only evolution**: a template in use may only grow
//!
//! ## Example
//!
//! ```rust
//! use rosetta_templates::{
//!     ContributorId, CreateRosettaStoneTemplateCommand, InMemoryGraph,
//!     LiteralPropertyDefinition, ResourcePropertyDefinition, RosettaStoneTemplateService,
//!     TemplatePropertyDefinition, ThingId,
//! };
//!
//! let service = RosettaStoneTemplateService::new(InMemoryGraph::new());
//! let id = service
//!     .create(CreateRosettaStoneTemplateCommand {
//!         contributor_id: ContributorId::new(),
//!         label: "measurement".to_string(),
//!         description: "a measured value".to_string(),
//!         dynamic_label: "{0} has value {1}".to_string(),
//!         example_usage: None,
//!         properties: vec![
//!             TemplatePropertyDefinition::Resource(ResourcePropertyDefinition {
//!                 label: "subject".to_string(),
//!                 placeholder: Some("subject".to_string()),
//!                 description: None,
//!                 min_count: Some(1),
//!                 max_count: None,
//!                 path: ThingId::new("hasSubjectPosition"),
//!                 class: None,
//!             }),
//!             TemplatePropertyDefinition::Literal(LiteralPropertyDefinition {
//!                 label: "value".to_string(),
//!                 placeholder: Some("value".to_string()),
//!                 description: None,
//!                 min_count: Some(1),
//!                 max_count: None,
//!                 path: ThingId::new("hasObjectPosition"),
//!                 datatype: None,
//!             }),
//!         ],
//!         observatories: vec![],
//!         organizations: vec![],
//!     })
//!     .unwrap();
//!
//! let template = service.find_by_id(&id).unwrap();
//! assert_eq!(template.properties.len(), 2);
//! ```

#![warn(missing_docs)]

mod actions;
mod commands;
mod compatibility;
mod config;
mod dynamic_label;
mod errors;
mod graph;
mod identifiers;
mod in_memory;
mod pipeline;
mod projector;
mod property_validator;
mod service;
mod template;
pub mod vocabulary;

pub use actions::{create_pipeline, update_pipeline, CreatePipeline, CreateState, UpdatePipeline, UpdateState};
pub use commands::{
    CreateRosettaStoneTemplateCommand, LiteralPropertyDefinition, ResourcePropertyDefinition,
    TemplateCommand, TemplatePropertyDefinition, UpdateRosettaStoneTemplateCommand,
};
pub use compatibility::{CompatibilityEngine, TemplateUsage};
pub use config::{TemplateEngineConfig, MAX_LABEL_LENGTH};
pub use dynamic_label::{DynamicLabel, LabelComponent};
pub use errors::{TemplateError, TemplateResult};
pub use graph::{
    Class, ClassHierarchy, CreateResource, GraphStatement, Literal, NoTransaction, Page,
    PageRequest, Predicate, Resource, StatementRepository, TemplateGraph, Thing, ThingLookup,
    ThingWriter, UnitOfWork,
};
pub use identifiers::{ContributorId, ObservatoryId, OrganizationId, StatementId, ThingId};
pub use in_memory::InMemoryGraph;
pub use pipeline::{ActionPipeline, Step};
pub use projector::{outgoing, property_ids, GraphProjector, StatementsBySubject};
pub use property_validator::PropertyValidator;
pub use service::RosettaStoneTemplateService;
pub use template::{
    LiteralTemplateProperty, ResourceTemplateProperty, RosettaStoneTemplate, TemplateProperty,
};
