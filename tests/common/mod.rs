// Copyright 2025 Cowboy AI, LLC.

//! Shared fixtures for integration tests

#![allow(dead_code)]

use rosetta_templates::vocabulary::predicates;
use rosetta_templates::{
    ContributorId, CreateRosettaStoneTemplateCommand, InMemoryGraph, LiteralPropertyDefinition,
    ResourcePropertyDefinition, RosettaStoneTemplateService, TemplatePropertyDefinition, ThingId,
    UpdateRosettaStoneTemplateCommand,
};

pub fn subject(placeholder: &str) -> TemplatePropertyDefinition {
    TemplatePropertyDefinition::Resource(ResourcePropertyDefinition {
        label: placeholder.to_string(),
        placeholder: Some(placeholder.to_string()),
        description: None,
        min_count: Some(1),
        max_count: None,
        path: ThingId::new(predicates::HAS_SUBJECT_POSITION),
        class: None,
    })
}

pub fn literal_object(placeholder: &str, min_count: Option<u32>) -> TemplatePropertyDefinition {
    TemplatePropertyDefinition::Literal(LiteralPropertyDefinition {
        label: placeholder.to_string(),
        placeholder: Some(placeholder.to_string()),
        description: None,
        min_count,
        max_count: None,
        path: ThingId::new(predicates::HAS_OBJECT_POSITION),
        datatype: None,
    })
}

pub fn resource_object(placeholder: &str, min_count: Option<u32>) -> TemplatePropertyDefinition {
    TemplatePropertyDefinition::Resource(ResourcePropertyDefinition {
        label: placeholder.to_string(),
        placeholder: Some(placeholder.to_string()),
        description: None,
        min_count,
        max_count: None,
        path: ThingId::new(predicates::HAS_OBJECT_POSITION),
        class: None,
    })
}

/// The "has value" template: a subject and one required literal value
pub fn has_value_command() -> CreateRosettaStoneTemplateCommand {
    CreateRosettaStoneTemplateCommand {
        contributor_id: ContributorId::unknown(),
        label: "has value".to_string(),
        description: "a subject with a measured value".to_string(),
        dynamic_label: "{0} has value {1}".to_string(),
        example_usage: Some("The sample has value".to_string()),
        properties: vec![subject("subject"), literal_object("value", Some(1))],
        observatories: vec![],
        organizations: vec![],
    }
}

pub fn service() -> RosettaStoneTemplateService<InMemoryGraph> {
    RosettaStoneTemplateService::new(InMemoryGraph::new())
}

/// A created "has value" template that one statement already uses
pub fn template_in_use(service: &RosettaStoneTemplateService<InMemoryGraph>) -> ThingId {
    let id = service.create(has_value_command()).unwrap();
    service
        .graph()
        .record_instance(ContributorId::unknown(), &id)
        .unwrap();
    id
}

pub fn update(id: &ThingId) -> UpdateRosettaStoneTemplateCommand {
    UpdateRosettaStoneTemplateCommand::new(id.clone(), ContributorId::unknown())
}
