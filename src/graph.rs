// Copyright 2025 Cowboy AI, LLC.

//! Graph model and the ports the template engine consumes
//!
//! The engine never talks to a storage engine directly. It needs four
//! capabilities, each a small synchronous trait:
//!
//! - [`ThingLookup`]: does a predicate, class or resource exist
//! - [`ThingWriter`]: mint resources, literals and classes
//! - [`StatementRepository`]: create, load and delete statements
//! - [`ClassHierarchy`]: attach a class below a parent class
//!
//! [`TemplateGraph`] bundles all four and is implemented automatically for
//! any adapter that provides them. [`UnitOfWork`] is the only transaction
//! seam; the engine itself never rolls back.

use crate::errors::TemplateResult;
use crate::identifiers::{ContributorId, ObservatoryId, OrganizationId, StatementId, ThingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A resource node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource id
    pub id: ThingId,
    /// Human readable label
    pub label: String,
    /// Classes the resource is an instance of
    pub classes: BTreeSet<ThingId>,
    /// Curating observatory
    pub observatory_id: ObservatoryId,
    /// Curating organization
    pub organization_id: OrganizationId,
    /// Contributor that created the resource
    pub created_by: ContributorId,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Whether the resource may be changed
    pub modifiable: bool,
}

/// A class node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Class id
    pub id: ThingId,
    /// Class label
    pub label: String,
}

/// A predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Predicate id
    pub id: ThingId,
    /// Predicate label
    pub label: String,
}

/// A typed literal value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    /// Literal id
    pub id: ThingId,
    /// Lexical value
    pub value: String,
    /// Datatype id, e.g. `xsd:string`
    pub datatype: String,
}

/// Any node that can appear at either end of a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_class", rename_all = "snake_case")]
pub enum Thing {
    /// Resource node
    Resource(Resource),
    /// Class node
    Class(Class),
    /// Predicate node
    Predicate(Predicate),
    /// Literal node
    Literal(Literal),
}

impl Thing {
    /// Id of the wrapped node
    pub fn id(&self) -> &ThingId {
        match self {
            Thing::Resource(r) => &r.id,
            Thing::Class(c) => &c.id,
            Thing::Predicate(p) => &p.id,
            Thing::Literal(l) => &l.id,
        }
    }

    /// Label of the wrapped node; the lexical value for literals
    pub fn label(&self) -> &str {
        match self {
            Thing::Resource(r) => &r.label,
            Thing::Class(c) => &c.label,
            Thing::Predicate(p) => &p.label,
            Thing::Literal(l) => &l.value,
        }
    }

    /// The literal, if this is one
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Thing::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// The resource, if this is one
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Thing::Resource(r) => Some(r),
            _ => None,
        }
    }
}

/// A subject, predicate, object edge with its endpoints resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatement {
    /// Statement id
    pub id: StatementId,
    /// Subject node
    pub subject: Thing,
    /// Predicate id
    pub predicate: ThingId,
    /// Object node
    pub object: Thing,
    /// Contributor that created the statement
    pub created_by: ContributorId,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Parameters for minting a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResource {
    /// Issuing contributor
    pub contributor_id: ContributorId,
    /// Resource label
    pub label: String,
    /// Classes of the new resource
    pub classes: BTreeSet<ThingId>,
    /// Curating observatory
    pub observatory_id: ObservatoryId,
    /// Curating organization
    pub organization_id: OrganizationId,
    /// Whether the resource may be changed later
    pub modifiable: bool,
}

impl CreateResource {
    /// A modifiable resource with one class and unknown curation groups
    pub fn new(contributor_id: ContributorId, label: impl Into<String>, class: ThingId) -> Self {
        Self {
            contributor_id,
            label: label.into(),
            classes: BTreeSet::from([class]),
            observatory_id: ObservatoryId::unknown(),
            organization_id: OrganizationId::unknown(),
            modifiable: true,
        }
    }

    /// Set the curation groups
    pub fn curated_by(mut self, observatory_id: ObservatoryId, organization_id: OrganizationId) -> Self {
        self.observatory_id = observatory_id;
        self.organization_id = organization_id;
        self
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number
    pub page: usize,
    /// Page size
    pub size: usize,
}

impl PageRequest {
    /// The first page of the given size
    pub fn first(size: usize) -> Self {
        Self { page: 0, size }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: usize,
}

impl<T> Page<T> {
    /// Whether the page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Existence lookups
#[cfg_attr(test, mockall::automock)]
pub trait ThingLookup {
    /// Find a predicate by id
    fn find_predicate(&self, id: &ThingId) -> TemplateResult<Option<Predicate>>;

    /// Find a class by id
    fn find_class(&self, id: &ThingId) -> TemplateResult<Option<Class>>;

    /// Find a resource by id
    fn find_resource(&self, id: &ThingId) -> TemplateResult<Option<Resource>>;
}

/// Node creation and maintenance
pub trait ThingWriter {
    /// Mint a resource
    fn create_resource(&self, request: CreateResource) -> TemplateResult<ThingId>;

    /// Mint a literal
    fn create_literal(
        &self,
        contributor_id: ContributorId,
        value: &str,
        datatype: &str,
    ) -> TemplateResult<ThingId>;

    /// Mint a class
    fn create_class(&self, contributor_id: ContributorId, label: &str) -> TemplateResult<ThingId>;

    /// Change the label of a resource
    fn update_resource_label(&self, id: &ThingId, label: &str) -> TemplateResult<()>;

    /// Change the label of a class
    fn update_class_label(&self, id: &ThingId, label: &str) -> TemplateResult<()>;

    /// Remove a resource; statements pointing at it are left untouched
    fn delete_resource(&self, id: &ThingId) -> TemplateResult<()>;
}

/// Statement storage
pub trait StatementRepository {
    /// Create a statement between existing things
    fn create_statement(
        &self,
        contributor_id: ContributorId,
        subject: &ThingId,
        predicate: &ThingId,
        object: &ThingId,
    ) -> TemplateResult<StatementId>;

    /// Every statement reachable from `root` within `max_level` hops, in
    /// creation order
    fn fetch_bundle(&self, root: &ThingId, max_level: usize) -> TemplateResult<Vec<GraphStatement>>;

    /// Statements authored from the given template
    fn find_instances(
        &self,
        template_id: &ThingId,
        page: PageRequest,
    ) -> TemplateResult<Page<StatementId>>;

    /// Delete statements by id; unknown ids are ignored
    fn delete_statements(&self, ids: &[StatementId]) -> TemplateResult<()>;
}

/// Class hierarchy maintenance
pub trait ClassHierarchy {
    /// Attach `child` below `parent`
    fn attach_child(
        &self,
        contributor_id: ContributorId,
        parent: &ThingId,
        child: &ThingId,
    ) -> TemplateResult<()>;
}

/// Everything the template engine needs from a graph store
pub trait TemplateGraph: ThingLookup + ThingWriter + StatementRepository + ClassHierarchy {}

impl<T> TemplateGraph for T where T: ThingLookup + ThingWriter + StatementRepository + ClassHierarchy {}

/// Transaction boundary around one pipeline run
///
/// Implementations decide what atomicity means for their store. The work
/// closure runs exactly once.
pub trait UnitOfWork {
    /// Run `work` inside a transaction
    fn run<T, F>(&self, work: F) -> TemplateResult<T>
    where
        F: FnOnce() -> TemplateResult<T>;
}

/// Runs work without any transaction
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransaction;

impl UnitOfWork for NoTransaction {
    fn run<T, F>(&self, work: F) -> TemplateResult<T>
    where
        F: FnOnce() -> TemplateResult<T>,
    {
        work()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TemplateError;

    #[test]
    fn test_thing_accessors() {
        let literal = Thing::Literal(Literal {
            id: ThingId::new("L1"),
            value: "42".to_string(),
            datatype: "xsd:integer".to_string(),
        });
        assert_eq!(literal.id().as_str(), "L1");
        assert_eq!(literal.label(), "42");
        assert!(literal.as_literal().is_some());
        assert!(literal.as_resource().is_none());
    }

    #[test]
    fn test_no_transaction_passes_result_through() {
        assert_eq!(NoTransaction.run(|| Ok(3)).unwrap(), 3);
        let err = NoTransaction
            .run::<(), _>(|| Err(TemplateError::Storage("boom".to_string())))
            .unwrap_err();
        assert_eq!(err, TemplateError::Storage("boom".to_string()));
    }

    #[test]
    fn test_create_resource_defaults() {
        let request = CreateResource::new(ContributorId::unknown(), "x", ThingId::new("C1"));
        assert!(request.modifiable);
        assert!(request.classes.contains(&ThingId::new("C1")));
        assert_eq!(request.observatory_id, ObservatoryId::unknown());
    }
}
