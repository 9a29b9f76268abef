// Copyright 2025 Cowboy AI, LLC.

//! Mapping between templates and graph statements
//!
//! A template is stored as a SHACL-like node shape:
//!
//! ```text
//! root (RosettaNodeShape)
//!  ├─ TemplateLabelFormat ─> "{0} has value {1}"
//!  ├─ description ─────────> "..."
//!  ├─ sh:property ─────────> property shape 0 (PropertyShape)
//!  │                          ├─ placeholder, description, sh:minCount, sh:maxCount
//!  │                          ├─ sh:path ─> hasSubjectPosition | hasObjectPosition
//!  │                          ├─ sh:nodeKind ─> "IRI" | "Literal"
//!  │                          └─ sh:class | sh:datatype
//!  ├─ sh:property ─────────> property shape 1 ...
//!  ├─ sh:targetClass ──────> target class ─ P110081, description
//!  └─ sh:closed ───────────> true
//! ```
//!
//! Property order is the order of the `sh:property` statements.

use crate::commands::TemplatePropertyDefinition;
use crate::config::TemplateEngineConfig;
use crate::dynamic_label::DynamicLabel;
use crate::errors::{TemplateError, TemplateResult};
use crate::graph::{CreateResource, GraphStatement, TemplateGraph, Thing};
use crate::identifiers::{ContributorId, ObservatoryId, OrganizationId, StatementId, ThingId};
use crate::template::{
    LiteralTemplateProperty, ResourceTemplateProperty, RosettaStoneTemplate, TemplateProperty,
};
use crate::vocabulary::{self, classes, datatypes, predicates, NODE_KIND_IRI, NODE_KIND_LITERAL};
use indexmap::IndexMap;
use tracing::debug;

/// Statements of a template bundle grouped by subject, in creation order
pub type StatementsBySubject = IndexMap<ThingId, Vec<GraphStatement>>;

/// Reads and writes the graph encoding of templates
pub struct GraphProjector<'g, G: TemplateGraph + ?Sized> {
    graph: &'g G,
    config: &'g TemplateEngineConfig,
}

impl<'g, G: TemplateGraph + ?Sized> GraphProjector<'g, G> {
    /// Projector over a graph
    pub fn new(graph: &'g G, config: &'g TemplateEngineConfig) -> Self {
        Self { graph, config }
    }

    fn attach_literal(
        &self,
        contributor_id: ContributorId,
        subject: &ThingId,
        predicate: &str,
        value: &str,
        datatype: &str,
    ) -> TemplateResult<StatementId> {
        let literal = self.graph.create_literal(contributor_id, value, datatype)?;
        self.graph
            .create_statement(contributor_id, subject, &vocabulary::id(predicate), &literal)
    }

    fn link(
        &self,
        contributor_id: ContributorId,
        subject: &ThingId,
        predicate: &str,
        object: &ThingId,
    ) -> TemplateResult<StatementId> {
        self.graph
            .create_statement(contributor_id, subject, &vocabulary::id(predicate), object)
    }

    // ---------------------------------------------------------------------
    // Create side
    // ---------------------------------------------------------------------

    /// Mint the template root
    pub fn create_root(
        &self,
        contributor_id: ContributorId,
        label: &str,
        observatory_id: ObservatoryId,
        organization_id: OrganizationId,
    ) -> TemplateResult<ThingId> {
        let request = CreateResource::new(
            contributor_id,
            label,
            vocabulary::id(classes::ROSETTA_NODE_SHAPE),
        )
        .curated_by(observatory_id, organization_id);
        self.graph.create_resource(request)
    }

    /// Attach the label grammar to the root
    pub fn create_formatted_label(
        &self,
        contributor_id: ContributorId,
        root: &ThingId,
        dynamic_label: &str,
    ) -> TemplateResult<StatementId> {
        self.attach_literal(
            contributor_id,
            root,
            predicates::TEMPLATE_LABEL_FORMAT,
            dynamic_label,
            datatypes::XSD_STRING,
        )
    }

    /// Create a property shape and attach it as the next property of the root
    pub fn create_property(
        &self,
        contributor_id: ContributorId,
        root: &ThingId,
        index: usize,
        property: &TemplatePropertyDefinition,
    ) -> TemplateResult<ThingId> {
        let shape = self.graph.create_resource(CreateResource::new(
            contributor_id,
            property.label(),
            vocabulary::id(classes::PROPERTY_SHAPE),
        ))?;
        debug!(%root, %shape, index, "creating property shape");

        if let Some(placeholder) = property.placeholder() {
            self.attach_literal(contributor_id, &shape, predicates::PLACEHOLDER, placeholder, datatypes::XSD_STRING)?;
        }

        let (description, node_kind, constraint) = match property {
            TemplatePropertyDefinition::Resource(d) => (
                d.description.as_deref(),
                NODE_KIND_IRI,
                d.class.as_ref().map(|class| (predicates::SH_CLASS, class)),
            ),
            TemplatePropertyDefinition::Literal(d) => (
                d.description.as_deref(),
                NODE_KIND_LITERAL,
                d.datatype.as_ref().map(|datatype| (predicates::SH_DATATYPE, datatype)),
            ),
        };

        if let Some(description) = description {
            self.attach_literal(contributor_id, &shape, predicates::DESCRIPTION, description, datatypes::XSD_STRING)?;
        }
        if let Some(min) = property.min_count() {
            self.attach_literal(contributor_id, &shape, predicates::SH_MIN_COUNT, &min.to_string(), datatypes::XSD_INT)?;
        }
        if let Some(max) = property.max_count() {
            self.attach_literal(contributor_id, &shape, predicates::SH_MAX_COUNT, &max.to_string(), datatypes::XSD_INT)?;
        }
        self.link(contributor_id, &shape, predicates::SH_PATH, property.path())?;
        self.attach_literal(contributor_id, &shape, predicates::SH_NODE_KIND, node_kind, datatypes::XSD_STRING)?;
        if let Some((predicate, class)) = constraint {
            self.link(contributor_id, &shape, predicate, class)?;
        }

        self.link(contributor_id, root, predicates::SH_PROPERTY, &shape)?;
        Ok(shape)
    }

    /// Create the target class with its description and example usage
    pub fn create_target_class(
        &self,
        contributor_id: ContributorId,
        root: &ThingId,
        label: &str,
        description: &str,
        example_usage: Option<&str>,
    ) -> TemplateResult<ThingId> {
        let class = self.graph.create_class(contributor_id, label)?;
        self.link(contributor_id, root, predicates::SH_TARGET_CLASS, &class)?;

        self.attach_literal(contributor_id, root, predicates::DESCRIPTION, description, datatypes::XSD_STRING)?;
        self.attach_literal(contributor_id, &class, predicates::DESCRIPTION, description, datatypes::XSD_STRING)?;
        if let Some(example_usage) = example_usage {
            self.attach_literal(
                contributor_id,
                &class,
                predicates::EXAMPLE_OF_USAGE,
                example_usage,
                datatypes::XSD_STRING,
            )?;
        }

        self.graph.attach_child(
            contributor_id,
            &vocabulary::id(classes::ROSETTA_STONE_STATEMENT),
            &class,
        )?;
        Ok(class)
    }

    /// Mark the template as closed
    pub fn create_closed_marker(
        &self,
        contributor_id: ContributorId,
        root: &ThingId,
    ) -> TemplateResult<StatementId> {
        self.attach_literal(contributor_id, root, predicates::SH_CLOSED, "true", datatypes::XSD_BOOLEAN)
    }

    // ---------------------------------------------------------------------
    // Update side
    // ---------------------------------------------------------------------

    /// Replace every `predicate` literal of `subject` with a single new one
    pub fn replace_literal(
        &self,
        contributor_id: ContributorId,
        statements: &StatementsBySubject,
        subject: &ThingId,
        predicate: &str,
        value: &str,
    ) -> TemplateResult<StatementId> {
        let stale: Vec<StatementId> = outgoing(statements, subject, predicate)
            .map(|s| s.id.clone())
            .collect();
        self.graph.delete_statements(&stale)?;
        self.attach_literal(contributor_id, subject, predicate, value, datatypes::XSD_STRING)
    }

    /// Remove a property shape, its statements and its link from the root
    pub fn delete_property(
        &self,
        statements: &StatementsBySubject,
        root: &ThingId,
        property: &ThingId,
    ) -> TemplateResult<()> {
        let mut doomed: Vec<StatementId> = outgoing(statements, root, predicates::SH_PROPERTY)
            .filter(|s| s.object.id() == property)
            .map(|s| s.id.clone())
            .collect();
        if let Some(own) = statements.get(property) {
            doomed.extend(own.iter().map(|s| s.id.clone()));
        }
        debug!(%root, %property, statements = doomed.len(), "deleting property shape");
        self.graph.delete_statements(&doomed)?;
        self.graph.delete_resource(property)
    }

    // ---------------------------------------------------------------------
    // Read side
    // ---------------------------------------------------------------------

    /// Load the template rooted at `id` together with its statement bundle
    pub fn load(&self, id: &ThingId) -> TemplateResult<(RosettaStoneTemplate, StatementsBySubject)> {
        let root = self
            .graph
            .find_resource(id)?
            .filter(|r| r.classes.contains(&vocabulary::id(classes::ROSETTA_NODE_SHAPE)))
            .ok_or_else(|| TemplateError::RosettaStoneTemplateNotFound(id.clone()))?;

        let mut statements = StatementsBySubject::new();
        for statement in self.graph.fetch_bundle(id, self.config.subgraph_max_level)? {
            statements
                .entry(statement.subject.id().clone())
                .or_default()
                .push(statement);
        }

        let dynamic_label = literal_value(&statements, id, predicates::TEMPLATE_LABEL_FORMAT)
            .ok_or_else(|| malformed(id, "formatted label"))
            .and_then(DynamicLabel::parse)?;
        let description = literal_value(&statements, id, predicates::DESCRIPTION).map(str::to_string);
        let target_class = outgoing(&statements, id, predicates::SH_TARGET_CLASS)
            .next()
            .map(|s| s.object.id().clone())
            .ok_or_else(|| malformed(id, "target class"))?;
        let example_usage = literal_value(&statements, &target_class, predicates::EXAMPLE_OF_USAGE)
            .map(str::to_string);

        let properties = outgoing(&statements, id, predicates::SH_PROPERTY)
            .map(|s| decode_property(&statements, &s.object))
            .collect::<TemplateResult<Vec<_>>>()?;

        let template = RosettaStoneTemplate {
            id: root.id.clone(),
            label: root.label.clone(),
            description,
            dynamic_label,
            example_usage,
            target_class,
            properties,
            observatories: known(root.observatory_id, ObservatoryId::unknown()),
            organizations: known(root.organization_id, OrganizationId::unknown()),
            created_at: root.created_at,
            created_by: root.created_by,
            modifiable: root.modifiable,
        };
        Ok((template, statements))
    }
}

fn known<T: PartialEq>(id: T, unknown: T) -> Vec<T> {
    if id == unknown {
        Vec::new()
    } else {
        vec![id]
    }
}

fn malformed(id: &ThingId, missing: &str) -> TemplateError {
    TemplateError::MalformedGraph(format!("template {id} has no {missing}"))
}

/// Statements of `subject` with the given predicate, in creation order
pub fn outgoing<'s>(
    statements: &'s StatementsBySubject,
    subject: &ThingId,
    predicate: &str,
) -> impl Iterator<Item = &'s GraphStatement> + 's {
    let predicate = vocabulary::id(predicate);
    statements
        .get(subject)
        .into_iter()
        .flatten()
        .filter(move |s| s.predicate == predicate)
}

fn literal_value<'s>(
    statements: &'s StatementsBySubject,
    subject: &ThingId,
    predicate: &str,
) -> Option<&'s str> {
    outgoing(statements, subject, predicate)
        .find_map(|s| s.object.as_literal())
        .map(|l| l.value.as_str())
}

fn count(statements: &StatementsBySubject, shape: &ThingId, predicate: &str) -> TemplateResult<Option<u32>> {
    literal_value(statements, shape, predicate)
        .map(|value| {
            value.parse::<u32>().map_err(|_| {
                TemplateError::MalformedGraph(format!("{predicate} of {shape} is not a count: {value}"))
            })
        })
        .transpose()
}

fn decode_property(statements: &StatementsBySubject, object: &Thing) -> TemplateResult<TemplateProperty> {
    let shape = object
        .as_resource()
        .ok_or_else(|| TemplateError::MalformedGraph(format!("property {} is not a resource", object.id())))?;
    let id = &shape.id;

    let placeholder = literal_value(statements, id, predicates::PLACEHOLDER).map(str::to_string);
    let description = literal_value(statements, id, predicates::DESCRIPTION).map(str::to_string);
    let min_count = count(statements, id, predicates::SH_MIN_COUNT)?;
    let max_count = count(statements, id, predicates::SH_MAX_COUNT)?;
    let path = outgoing(statements, id, predicates::SH_PATH)
        .next()
        .map(|s| s.object.id().clone())
        .ok_or_else(|| TemplateError::MalformedGraph(format!("property {id} has no path")))?;
    let reference = |predicate: &str| {
        outgoing(statements, id, predicate)
            .next()
            .map(|s| s.object.id().clone())
    };

    Ok(match literal_value(statements, id, predicates::SH_NODE_KIND) {
        Some(NODE_KIND_LITERAL) => TemplateProperty::Literal(LiteralTemplateProperty {
            id: id.clone(),
            label: shape.label.clone(),
            placeholder,
            description,
            min_count,
            max_count,
            path,
            datatype: reference(predicates::SH_DATATYPE),
        }),
        _ => TemplateProperty::Resource(ResourceTemplateProperty {
            id: id.clone(),
            label: shape.label.clone(),
            placeholder,
            description,
            min_count,
            max_count,
            path,
            class: reference(predicates::SH_CLASS),
        }),
    })
}

/// Property shape ids referenced by `root`, in index order
pub fn property_ids(statements: &StatementsBySubject, root: &ThingId) -> Vec<ThingId> {
    outgoing(statements, root, predicates::SH_PROPERTY)
        .map(|s| s.object.id().clone())
        .collect()
}
