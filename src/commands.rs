// Copyright 2025 Cowboy AI, LLC.

//! Commands accepted by the template engine
//!
//! Commands carry raw input. Nothing is validated on construction; the
//! validator steps of the action pipelines decide what is acceptable.

use crate::identifiers::{ContributorId, ObservatoryId, OrganizationId, ThingId};
use crate::template::TemplateProperty;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Common surface of template commands
pub trait TemplateCommand: Debug + Send + Sync {
    /// Contributor issuing the command
    fn contributor_id(&self) -> ContributorId;

    /// Template the command targets, `None` for creation
    fn template_id(&self) -> Option<&ThingId>;

    /// Proposed property definitions, `None` meaning unchanged
    fn property_definitions(&self) -> Option<&[TemplatePropertyDefinition]>;
}

/// Definition of a resource valued property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourcePropertyDefinition {
    /// Property label
    pub label: String,
    /// Name shown for the input position
    pub placeholder: Option<String>,
    /// Free text description
    pub description: Option<String>,
    /// Minimum number of values
    pub min_count: Option<u32>,
    /// Maximum number of values
    pub max_count: Option<u32>,
    /// Positional predicate
    pub path: ThingId,
    /// Class constraint
    pub class: Option<ThingId>,
}

/// Definition of a literal valued property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LiteralPropertyDefinition {
    /// Property label
    pub label: String,
    /// Name shown for the input position
    pub placeholder: Option<String>,
    /// Free text description
    pub description: Option<String>,
    /// Minimum number of values
    pub min_count: Option<u32>,
    /// Maximum number of values
    pub max_count: Option<u32>,
    /// Positional predicate
    pub path: ThingId,
    /// Datatype constraint
    pub datatype: Option<ThingId>,
}

/// A proposed template property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplatePropertyDefinition {
    /// Resource valued position
    Resource(ResourcePropertyDefinition),
    /// Literal valued position
    Literal(LiteralPropertyDefinition),
}

impl TemplatePropertyDefinition {
    /// Property label
    pub fn label(&self) -> &str {
        match self {
            TemplatePropertyDefinition::Resource(d) => &d.label,
            TemplatePropertyDefinition::Literal(d) => &d.label,
        }
    }

    /// Placeholder, if declared
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            TemplatePropertyDefinition::Resource(d) => d.placeholder.as_deref(),
            TemplatePropertyDefinition::Literal(d) => d.placeholder.as_deref(),
        }
    }

    /// Positional predicate
    pub fn path(&self) -> &ThingId {
        match self {
            TemplatePropertyDefinition::Resource(d) => &d.path,
            TemplatePropertyDefinition::Literal(d) => &d.path,
        }
    }

    /// Minimum cardinality
    pub fn min_count(&self) -> Option<u32> {
        match self {
            TemplatePropertyDefinition::Resource(d) => d.min_count,
            TemplatePropertyDefinition::Literal(d) => d.min_count,
        }
    }

    /// Maximum cardinality
    pub fn max_count(&self) -> Option<u32> {
        match self {
            TemplatePropertyDefinition::Resource(d) => d.max_count,
            TemplatePropertyDefinition::Literal(d) => d.max_count,
        }
    }

    /// Whether at least one value is required
    pub fn is_required(&self) -> bool {
        self.min_count().is_some_and(|min| min > 0)
    }

    /// Whether this definition describes `property` exactly
    ///
    /// Kind and every declared field must agree; the property id is not part
    /// of a definition.
    pub fn matches(&self, property: &TemplateProperty) -> bool {
        match (self, property) {
            (TemplatePropertyDefinition::Resource(d), TemplateProperty::Resource(p)) => {
                d.label == p.label
                    && d.placeholder == p.placeholder
                    && d.description == p.description
                    && d.min_count == p.min_count
                    && d.max_count == p.max_count
                    && d.path == p.path
                    && d.class == p.class
            }
            (TemplatePropertyDefinition::Literal(d), TemplateProperty::Literal(p)) => {
                d.label == p.label
                    && d.placeholder == p.placeholder
                    && d.description == p.description
                    && d.min_count == p.min_count
                    && d.max_count == p.max_count
                    && d.path == p.path
                    && d.datatype == p.datatype
            }
            _ => false,
        }
    }
}

impl From<&TemplateProperty> for TemplatePropertyDefinition {
    fn from(property: &TemplateProperty) -> Self {
        match property {
            TemplateProperty::Resource(p) => {
                TemplatePropertyDefinition::Resource(ResourcePropertyDefinition {
                    label: p.label.clone(),
                    placeholder: p.placeholder.clone(),
                    description: p.description.clone(),
                    min_count: p.min_count,
                    max_count: p.max_count,
                    path: p.path.clone(),
                    class: p.class.clone(),
                })
            }
            TemplateProperty::Literal(p) => {
                TemplatePropertyDefinition::Literal(LiteralPropertyDefinition {
                    label: p.label.clone(),
                    placeholder: p.placeholder.clone(),
                    description: p.description.clone(),
                    min_count: p.min_count,
                    max_count: p.max_count,
                    path: p.path.clone(),
                    datatype: p.datatype.clone(),
                })
            }
        }
    }
}

/// Create a new rosetta stone template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CreateRosettaStoneTemplateCommand {
    /// Issuing contributor
    pub contributor_id: ContributorId,
    /// Template label
    pub label: String,
    /// Template description
    pub description: String,
    /// Label grammar, e.g. `{0} has value {1}`
    pub dynamic_label: String,
    /// Example sentence
    pub example_usage: Option<String>,
    /// Input positions in index order
    pub properties: Vec<TemplatePropertyDefinition>,
    /// Curating observatories
    #[serde(default)]
    pub observatories: Vec<ObservatoryId>,
    /// Curating organizations
    #[serde(default)]
    pub organizations: Vec<OrganizationId>,
}

impl TemplateCommand for CreateRosettaStoneTemplateCommand {
    fn contributor_id(&self) -> ContributorId {
        self.contributor_id
    }

    fn template_id(&self) -> Option<&ThingId> {
        None
    }

    fn property_definitions(&self) -> Option<&[TemplatePropertyDefinition]> {
        Some(&self.properties)
    }
}

/// Update an existing template; `None` fields stay unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateRosettaStoneTemplateCommand {
    /// Template to update
    pub template_id: ThingId,
    /// Issuing contributor
    pub contributor_id: ContributorId,
    /// New label
    #[serde(default)]
    pub label: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New label grammar
    #[serde(default)]
    pub dynamic_label: Option<String>,
    /// New example sentence
    #[serde(default)]
    pub example_usage: Option<String>,
    /// New input positions
    #[serde(default)]
    pub properties: Option<Vec<TemplatePropertyDefinition>>,
}

impl UpdateRosettaStoneTemplateCommand {
    /// An update that changes nothing
    pub fn new(template_id: ThingId, contributor_id: ContributorId) -> Self {
        Self {
            template_id,
            contributor_id,
            label: None,
            description: None,
            dynamic_label: None,
            example_usage: None,
            properties: None,
        }
    }
}

impl TemplateCommand for UpdateRosettaStoneTemplateCommand {
    fn contributor_id(&self) -> ContributorId {
        self.contributor_id
    }

    fn template_id(&self) -> Option<&ThingId> {
        Some(&self.template_id)
    }

    fn property_definitions(&self) -> Option<&[TemplatePropertyDefinition]> {
        self.properties.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::LiteralTemplateProperty;

    fn stored() -> TemplateProperty {
        TemplateProperty::Literal(LiteralTemplateProperty {
            id: ThingId::new("R7"),
            label: "value".to_string(),
            placeholder: Some("value".to_string()),
            description: Some("the value".to_string()),
            min_count: Some(1),
            max_count: None,
            path: ThingId::new("hasObjectPosition"),
            datatype: Some(ThingId::new("xsd:integer")),
        })
    }

    #[test]
    fn test_definition_from_property_matches() {
        let property = stored();
        let definition = TemplatePropertyDefinition::from(&property);
        assert!(definition.matches(&property));
    }

    #[test]
    fn test_changed_field_does_not_match() {
        let property = stored();
        let TemplatePropertyDefinition::Literal(mut definition) = TemplatePropertyDefinition::from(&property) else {
            panic!("expected literal definition");
        };
        definition.placeholder = Some("amount".to_string());
        assert!(!TemplatePropertyDefinition::Literal(definition).matches(&property));
    }

    #[test]
    fn test_kind_change_does_not_match() {
        let property = stored();
        let definition = TemplatePropertyDefinition::Resource(ResourcePropertyDefinition {
            label: "value".to_string(),
            placeholder: Some("value".to_string()),
            description: Some("the value".to_string()),
            min_count: Some(1),
            max_count: None,
            path: ThingId::new("hasObjectPosition"),
            class: None,
        });
        assert!(!definition.matches(&property));
    }

    fn summary<C: TemplateCommand>(command: &C) -> (Option<String>, Option<usize>) {
        (
            command.template_id().map(ToString::to_string),
            command.property_definitions().map(<[_]>::len),
        )
    }

    #[test]
    fn test_commands_share_a_common_surface() {
        let contributor = ContributorId::new();
        let create = CreateRosettaStoneTemplateCommand {
            contributor_id: contributor,
            label: "measurement".to_string(),
            description: "a measured value".to_string(),
            dynamic_label: "{0} has value {1}".to_string(),
            example_usage: None,
            properties: vec![TemplatePropertyDefinition::from(&stored())],
            observatories: vec![],
            organizations: vec![],
        };
        assert_eq!(create.contributor_id(), contributor);
        assert_eq!(summary(&create), (None, Some(1)));

        let mut update = UpdateRosettaStoneTemplateCommand::new(ThingId::new("R1"), contributor);
        assert_eq!(summary(&update), (Some("R1".to_string()), None));
        update.properties = Some(vec![]);
        assert_eq!(summary(&update), (Some("R1".to_string()), Some(0)));
    }

    #[test]
    fn test_update_command_deserializes_with_defaults() {
        let json = serde_json::json!({
            "template_id": "R1",
            "contributor_id": "00000000-0000-0000-0000-000000000000",
            "label": "new label"
        });
        let command: UpdateRosettaStoneTemplateCommand = serde_json::from_value(json).unwrap();
        assert_eq!(command.label.as_deref(), Some("new label"));
        assert!(command.properties.is_none());
        assert_eq!(command.template_id(), Some(&ThingId::new("R1")));
    }
}
