// Copyright 2025 Cowboy AI, LLC.

//! The rosetta stone template aggregate and its properties

use crate::dynamic_label::DynamicLabel;
use crate::identifiers::{ContributorId, ObservatoryId, OrganizationId, ThingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property whose values are resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTemplateProperty {
    /// Id of the property shape
    pub id: ThingId,
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
    /// Class the values must be instances of
    pub class: Option<ThingId>,
}

/// A property whose values are literals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralTemplateProperty {
    /// Id of the property shape
    pub id: ThingId,
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
    /// Datatype the values must have
    pub datatype: Option<ThingId>,
}

/// One input position of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateProperty {
    /// Resource valued position
    Resource(ResourceTemplateProperty),
    /// Literal valued position
    Literal(LiteralTemplateProperty),
}

macro_rules! shared_field {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("`", stringify!($name), "` of either kind")]
        pub fn $name(&self) -> $ty {
            match self {
                TemplateProperty::Resource(p) => &p.$name,
                TemplateProperty::Literal(p) => &p.$name,
            }
        }
    };
}

impl TemplateProperty {
    shared_field!(id, &ThingId);
    shared_field!(label, &str);
    shared_field!(path, &ThingId);

    /// Placeholder, if declared
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            TemplateProperty::Resource(p) => p.placeholder.as_deref(),
            TemplateProperty::Literal(p) => p.placeholder.as_deref(),
        }
    }

    /// Description, if declared
    pub fn description(&self) -> Option<&str> {
        match self {
            TemplateProperty::Resource(p) => p.description.as_deref(),
            TemplateProperty::Literal(p) => p.description.as_deref(),
        }
    }

    /// Minimum cardinality
    pub fn min_count(&self) -> Option<u32> {
        match self {
            TemplateProperty::Resource(p) => p.min_count,
            TemplateProperty::Literal(p) => p.min_count,
        }
    }

    /// Maximum cardinality
    pub fn max_count(&self) -> Option<u32> {
        match self {
            TemplateProperty::Resource(p) => p.max_count,
            TemplateProperty::Literal(p) => p.max_count,
        }
    }

    /// Whether at least one value is required
    pub fn is_required(&self) -> bool {
        self.min_count().is_some_and(|min| min > 0)
    }
}

/// A reusable schema for a multi-argument statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosettaStoneTemplate {
    /// Id of the template root
    pub id: ThingId,
    /// Template label
    pub label: String,
    /// Free text description
    pub description: Option<String>,
    /// Grammar of the label of statements authored from this template
    pub dynamic_label: DynamicLabel,
    /// Example sentence
    pub example_usage: Option<String>,
    /// Class of statements authored from this template
    pub target_class: ThingId,
    /// Input positions in index order
    pub properties: Vec<TemplateProperty>,
    /// Curating observatories
    pub observatories: Vec<ObservatoryId>,
    /// Curating organizations
    pub organizations: Vec<OrganizationId>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Creator
    pub created_by: ContributorId,
    /// Whether the template may be updated
    pub modifiable: bool,
}

impl RosettaStoneTemplate {
    /// Placeholders in index order
    pub fn placeholders(&self) -> Vec<Option<&str>> {
        self.properties.iter().map(TemplateProperty::placeholder).collect()
    }

    /// Render the label of a statement from the values at each index
    pub fn format_label(&self, values: &BTreeMap<usize, Vec<String>>) -> String {
        self.dynamic_label.render(values)
    }
}
