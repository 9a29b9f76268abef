// Copyright 2025 Cowboy AI, LLC.

//! Configuration for the template engine

use crate::errors::TemplateResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum length of labels and descriptions accepted by the graph store
pub const MAX_LABEL_LENGTH: usize = 8164;

/// Configuration for template validation and graph access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TemplateEngineConfig {
    /// Upper bound for labels, descriptions and example usages
    pub max_label_length: usize,

    /// Depth of the statement bundle loaded around a template root
    pub subgraph_max_level: usize,

    /// Page size of the "is this template in use" probe
    pub usage_probe_page_size: usize,
}

impl Default for TemplateEngineConfig {
    fn default() -> Self {
        Self {
            max_label_length: MAX_LABEL_LENGTH,
            subgraph_max_level: 2,
            usage_probe_page_size: 1,
        }
    }
}

impl TemplateEngineConfig {
    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> TemplateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether `label` is a valid thing label
    pub fn is_valid_label(&self, label: &str) -> bool {
        !label.trim().is_empty()
            && !label.contains('\n')
            && label.chars().count() <= self.max_label_length
    }

    /// Whether `description` is a valid description
    pub fn is_valid_description(&self, description: &str) -> bool {
        !description.trim().is_empty() && description.chars().count() <= self.max_label_length
    }
}
