// Copyright 2025 Cowboy AI, LLC.

//! Evolution rules for templates that may already be in use
//!
//! Each template is in one of two states, [`TemplateUsage::Unused`] or
//! [`TemplateUsage::InUse`]. Unused templates may change freely as long as
//! the result is well-formed. Once a statement has been authored from a
//! template its schema may only grow:
//!
//! | field          | in use                                             |
//! |----------------|----------------------------------------------------|
//! | label          | frozen                                             |
//! | description    | frozen                                             |
//! | example usage  | may only be extended                               |
//! | properties     | existing ones frozen, new ones must be optional    |
//! | dynamic label  | may only be extended by one section per new property |

use crate::commands::TemplatePropertyDefinition;
use crate::dynamic_label::DynamicLabel;
use crate::errors::{TemplateError, TemplateResult};
use crate::template::RosettaStoneTemplate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether statements have been authored from a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemplateUsage {
    /// No statement uses the template
    #[default]
    Unused,
    /// At least one statement uses the template
    InUse,
}

impl TemplateUsage {
    /// Usage derived from an existence probe
    pub fn from_probe(any_instance: bool) -> Self {
        if any_instance {
            TemplateUsage::InUse
        } else {
            TemplateUsage::Unused
        }
    }

    /// Whether the template is in use
    pub fn is_in_use(&self) -> bool {
        matches!(self, TemplateUsage::InUse)
    }

    /// State name
    pub fn name(&self) -> &'static str {
        match self {
            TemplateUsage::Unused => "Unused",
            TemplateUsage::InUse => "InUse",
        }
    }
}

impl fmt::Display for TemplateUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checks proposed changes against the current version of a template
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityEngine<'a> {
    current: &'a RosettaStoneTemplate,
    usage: TemplateUsage,
}

impl<'a> CompatibilityEngine<'a> {
    /// Engine for `current` in the given usage state
    pub fn new(current: &'a RosettaStoneTemplate, usage: TemplateUsage) -> Self {
        Self { current, usage }
    }

    /// Usage state the engine evaluates against
    pub fn usage(&self) -> TemplateUsage {
        self.usage
    }

    fn in_use(&self, field: &str) -> TemplateError {
        TemplateError::RosettaStoneTemplateInUse {
            id: self.current.id.clone(),
            field: field.to_string(),
        }
    }

    /// The label is frozen once in use
    pub fn check_label(&self, label: Option<&str>) -> TemplateResult<()> {
        match label {
            Some(label) if self.usage.is_in_use() && label != self.current.label => {
                Err(self.in_use("label"))
            }
            _ => Ok(()),
        }
    }

    /// The description is frozen once in use
    pub fn check_description(&self, description: Option<&str>) -> TemplateResult<()> {
        match description {
            Some(description)
                if self.usage.is_in_use()
                    && Some(description) != self.current.description.as_deref() =>
            {
                Err(self.in_use("description"))
            }
            _ => Ok(()),
        }
    }

    /// The example usage may only be extended once in use
    pub fn check_example_usage(&self, example_usage: Option<&str>) -> TemplateResult<()> {
        let previous = self.current.example_usage.as_deref().unwrap_or_default();
        match example_usage {
            Some(example_usage) if self.usage.is_in_use() && !example_usage.starts_with(previous) => {
                Err(TemplateError::NewRosettaStoneTemplateExampleUsageMustStartWithPreviousExampleUsage)
            }
            _ => Ok(()),
        }
    }

    /// Existing properties are frozen and new ones must be optional once in use
    ///
    /// A shorter list reports the first property that would be removed.
    pub fn check_properties(
        &self,
        properties: Option<&[TemplatePropertyDefinition]>,
    ) -> TemplateResult<()> {
        let Some(properties) = properties else {
            return Ok(());
        };
        if !self.usage.is_in_use() {
            return Ok(());
        }

        for (index, old) in self.current.properties.iter().enumerate() {
            match properties.get(index) {
                Some(new) if new.matches(old) => {}
                _ => {
                    return Err(TemplateError::RosettaStoneTemplatePropertyNotModifiable(
                        old.id().clone(),
                    ))
                }
            }
        }

        for (index, new) in properties
            .iter()
            .enumerate()
            .skip(self.current.properties.len())
        {
            if new.is_required() {
                return Err(TemplateError::NewRosettaStoneTemplatePropertyMustBeOptional {
                    index,
                    placeholder: new.placeholder().unwrap_or_default().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Label evolution rules
    ///
    /// `label` is the parsed proposed label, `None` when unchanged.
    pub fn check_dynamic_label(
        &self,
        label: Option<&DynamicLabel>,
        properties: Option<&[TemplatePropertyDefinition]>,
    ) -> TemplateResult<()> {
        if !self.usage.is_in_use() {
            return Ok(());
        }

        let previous = &self.current.dynamic_label;
        let old_count = self.current.properties.len();
        let changed = label.filter(|label| *label != previous);

        let Some(label) = changed else {
            return match properties {
                Some(properties) if properties.len() != old_count => {
                    Err(TemplateError::RosettaStoneTemplateLabelMustBeUpdated)
                }
                _ => Ok(()),
            };
        };

        let new_count = match properties {
            Some(properties) if properties.len() > old_count => properties.len(),
            _ => return Err(TemplateError::RosettaStoneTemplateLabelUpdateRequiresNewTemplateProperties),
        };

        let appended = label
            .appended_components(previous)
            .ok_or(TemplateError::RosettaStoneTemplateLabelMustStartWithPreviousVersion)?;

        if appended.len() > new_count - old_count {
            return Err(TemplateError::TooManyNewRosettaStoneTemplateLabelSections);
        }
        if appended.iter().any(|component| !component.is_section()) {
            return Err(TemplateError::NewRosettaStoneTemplateLabelSectionsMustBeOptional);
        }

        Ok(())
    }
}
