// Copyright 2025 Cowboy AI, LLC.

//! Structural validation of template property lists

use crate::commands::TemplatePropertyDefinition;
use crate::config::TemplateEngineConfig;
use crate::errors::{TemplateError, TemplateResult};
use crate::graph::ThingLookup;
use crate::vocabulary::{self, predicates};
use tracing::trace;

/// Validates an ordered list of property definitions
///
/// Checks run per index, first failure wins. Local checks (placeholder,
/// path, subject position rules, cardinality, label) run before the
/// predicate and class lookups of the same property.
pub struct PropertyValidator<'a, L: ThingLookup + ?Sized> {
    lookup: &'a L,
    config: &'a TemplateEngineConfig,
}

impl<'a, L: ThingLookup + ?Sized> PropertyValidator<'a, L> {
    /// Create a validator over a lookup port
    pub fn new(lookup: &'a L, config: &'a TemplateEngineConfig) -> Self {
        Self { lookup, config }
    }

    /// Validate the whole list, including the aggregate object position rule
    pub fn validate(&self, properties: &[TemplatePropertyDefinition]) -> TemplateResult<()> {
        if properties.is_empty() {
            return Err(TemplateError::MissingSubjectPosition);
        }

        for (index, property) in properties.iter().enumerate() {
            self.validate_property(index, property)?;
        }

        let has_required_object = properties.iter().skip(1).any(|p| p.is_required());
        if !has_required_object {
            return Err(TemplateError::MissingRequiredObjectPosition);
        }

        Ok(())
    }

    /// Validate the property at `index`
    pub fn validate_property(
        &self,
        index: usize,
        property: &TemplatePropertyDefinition,
    ) -> TemplateResult<()> {
        trace!(index, placeholder = ?property.placeholder(), "validating property");

        if property.placeholder().is_none() {
            return Err(TemplateError::MissingPropertyPlaceholder(index));
        }

        let subject_position = vocabulary::id(predicates::HAS_SUBJECT_POSITION);
        let object_position = vocabulary::id(predicates::HAS_OBJECT_POSITION);

        if index == 0 {
            if property.path() != &subject_position {
                return Err(TemplateError::InvalidSubjectPositionPath);
            }
            if matches!(property, TemplatePropertyDefinition::Literal(_)) {
                return Err(TemplateError::InvalidSubjectPositionType);
            }
            if !property.is_required() {
                return Err(TemplateError::InvalidSubjectPositionCardinality);
            }
        } else if property.path() == &subject_position {
            return Err(TemplateError::TooManySubjectPositions);
        } else if property.path() != &object_position {
            return Err(TemplateError::InvalidObjectPositionPath(index));
        }

        if let (Some(min), Some(max)) = (property.min_count(), property.max_count()) {
            if max < min {
                return Err(TemplateError::InvalidCardinality { min, max });
            }
        }

        if !self.config.is_valid_label(property.label()) {
            return Err(TemplateError::InvalidPropertyLabel(index));
        }

        if self.lookup.find_predicate(property.path())?.is_none() {
            return Err(TemplateError::PredicateNotFound(property.path().clone()));
        }

        let constraint = match property {
            TemplatePropertyDefinition::Resource(d) => d.class.as_ref(),
            TemplatePropertyDefinition::Literal(d) => d.datatype.as_ref(),
        };
        if let Some(class) = constraint {
            if self.lookup.find_class(class)?.is_none() {
                return Err(TemplateError::ClassNotFound(class.clone()));
            }
        }

        Ok(())
    }
}
