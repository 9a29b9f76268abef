// Copyright 2025 Cowboy AI, LLC.

//! Error types for template definition, validation and evolution

use crate::identifiers::ThingId;
use thiserror::Error;

/// Errors raised while creating, loading or evolving a rosetta stone template
///
/// Every validation step fails fast with exactly one of these values. The
/// caller maps them to user-facing responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    // ---------------------------------------------------------------------
    // Structural
    // ---------------------------------------------------------------------
    /// No property occupies the subject position
    #[error("Missing subject position. There must be at least one property with path \"hasSubjectPosition\" that has a minimum cardinality of at least one.")]
    MissingSubjectPosition,

    /// Property 0 does not use the subject position predicate
    #[error("Invalid subject position path. Must be \"hasSubjectPosition\".")]
    InvalidSubjectPositionPath,

    /// Subject position is optional
    #[error("Invalid subject position cardinality. Minimum cardinality must be at least one.")]
    InvalidSubjectPositionCardinality,

    /// Subject position is a literal property
    #[error("Invalid subject position type. Subject position must not be a literal property.")]
    InvalidSubjectPositionType,

    /// An object position does not use the object position predicate
    #[error("Invalid object position path for property at index \"{0}\". Must be \"hasObjectPosition\".")]
    InvalidObjectPositionPath(usize),

    /// The subject position predicate appears more than once
    #[error("Too many subject positions. Only the property at index \"0\" may use path \"hasSubjectPosition\".")]
    TooManySubjectPositions,

    /// No object position has a minimum cardinality of at least one
    #[error("Missing required object position. At least one property with path \"hasObjectPosition\" must have a minimum cardinality of at least one.")]
    MissingRequiredObjectPosition,

    /// A property does not declare a placeholder
    #[error("Missing placeholder for property at index \"{0}\".")]
    MissingPropertyPlaceholder(usize),

    /// maxCount is lower than minCount
    #[error("Invalid cardinality. Min count {min} must be lower or equal to max count {max}.")]
    InvalidCardinality {
        /// Declared minimum
        min: u32,
        /// Declared maximum
        max: u32,
    },

    /// A property label is blank, multi-line or too long
    #[error("Invalid label for property at index \"{0}\".")]
    InvalidPropertyLabel(usize),

    // ---------------------------------------------------------------------
    // Label grammar
    // ---------------------------------------------------------------------
    /// The dynamic label does not reference a property index
    #[error("{}", missing_placeholder_message(.index, .placeholder))]
    MissingDynamicLabelPlaceholder {
        /// Property index that is not referenced
        index: usize,
        /// Placeholder of that property, when it declares one
        placeholder: Option<String>,
    },

    /// The formatted label does not reference a property placeholder
    #[error("Missing formatted label placeholder \"{0}\".")]
    MissingFormattedLabelPlaceholder(String),

    /// A completed placeholder key is not a property index
    #[error("Invalid dynamic label placeholder \"{0}\". Placeholders must reference a property index.")]
    InvalidDynamicLabelPlaceholder(String),

    // ---------------------------------------------------------------------
    // Evolution / compatibility
    // ---------------------------------------------------------------------
    /// A field that is frozen once the template is in use was changed
    #[error("Unable to update property \"{field}\" of rosetta stone template \"{id}\" because it is used in at least one rosetta stone statement.")]
    RosettaStoneTemplateInUse {
        /// Template id
        id: ThingId,
        /// Name of the frozen field
        field: String,
    },

    /// The template is not modifiable
    #[error("Rosetta stone template \"{0}\" is not modifiable.")]
    RosettaStoneTemplateNotModifiable(ThingId),

    /// An existing property was changed or removed while in use
    #[error("Rosetta stone template property \"{0}\" is not modifiable.")]
    RosettaStoneTemplatePropertyNotModifiable(ThingId),

    /// A property appended while in use is required
    #[error("New rosetta stone template property \"{placeholder}\" must be optional.")]
    NewRosettaStoneTemplatePropertyMustBeOptional {
        /// Index of the appended property
        index: usize,
        /// Its placeholder
        placeholder: String,
    },

    /// An appended label component is not a section
    #[error("New sections of the dynamic label must be optional.")]
    NewRosettaStoneTemplateLabelSectionsMustBeOptional,

    /// More label components were appended than properties
    #[error("Too many new dynamic label sections. Must be exactly one optional section per new template property.")]
    TooManyNewRosettaStoneTemplateLabelSections,

    /// The new label does not extend the previous one
    #[error("The updated dynamic label must start with the previous label.")]
    RosettaStoneTemplateLabelMustStartWithPreviousVersion,

    /// The label changed without appending properties
    #[error("The dynamic label can only be updated in combination with the addition of new template properties.")]
    RosettaStoneTemplateLabelUpdateRequiresNewTemplateProperties,

    /// The properties changed without changing the label
    #[error("The dynamic label must be updated when updating template properties.")]
    RosettaStoneTemplateLabelMustBeUpdated,

    /// The example usage was rewritten instead of extended
    #[error("New example usage must start with the previous example usage.")]
    NewRosettaStoneTemplateExampleUsageMustStartWithPreviousExampleUsage,

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------
    /// Template not found
    #[error("Rosetta stone template \"{0}\" not found.")]
    RosettaStoneTemplateNotFound(ThingId),

    /// Predicate not found
    #[error("Predicate \"{0}\" not found.")]
    PredicateNotFound(ThingId),

    /// Class not found
    #[error("Class \"{0}\" not found.")]
    ClassNotFound(ThingId),

    /// Resource not found
    #[error("Resource \"{0}\" not found.")]
    ResourceNotFound(ThingId),

    // ---------------------------------------------------------------------
    // Field level
    // ---------------------------------------------------------------------
    /// Template label is blank, multi-line or too long
    #[error("A label must not be blank or contain newlines and must be at most {max_length} characters long.")]
    InvalidLabel {
        /// Configured maximum length
        max_length: usize,
    },

    /// Description is blank or too long
    #[error("A description must not be blank and must be at most {max_length} characters long.")]
    InvalidDescription {
        /// Configured maximum length
        max_length: usize,
    },

    // ---------------------------------------------------------------------
    // Adapter
    // ---------------------------------------------------------------------
    /// The graph adapter failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored data could not be decoded into a template
    #[error("Malformed template graph: {0}")]
    MalformedGraph(String),

    /// A pipeline step ran before the step that provides its input
    #[error("Pipeline step requires {0}, which no earlier step provided.")]
    IncompletePipelineState(&'static str),
}

fn missing_placeholder_message(index: &usize, placeholder: &Option<String>) -> String {
    match placeholder {
        Some(placeholder) => {
            format!("Missing dynamic label placeholder for input position \"{placeholder}\".")
        }
        None => format!("Missing dynamic label placeholder \"{{{index}}}\"."),
    }
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Storage(err.to_string())
    }
}

impl TemplateError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TemplateError::RosettaStoneTemplateNotFound(_)
                | TemplateError::PredicateNotFound(_)
                | TemplateError::ClassNotFound(_)
                | TemplateError::ResourceNotFound(_)
        )
    }

    /// Check if this error rejects an incompatible change to a template in use
    pub fn is_compatibility_error(&self) -> bool {
        matches!(
            self,
            TemplateError::RosettaStoneTemplateInUse { .. }
                | TemplateError::RosettaStoneTemplateNotModifiable(_)
                | TemplateError::RosettaStoneTemplatePropertyNotModifiable(_)
                | TemplateError::NewRosettaStoneTemplatePropertyMustBeOptional { .. }
                | TemplateError::NewRosettaStoneTemplateLabelSectionsMustBeOptional
                | TemplateError::TooManyNewRosettaStoneTemplateLabelSections
                | TemplateError::RosettaStoneTemplateLabelMustStartWithPreviousVersion
                | TemplateError::RosettaStoneTemplateLabelUpdateRequiresNewTemplateProperties
                | TemplateError::RosettaStoneTemplateLabelMustBeUpdated
                | TemplateError::NewRosettaStoneTemplateExampleUsageMustStartWithPreviousExampleUsage
        )
    }

    /// Check if this is a validation error of the submitted definition
    pub fn is_validation_error(&self) -> bool {
        !self.is_not_found()
            && !self.is_compatibility_error()
            && !matches!(
                self,
                TemplateError::Storage(_)
                    | TemplateError::MalformedGraph(_)
                    | TemplateError::IncompletePipelineState(_)
            )
    }

    /// Stable identifier of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            TemplateError::MissingSubjectPosition => "missing_subject_position",
            TemplateError::InvalidSubjectPositionPath => "invalid_subject_position_path",
            TemplateError::InvalidSubjectPositionCardinality => {
                "invalid_subject_position_cardinality"
            }
            TemplateError::InvalidSubjectPositionType => "invalid_subject_position_type",
            TemplateError::InvalidObjectPositionPath(_) => "invalid_object_position_path",
            TemplateError::TooManySubjectPositions => "too_many_subject_positions",
            TemplateError::MissingRequiredObjectPosition => "missing_required_object_position",
            TemplateError::MissingPropertyPlaceholder(_) => "missing_property_placeholder",
            TemplateError::InvalidCardinality { .. } => "invalid_cardinality",
            TemplateError::InvalidPropertyLabel(_) => "invalid_property_label",
            TemplateError::MissingDynamicLabelPlaceholder { .. } => {
                "missing_dynamic_label_placeholder"
            }
            TemplateError::MissingFormattedLabelPlaceholder(_) => {
                "missing_formatted_label_placeholder"
            }
            TemplateError::InvalidDynamicLabelPlaceholder(_) => {
                "invalid_dynamic_label_placeholder"
            }
            TemplateError::RosettaStoneTemplateInUse { .. } => "rosetta_stone_template_in_use",
            TemplateError::RosettaStoneTemplateNotModifiable(_) => {
                "rosetta_stone_template_not_modifiable"
            }
            TemplateError::RosettaStoneTemplatePropertyNotModifiable(_) => {
                "rosetta_stone_template_property_not_modifiable"
            }
            TemplateError::NewRosettaStoneTemplatePropertyMustBeOptional { .. } => {
                "new_rosetta_stone_template_property_must_be_optional"
            }
            TemplateError::NewRosettaStoneTemplateLabelSectionsMustBeOptional => {
                "new_rosetta_stone_template_label_sections_must_be_optional"
            }
            TemplateError::TooManyNewRosettaStoneTemplateLabelSections => {
                "too_many_new_rosetta_stone_template_label_sections"
            }
            TemplateError::RosettaStoneTemplateLabelMustStartWithPreviousVersion => {
                "rosetta_stone_template_label_must_start_with_previous_version"
            }
            TemplateError::RosettaStoneTemplateLabelUpdateRequiresNewTemplateProperties => {
                "rosetta_stone_template_label_update_requires_new_template_properties"
            }
            TemplateError::RosettaStoneTemplateLabelMustBeUpdated => {
                "rosetta_stone_template_label_must_be_updated"
            }
            TemplateError::NewRosettaStoneTemplateExampleUsageMustStartWithPreviousExampleUsage => {
                "new_rosetta_stone_template_example_usage_must_start_with_previous_example_usage"
            }
            TemplateError::RosettaStoneTemplateNotFound(_) => "rosetta_stone_template_not_found",
            TemplateError::PredicateNotFound(_) => "predicate_not_found",
            TemplateError::ClassNotFound(_) => "class_not_found",
            TemplateError::ResourceNotFound(_) => "resource_not_found",
            TemplateError::InvalidLabel { .. } => "invalid_label",
            TemplateError::InvalidDescription { .. } => "invalid_description",
            TemplateError::Storage(_) => "storage",
            TemplateError::MalformedGraph(_) => "malformed_graph",
            TemplateError::IncompletePipelineState(_) => "incomplete_pipeline_state",
        }
    }
}
