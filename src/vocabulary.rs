// Copyright 2025 Cowboy AI, LLC.

//! Reserved predicates, classes and literal datatypes used by the template encoding
//!
//! Templates are stored as SHACL-like node shapes. These ids must exist in the
//! graph before any template can be created.

use crate::identifiers::ThingId;

/// Reserved predicate ids
pub mod predicates {
    /// Path of the property at index 0
    pub const HAS_SUBJECT_POSITION: &str = "hasSubjectPosition";
    /// Path of every property at index > 0
    pub const HAS_OBJECT_POSITION: &str = "hasObjectPosition";
    /// Template root -> formatted label literal
    pub const TEMPLATE_LABEL_FORMAT: &str = "TemplateLabelFormat";
    /// Description literal
    pub const DESCRIPTION: &str = "description";
    /// Target class -> example usage literal
    pub const EXAMPLE_OF_USAGE: &str = "P110081";
    /// Property shape -> placeholder literal
    pub const PLACEHOLDER: &str = "placeholder";
    /// Template root -> property shape
    pub const SH_PROPERTY: &str = "sh:property";
    /// Template root -> target class
    pub const SH_TARGET_CLASS: &str = "sh:targetClass";
    /// Template root -> closed marker
    pub const SH_CLOSED: &str = "sh:closed";
    /// Property shape -> path predicate
    pub const SH_PATH: &str = "sh:path";
    /// Property shape -> class constraint
    pub const SH_CLASS: &str = "sh:class";
    /// Property shape -> datatype constraint
    pub const SH_DATATYPE: &str = "sh:datatype";
    /// Property shape -> minimum cardinality
    pub const SH_MIN_COUNT: &str = "sh:minCount";
    /// Property shape -> maximum cardinality
    pub const SH_MAX_COUNT: &str = "sh:maxCount";
    /// Property shape -> node kind (`IRI` or `Literal`)
    pub const SH_NODE_KIND: &str = "sh:nodeKind";
    /// Rosetta stone statement -> template it instantiates
    pub const HAS_TEMPLATE: &str = "hasRosettaStoneTemplate";
}

/// Reserved class ids
pub mod classes {
    /// Class of every template root
    pub const ROSETTA_NODE_SHAPE: &str = "RosettaNodeShape";
    /// Class of every property shape
    pub const PROPERTY_SHAPE: &str = "PropertyShape";
    /// Parent of every template target class
    pub const ROSETTA_STONE_STATEMENT: &str = "RosettaStoneStatement";
}

/// Literal datatypes
pub mod datatypes {
    /// Plain string
    pub const XSD_STRING: &str = "xsd:string";
    /// Integer counts
    pub const XSD_INT: &str = "xsd:integer";
    /// Boolean flags
    pub const XSD_BOOLEAN: &str = "xsd:boolean";
}

/// Node kind literal of resource properties
pub const NODE_KIND_IRI: &str = "IRI";
/// Node kind literal of literal properties
pub const NODE_KIND_LITERAL: &str = "Literal";

/// Build a [`ThingId`] for a reserved id
pub fn id(value: &str) -> ThingId {
    ThingId::new(value)
}

/// Predicates that must exist before templates can be created
pub const REQUIRED_PREDICATES: [&str; 15] = [
    predicates::HAS_SUBJECT_POSITION,
    predicates::HAS_OBJECT_POSITION,
    predicates::TEMPLATE_LABEL_FORMAT,
    predicates::DESCRIPTION,
    predicates::EXAMPLE_OF_USAGE,
    predicates::PLACEHOLDER,
    predicates::SH_PROPERTY,
    predicates::SH_TARGET_CLASS,
    predicates::SH_CLOSED,
    predicates::SH_PATH,
    predicates::SH_CLASS,
    predicates::SH_DATATYPE,
    predicates::SH_MIN_COUNT,
    predicates::SH_MAX_COUNT,
    predicates::SH_NODE_KIND,
];

/// Classes that must exist before templates can be created
pub const REQUIRED_CLASSES: [&str; 6] = [
    classes::ROSETTA_NODE_SHAPE,
    classes::PROPERTY_SHAPE,
    classes::ROSETTA_STONE_STATEMENT,
    datatypes::XSD_STRING,
    datatypes::XSD_INT,
    datatypes::XSD_BOOLEAN,
];
