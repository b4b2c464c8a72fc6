//! Field metadata and reportability policy

use serde::{Deserialize, Serialize};

/// Shape of the value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Scalar integer (e.g., feed rate, program number)
    Integer,
    /// Scalar string (e.g., identifier, derived execution state)
    Text,
    /// Composite record (machine info, raw status, parameter)
    Record,
    /// Sequence of strings (axis names)
    TextList,
    /// Sequence of integers (per-axis positions)
    IntegerList,
    /// Integer or record depending on what the device returns (parameters)
    IntegerOrRecord,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Text => "text",
            FieldType::Record => "record",
            FieldType::TextList => "text_list",
            FieldType::IntegerList => "integer_list",
            FieldType::IntegerOrRecord => "integer_or_record",
        }
    }

    /// Whether a value of shape `actual` fits a field declared as `self`
    pub fn admits(&self, actual: FieldType) -> bool {
        match self {
            FieldType::IntegerOrRecord => {
                matches!(actual, FieldType::Integer | FieldType::Record)
            }
            declared => *declared == actual,
        }
    }
}

/// Purpose/role of a field in the changelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPurpose {
    /// Identifies the controller
    Identity,
    /// Mostly-static controller description
    Static,
    /// Raw status flags read from the controller
    Status,
    /// Computed from other fields in the same snapshot
    Derived,
    /// Axis positions and motion data
    Motion,
    /// Program contents and counters
    Program,
    /// Controller parameter
    Parameter,
}

/// Decides when a collected value is appended to the changelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportPolicy {
    /// Report only when the value differs from the previous generation,
    /// or when the previous generation never held the key.
    #[default]
    ChangeGated,
    /// Report every cycle the value is read successfully.
    Unconditional,
}

impl ReportPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPolicy::ChangeGated => "change_gated",
            ReportPolicy::Unconditional => "unconditional",
        }
    }
}

/// Metadata describing a single field key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Stable key used in snapshots and changelists
    pub key: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this field represents
    pub description: String,
    /// Shape of the value
    pub field_type: FieldType,
    /// Purpose/role of this field
    pub purpose: FieldPurpose,
}

impl FieldMetadata {
    /// Create a new field metadata
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        field_type: FieldType,
        purpose: FieldPurpose,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            field_type,
            purpose,
        }
    }
}
