//! Error types for the block model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
}

/// One offending attribute and why it was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Attribute validation failure, scoped to fields
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Validation failed: {}", describe(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn describe(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} ({})", f.field, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }

    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, reason)])
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }
}

/// A persisted document that cannot be turned into a usable tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeserializeError {
    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Unknown block type '{block_type}' on block {id}")]
    UnknownBlockType { id: String, block_type: String },

    #[error("Duplicate block id: {0}")]
    DuplicateId(String),

    #[error("Block {0} is not a layout but has child blocks")]
    ChildrenOnNonLayout(String),

    #[error("Block {0} is nested deeper than a layout child")]
    NestingTooDeep(String),

    #[error("Block {id} has non-conforming attributes: {source}")]
    NonConformingAttributes {
        id: String,
        #[source]
        source: ValidationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_fields() {
        let err = ValidationError::new(vec![
            FieldError::new("options", "must not be empty"),
            FieldError::new("label", "too short"),
        ]);

        assert!(err.has_field("options"));
        assert!(!err.has_field("required"));
        assert_eq!(
            err.to_string(),
            "Validation failed: options (must not be empty), label (too short)"
        );
    }
}
