//! # Attribute Schemas
//!
//! Each block type declares the attributes it carries as a static list of
//! [`FieldSpec`]s. Two levels of checking are offered:
//!
//! - **shape** ([`Schema::check_shape`]): every present attribute is known
//!   and has the right JSON type, every required attribute is present.
//!   Persisted documents must pass this.
//! - **rules** ([`Schema::validate`], [`Schema::validate_partial`]): shape
//!   plus length bounds, numeric ranges, non-empty option lists and enum
//!   membership. Edits made through the property editor must pass this.

use crate::block::Attributes;
use crate::error::{FieldError, ValidationError};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// String whose trimmed length lies in `min..=max` characters
    Text { min: usize, max: usize },
    Bool,
    Integer { min: i64, max: i64 },
    Number { min: f64, max: f64 },
    /// List of strings with at least `min_items` entries, each at least
    /// `item_min` characters long
    TextList { min_items: usize, item_min: usize },
    /// One of a fixed set of strings
    Choice { values: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Caption shown in the property editor
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str, min: usize, max: usize) -> Self {
        Self::of(name, label, FieldKind::Text { min, max })
    }

    pub const fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::of(name, label, FieldKind::Bool)
    }

    pub const fn integer(name: &'static str, label: &'static str, min: i64, max: i64) -> Self {
        Self::of(name, label, FieldKind::Integer { min, max })
    }

    pub const fn number(name: &'static str, label: &'static str, min: f64, max: f64) -> Self {
        Self::of(name, label, FieldKind::Number { min, max })
    }

    pub const fn text_list(
        name: &'static str,
        label: &'static str,
        min_items: usize,
        item_min: usize,
    ) -> Self {
        Self::of(name, label, FieldKind::TextList { min_items, item_min })
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        Self::of(name, label, FieldKind::Choice { values })
    }

    const fn of(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// JSON type check only
    pub fn check_type(&self, value: &Value) -> Result<(), String> {
        let ok = match self.kind {
            FieldKind::Text { .. } | FieldKind::Choice { .. } => value.is_string(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Integer { .. } => value.is_i64() || value.is_u64(),
            FieldKind::Number { .. } => value.is_number(),
            FieldKind::TextList { .. } => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("expected {}", self.type_name()))
        }
    }

    /// Type check plus the value rules of this field
    pub fn check(&self, value: &Value) -> Result<(), String> {
        self.check_type(value)?;

        match self.kind {
            FieldKind::Text { min, max } => {
                let len = value.as_str().map(|s| s.trim().chars().count()).unwrap_or(0);
                if len < min {
                    return Err(format!("must be at least {} characters", min));
                }
                if len > max {
                    return Err(format!("must be at most {} characters", max));
                }
            }
            FieldKind::Bool => {}
            FieldKind::Integer { min, max } => {
                let n = value.as_i64().unwrap_or(i64::MAX);
                if n < min || n > max {
                    return Err(format!("must be between {} and {}", min, max));
                }
            }
            FieldKind::Number { min, max } => {
                let n = value.as_f64().unwrap_or(f64::NAN);
                if !(min..=max).contains(&n) {
                    return Err(format!("must be between {} and {}", min, max));
                }
            }
            FieldKind::TextList { min_items, item_min } => {
                let items = value.as_array().map(Vec::as_slice).unwrap_or(&[]);
                if items.len() < min_items {
                    return Err(if min_items == 1 {
                        "must not be empty".to_string()
                    } else {
                        format!("must have at least {} items", min_items)
                    });
                }
                for (index, item) in items.iter().enumerate() {
                    let len = item.as_str().map(|s| s.chars().count()).unwrap_or(0);
                    if len < item_min {
                        return Err(format!(
                            "item {} must be at least {} characters",
                            index + 1,
                            item_min
                        ));
                    }
                }
            }
            FieldKind::Choice { values } => {
                let chosen = value.as_str().unwrap_or_default();
                if !values.contains(&chosen) {
                    return Err(format!("must be one of: {}", values.join(", ")));
                }
            }
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            FieldKind::Text { .. } | FieldKind::Choice { .. } => "a string",
            FieldKind::Bool => "a boolean",
            FieldKind::Integer { .. } => "an integer",
            FieldKind::Number { .. } => "a number",
            FieldKind::TextList { .. } => "a list of strings",
        }
    }
}

/// Attribute schema of one block type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const EMPTY: Schema = Schema { fields: &[] };

    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Known fields, right types, required fields present
    pub fn check_shape(&self, attributes: &Attributes) -> Result<(), ValidationError> {
        self.collect(attributes, |spec, value| spec.check_type(value))
    }

    /// Shape plus value rules for every present field
    pub fn validate(&self, attributes: &Attributes) -> Result<(), ValidationError> {
        self.collect(attributes, |spec, value| spec.check(value))
    }

    /// Validate a set of changes before it is merged
    ///
    /// A `null` value removes an optional field; required fields can never be
    /// removed.
    pub fn validate_partial(&self, partial: &Attributes) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        for (name, value) in partial {
            match self.field(name) {
                None => errors.push(FieldError::new(name, "is not a property of this block")),
                Some(spec) if value.is_null() => {
                    if spec.required {
                        errors.push(FieldError::new(name, "is required and cannot be removed"));
                    }
                }
                Some(spec) => {
                    if let Err(reason) = spec.check(value) {
                        errors.push(FieldError::new(name, reason));
                    }
                }
            }
        }
        into_result(errors)
    }

    /// Merge `partial` over `base`. `null` entries remove the field.
    pub fn merge(base: &Attributes, partial: &Attributes) -> Attributes {
        let mut merged = base.clone();
        for (name, value) in partial {
            if value.is_null() {
                merged.remove(name);
            } else {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }

    fn collect(
        &self,
        attributes: &Attributes,
        check: impl Fn(&FieldSpec, &Value) -> Result<(), String>,
    ) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        for (name, value) in attributes {
            match self.field(name) {
                None => errors.push(FieldError::new(name, "is not a property of this block")),
                Some(spec) => {
                    if let Err(reason) = check(spec, value) {
                        errors.push(FieldError::new(name, reason));
                    }
                }
            }
        }

        for spec in self.fields.iter().filter(|f| f.required) {
            if !attributes.contains_key(spec.name) {
                errors.push(FieldError::new(spec.name, "is required"));
            }
        }

        into_result(errors)
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SIZES: &[&str] = &["small", "large"];

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("label", "Label", 2, 10).required(),
        FieldSpec::boolean("required", "Required").required(),
        FieldSpec::text_list("options", "Options", 1, 1),
        FieldSpec::integer("level", "Level", 1, 6),
        FieldSpec::number("maxFileSize", "Max size", 1.0, 10.0),
        FieldSpec::choice("fontSize", "Font size", SIZES),
    ];

    static SCHEMA: Schema = Schema::new(FIELDS);

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_shape_requires_required_fields() {
        let err = SCHEMA.check_shape(&attrs(json!({"label": "Hi"}))).unwrap_err();
        assert_eq!(err.field_names(), vec!["required"]);
    }

    #[test]
    fn test_shape_ignores_value_rules() {
        let value = attrs(json!({"label": "x", "required": false, "options": []}));
        assert!(SCHEMA.check_shape(&value).is_ok());
        assert!(SCHEMA.validate(&value).is_err());
    }

    #[test]
    fn test_shape_rejects_unknown_and_mistyped() {
        let err = SCHEMA
            .check_shape(&attrs(json!({"label": 3, "required": true, "colour": "red"})))
            .unwrap_err();
        assert!(err.has_field("label"));
        assert!(err.has_field("colour"));
    }

    #[test]
    fn test_partial_rules() {
        let err = SCHEMA
            .validate_partial(&attrs(json!({
                "options": [],
                "level": 7,
                "maxFileSize": 0.5,
                "fontSize": "huge",
                "label": "   a   "
            })))
            .unwrap_err();

        assert_eq!(err.fields.len(), 5);
        let options = err.fields.iter().find(|f| f.field == "options").unwrap();
        assert_eq!(options.reason, "must not be empty");
    }

    #[test]
    fn test_partial_null_removal() {
        assert!(SCHEMA.validate_partial(&attrs(json!({"level": null}))).is_ok());
        let err = SCHEMA
            .validate_partial(&attrs(json!({"label": null})))
            .unwrap_err();
        assert!(err.has_field("label"));
    }

    #[test]
    fn test_merge_overlays_and_removes() {
        let base = attrs(json!({"label": "Old", "level": 2, "required": false}));
        let merged = Schema::merge(&base, &attrs(json!({"label": "New", "level": null})));

        assert_eq!(merged, attrs(json!({"label": "New", "required": false})));
    }

    #[test]
    fn test_option_items_must_not_be_blank() {
        let err = SCHEMA
            .validate_partial(&attrs(json!({"options": ["A", ""]})))
            .unwrap_err();
        assert_eq!(err.fields[0].reason, "item 2 must be at least 1 characters");
    }
}
