//! Property editor: a validated edit surface for one block
//!
//! Each change is checked against the block's schema on its own. An invalid
//! change is flagged on its field and kept out of the committed attributes;
//! a valid change yields the complete, merged attribute set ready to be
//! written back to the tree.

use super::VNode;
use crate::block::{Attributes, BlockInstance, BlockTarget, BlockType};
use crate::schema::{FieldKind, Schema};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct PropertyEditor {
    target: BlockTarget,
    block_type: BlockType,
    title: String,
    schema: &'static Schema,
    committed: Attributes,
    errors: BTreeMap<String, String>,
}

impl PropertyEditor {
    pub fn new(
        target: BlockTarget,
        block: &BlockInstance,
        schema: &'static Schema,
        title: impl Into<String>,
    ) -> Self {
        Self {
            target,
            block_type: block.block_type,
            title: title.into(),
            schema,
            committed: block.attributes.clone(),
            errors: BTreeMap::new(),
        }
    }

    pub fn target(&self) -> &BlockTarget {
        &self.target
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Attributes as of the last valid change
    pub fn attributes(&self) -> &Attributes {
        &self.committed
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Apply one field change
    ///
    /// Returns the full attribute set to commit when the change is valid;
    /// otherwise records a field-level error and returns `None`.
    pub fn set(&mut self, field: &str, value: Value) -> Option<Attributes> {
        let mut partial = Attributes::new();
        partial.insert(field.to_string(), value);

        match self.schema.validate_partial(&partial) {
            Ok(()) => {
                self.errors.remove(field);
                self.committed = Schema::merge(&self.committed, &partial);
                Some(self.committed.clone())
            }
            Err(err) => {
                for field_error in err.fields {
                    self.errors.insert(field_error.field, field_error.reason);
                }
                None
            }
        }
    }

    /// Append an item to a list field such as `options`
    pub fn push_item(&mut self, field: &str, item: impl Into<String>) -> Option<Attributes> {
        let mut items = self.list(field);
        items.push(Value::String(item.into()));
        self.set(field, Value::Array(items))
    }

    /// Append the next numbered default option (`Option N`)
    pub fn add_option(&mut self) -> Option<Attributes> {
        let next = self.list("options").len() + 1;
        self.push_item("options", format!("Option {}", next))
    }

    pub fn set_item(&mut self, field: &str, index: usize, item: impl Into<String>) -> Option<Attributes> {
        let mut items = self.list(field);
        let slot = items.get_mut(index)?;
        *slot = Value::String(item.into());
        self.set(field, Value::Array(items))
    }

    pub fn remove_item(&mut self, field: &str, index: usize) -> Option<Attributes> {
        let mut items = self.list(field);
        if index >= items.len() {
            return None;
        }
        items.remove(index);
        self.set(field, Value::Array(items))
    }

    /// Re-sync with the tree after an external change to the block
    pub fn reset(&mut self, block: &BlockInstance) {
        self.committed = block.attributes.clone();
        self.errors.clear();
    }

    fn list(&self, field: &str) -> Vec<Value> {
        self.committed
            .get(field)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    /// Form markup of the edit surface
    pub fn view(&self) -> VNode {
        let header = VNode::element("div")
            .with_class("properties-header")
            .with_child(VNode::text(&self.title));

        let rows = self
            .schema
            .fields()
            .iter()
            .map(|spec| {
                let value = self.committed.get(spec.name);
                let input = match spec.kind {
                    FieldKind::Bool => VNode::element("input")
                        .with_attr("type", "checkbox")
                        .with_flag("checked", value.and_then(Value::as_bool).unwrap_or(false)),
                    FieldKind::Integer { min, max } => VNode::element("input")
                        .with_attr("type", "number")
                        .with_attr("min", min.to_string())
                        .with_attr("max", max.to_string())
                        .with_attr("value", display(value)),
                    FieldKind::Number { min, max } => VNode::element("input")
                        .with_attr("type", "number")
                        .with_attr("min", min.to_string())
                        .with_attr("max", max.to_string())
                        .with_attr("value", display(value)),
                    FieldKind::Choice { values } => VNode::element("select").with_children(
                        values
                            .iter()
                            .map(|choice| {
                                VNode::element("option")
                                    .with_attr("value", *choice)
                                    .with_flag(
                                        "selected",
                                        value.and_then(Value::as_str) == Some(*choice),
                                    )
                                    .with_child(VNode::text(*choice))
                            })
                            .collect(),
                    ),
                    FieldKind::TextList { .. } => VNode::element("ul").with_children(
                        value
                            .and_then(Value::as_array)
                            .map(|items| {
                                items
                                    .iter()
                                    .map(|item| {
                                        VNode::element("li").with_child(
                                            VNode::element("input")
                                                .with_attr("value", item.as_str().unwrap_or_default()),
                                        )
                                    })
                                    .collect()
                            })
                            .unwrap_or_default(),
                    ),
                    FieldKind::Text { .. } => VNode::element("input")
                        .with_attr("type", "text")
                        .with_attr("value", display(value)),
                };

                let mut row = VNode::element("div")
                    .with_class("property-row")
                    .with_attr("data-field", spec.name)
                    .with_child(VNode::element("label").with_child(VNode::text(spec.label)))
                    .with_child(input.with_attr("name", spec.name));
                if let Some(reason) = self.errors.get(spec.name) {
                    row = row.with_child(
                        VNode::element("p")
                            .with_class("field-error")
                            .with_child(VNode::text(reason)),
                    );
                }
                row
            })
            .collect();

        VNode::element("form")
            .with_class("properties")
            .with_attr("data-target", self.target.block_id())
            .with_child(header)
            .with_children(rows)
    }
}

fn display(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
