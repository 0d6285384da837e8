use super::{defaults, field_canvas};
use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::registry::{BlockDefinition, PaletteEntry, Registry};
use crate::render::live::{DateInput, FormElement};
use crate::render::properties::PropertyEditor;
use crate::render::{CanvasContext, VNode};
use crate::schema::{FieldSpec, Schema};
use serde_json::json;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Label", 2, 255).required(),
    FieldSpec::text("helperText", "Helper text", 0, 255),
    FieldSpec::boolean("required", "Required").required(),
    FieldSpec::text("placeholder", "Placeholder", 0, 255),
];

static SCHEMA: Schema = Schema::new(FIELDS);

/// Date picker question
#[derive(Debug, Clone, Copy, Default)]
pub struct Calendar;

impl BlockDefinition for Calendar {
    fn block_type(&self) -> BlockType {
        BlockType::Calendar
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Field
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Calendar",
            icon: "calendar",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::Calendar).with_attributes(defaults(json!({
            "label": "Date Selection",
            "helperText": "",
            "required": false,
            "placeholder": "Select a date"
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        let picker = VNode::element("button")
            .with_class("date-picker")
            .with_flag("disabled", true)
            .with_child(VNode::text(
                block.attr_str("placeholder").unwrap_or("Select a date"),
            ));
        field_canvas(block, ctx, picker)
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        FormElement::Input(Box::new(DateInput::new(block)))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Calendar {}", position))
    }
}
