use super::{defaults, field_canvas};
use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::registry::{BlockDefinition, PaletteEntry, Registry};
use crate::render::live::{FormElement, TextInput};
use crate::render::properties::PropertyEditor;
use crate::render::{CanvasContext, VNode};
use crate::schema::{FieldSpec, Schema};
use serde_json::json;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Label", 2, 255).required(),
    FieldSpec::text("helperText", "Helper text", 0, 255),
    FieldSpec::boolean("required", "Required").required(),
    FieldSpec::text("placeholder", "Placeholder", 0, 255),
    FieldSpec::integer("rows", "Rows", 1, 20),
];

static SCHEMA: Schema = Schema::new(FIELDS);

/// Multi-line free text question
#[derive(Debug, Clone, Copy, Default)]
pub struct TextArea;

impl BlockDefinition for TextArea {
    fn block_type(&self) -> BlockType {
        BlockType::TextArea
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Field
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Text area",
            icon: "letter-text",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::TextArea).with_attributes(defaults(json!({
            "label": "Text area",
            "helperText": "",
            "required": false,
            "placeholder": "Enter text here.",
            "rows": 3
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        let rows = block.attr_u64("rows").unwrap_or(3);
        let area = VNode::element("textarea")
            .with_attr("rows", rows.to_string())
            .with_attr("placeholder", block.attr_str("placeholder").unwrap_or_default())
            .with_flag("disabled", true);
        field_canvas(block, ctx, area)
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        FormElement::Input(Box::new(TextInput::new(block, true)))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Text Area {}", position))
    }
}
