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
];

static SCHEMA: Schema = Schema::new(FIELDS);

/// Single-line free text question
#[derive(Debug, Clone, Copy, Default)]
pub struct TextField;

impl BlockDefinition for TextField {
    fn block_type(&self) -> BlockType {
        BlockType::TextField
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Field
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Text field",
            icon: "text-cursor-input",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::TextField).with_attributes(defaults(json!({
            "label": "Text field",
            "helperText": "",
            "required": false,
            "placeholder": "Enter text here."
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        let input = VNode::element("input")
            .with_attr("type", "text")
            .with_attr("placeholder", block.attr_str("placeholder").unwrap_or_default())
            .with_flag("disabled", true);
        field_canvas(block, ctx, input)
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        FormElement::Input(Box::new(TextInput::new(block, false)))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Text Field {}", position))
    }
}
