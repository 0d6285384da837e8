use super::{defaults, field_canvas};
use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::registry::{BlockDefinition, PaletteEntry, Registry};
use crate::render::live::{ChoiceInput, ChoiceStyle, FormElement};
use crate::render::properties::PropertyEditor;
use crate::render::{CanvasContext, VNode};
use crate::schema::{FieldSpec, Schema};
use serde_json::json;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Label", 2, 255).required(),
    FieldSpec::text("helperText", "Helper text", 0, 255),
    FieldSpec::boolean("required", "Required").required(),
    FieldSpec::text("placeholder", "Placeholder", 0, 255),
    FieldSpec::text_list("options", "Options", 1, 1).required(),
    FieldSpec::boolean("allowMultiple", "Allow multiple selection"),
];

static SCHEMA: Schema = Schema::new(FIELDS);

/// Dropdown question
#[derive(Debug, Clone, Copy, Default)]
pub struct Select;

impl BlockDefinition for Select {
    fn block_type(&self) -> BlockType {
        BlockType::Select
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Field
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Dropdown",
            icon: "chevron-down",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::Select).with_attributes(defaults(json!({
            "label": "Dropdown Selection",
            "helperText": "",
            "required": false,
            "placeholder": "Select an option",
            "options": ["Option 1"],
            "allowMultiple": false
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        let mut select = VNode::element("select")
            .with_flag("disabled", true)
            .with_flag("multiple", block.attr_bool("allowMultiple"))
            .with_child(
                VNode::element("option")
                    .with_child(VNode::text(block.attr_str("placeholder").unwrap_or_default())),
            );
        for option in block.attr_list("options") {
            select = select.with_child(VNode::element("option").with_child(VNode::text(option)));
        }
        field_canvas(block, ctx, select)
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        FormElement::Input(Box::new(ChoiceInput::new(block, ChoiceStyle::Dropdown)))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Dropdown {}", position))
    }
}
