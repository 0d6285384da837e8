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
    FieldSpec::text_list("options", "Options", 1, 1).required(),
    FieldSpec::boolean("required", "Required").required(),
    FieldSpec::boolean("allowMultiple", "Allow multiple selection"),
];

static SCHEMA: Schema = Schema::new(FIELDS);

/// Options shown as radio buttons, or check boxes when `allowMultiple` is on
#[derive(Debug, Clone, Copy, Default)]
pub struct RadioSelect;

impl BlockDefinition for RadioSelect {
    fn block_type(&self) -> BlockType {
        BlockType::RadioSelect
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Field
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Radio",
            icon: "circle-dot",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::RadioSelect).with_attributes(defaults(json!({
            "label": "Select an option",
            "options": ["Option 1", "Option 2"],
            "required": false,
            "allowMultiple": false
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        let kind = if block.attr_bool("allowMultiple") {
            "checkbox"
        } else {
            "radio"
        };
        let options = block
            .attr_list("options")
            .into_iter()
            .map(|option| {
                VNode::element("label")
                    .with_child(
                        VNode::element("input")
                            .with_attr("type", kind)
                            .with_flag("disabled", true),
                    )
                    .with_child(VNode::text(option))
            })
            .collect();
        field_canvas(
            block,
            ctx,
            VNode::element("div").with_class("options").with_children(options),
        )
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        FormElement::Input(Box::new(ChoiceInput::new(block, ChoiceStyle::Buttons)))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Radio {}", position))
    }
}
