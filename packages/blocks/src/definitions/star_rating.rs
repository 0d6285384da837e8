use super::{defaults, field_canvas};
use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::registry::{BlockDefinition, PaletteEntry, Registry};
use crate::render::live::{FormElement, RatingInput};
use crate::render::properties::PropertyEditor;
use crate::render::{CanvasContext, VNode};
use crate::schema::{FieldSpec, Schema};
use serde_json::json;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Label", 2, 255).required(),
    FieldSpec::text("helperText", "Helper text", 0, 255),
    FieldSpec::boolean("required", "Required").required(),
    FieldSpec::integer("maxStars", "Number of stars", 1, 10),
];

static SCHEMA: Schema = Schema::new(FIELDS);

#[derive(Debug, Clone, Copy, Default)]
pub struct StarRating;

impl BlockDefinition for StarRating {
    fn block_type(&self) -> BlockType {
        BlockType::StarRating
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Field
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Star rating",
            icon: "star",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::StarRating).with_attributes(defaults(json!({
            "label": "Star rating",
            "helperText": "",
            "required": false,
            "maxStars": 5
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        let max = block.attr_u64("maxStars").unwrap_or(5);
        let stars = (0..max).map(|_| VNode::text("☆")).collect();
        field_canvas(
            block,
            ctx,
            VNode::element("div").with_class("stars").with_children(stars),
        )
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        FormElement::Input(Box::new(RatingInput::new(block)))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Star Rating {}", position))
    }
}
