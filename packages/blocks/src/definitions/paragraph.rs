use super::{defaults, text_classes, FONT_SIZES, FONT_WEIGHTS};
use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::registry::{BlockDefinition, PaletteEntry, Registry};
use crate::render::live::{static_element, FormElement};
use crate::render::properties::PropertyEditor;
use crate::render::{canvas_frame, CanvasContext, VNode};
use crate::schema::{FieldSpec, Schema};
use serde_json::json;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Label", 2, 255).required(),
    FieldSpec::text("text", "Text", 0, 1000),
    FieldSpec::choice("fontSize", "Font size", FONT_SIZES),
    FieldSpec::choice("fontWeight", "Font weight", FONT_WEIGHTS),
];

static SCHEMA: Schema = Schema::new(FIELDS);

/// Descriptive text; `label` names the block in the builder only
#[derive(Debug, Clone, Copy, Default)]
pub struct Paragraph;

fn paragraph(block: &BlockInstance) -> VNode {
    VNode::element("p")
        .with_class(text_classes(block, "small"))
        .with_child(VNode::text(block.attr_str("text").unwrap_or_default()))
}

impl BlockDefinition for Paragraph {
    fn block_type(&self) -> BlockType {
        BlockType::Paragraph
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Content
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Paragraph",
            icon: "text",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::Paragraph).with_attributes(defaults(json!({
            "label": "Paragraph",
            "text": "Add a description here.",
            "fontSize": "small",
            "fontWeight": "normal"
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        canvas_frame(block, ctx).with_child(paragraph(block))
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        static_element(block, paragraph(block))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Paragraph {}", position))
    }
}
