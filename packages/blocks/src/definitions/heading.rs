use super::{defaults, text_classes, FONT_SIZES, FONT_WEIGHTS};
use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::registry::{BlockDefinition, PaletteEntry, Registry};
use crate::render::live::{static_element, FormElement};
use crate::render::properties::PropertyEditor;
use crate::render::{canvas_frame, CanvasContext, VNode};
use crate::schema::{FieldSpec, Schema};
use serde_json::json;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Text", 2, 255).required(),
    FieldSpec::integer("level", "Level", 1, 6),
    FieldSpec::choice("fontSize", "Font size", FONT_SIZES),
    FieldSpec::choice("fontWeight", "Font weight", FONT_WEIGHTS),
];

static SCHEMA: Schema = Schema::new(FIELDS);

#[derive(Debug, Clone, Copy, Default)]
pub struct Heading;

impl Heading {
    fn heading(block: &BlockInstance) -> VNode {
        let level = block.attr_u64("level").unwrap_or(1).clamp(1, 6);
        VNode::element(format!("h{}", level))
            .with_class(text_classes(block, "medium"))
            .with_child(VNode::text(block.label().unwrap_or_default()))
    }
}

impl BlockDefinition for Heading {
    fn block_type(&self) -> BlockType {
        BlockType::Heading
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Content
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Heading",
            icon: "heading",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::Heading).with_attributes(defaults(json!({
            "label": "Heading",
            "level": 1,
            "fontSize": "medium",
            "fontWeight": "normal"
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        canvas_frame(block, ctx).with_child(Self::heading(block))
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        static_element(block, Self::heading(block))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Heading {}", position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_picks_the_tag() {
        let block = Heading
            .create_instance("h".into())
            .with_attr("level", 3)
            .with_attr("fontSize", "4x-large");
        match Heading::heading(&block) {
            VNode::Element { tag, attributes, .. } => {
                assert_eq!(tag, "h3");
                assert_eq!(attributes["class"], "text-4x-large font-normal");
            }
            VNode::Text { .. } => panic!("expected element"),
        }
    }
}
