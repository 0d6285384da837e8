use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::registry::{BlockDefinition, PaletteEntry, Registry};
use crate::render::live::{render_form_block, FormElement};
use crate::render::properties::PropertyEditor;
use crate::render::{canvas_frame, CanvasContext, VNode};
use crate::schema::Schema;

static SCHEMA: Schema = Schema::EMPTY;

/// Container laying its children out in one row
///
/// The only layout type. Has no attributes of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowLayout;

impl BlockDefinition for RowLayout {
    fn block_type(&self) -> BlockType {
        BlockType::RowLayout
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Layout
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Row",
            icon: "rows-3",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::RowLayout).with_children(Vec::new())
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        let children = block
            .children()
            .iter()
            .map(|child| ctx.render_child(child))
            .collect();
        canvas_frame(block, ctx)
            .with_child(VNode::element("div").with_class("row").with_children(children))
            .with_child(
                VNode::element("div")
                    .with_class("drop-zone")
                    .with_attr("data-parent", &block.id)
                    .with_child(VNode::text("Drop blocks here")),
            )
    }

    fn render_form(&self, block: &BlockInstance, registry: &Registry) -> FormElement {
        FormElement::Group {
            block_id: block.id.clone(),
            children: block
                .children()
                .iter()
                .map(|child| render_form_block(child, registry))
                .collect(),
        }
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Row {}", position))
    }
}
