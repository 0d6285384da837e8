use super::{defaults, field_canvas};
use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::registry::{BlockDefinition, PaletteEntry, Registry};
use crate::render::live::{FormElement, MediaInput};
use crate::render::properties::PropertyEditor;
use crate::render::{CanvasContext, VNode};
use crate::schema::{FieldSpec, Schema};
use serde_json::json;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Label", 2, 255).required(),
    FieldSpec::boolean("required", "Required").required(),
    FieldSpec::text_list("acceptedTypes", "Accepted file types", 0, 1),
    // megabytes
    FieldSpec::number("maxFileSize", "Max file size (MB)", 1.0, 10.0),
    FieldSpec::text("mediaUrl", "Media URL", 0, 2048),
    FieldSpec::text("mediaType", "Media type", 0, 255),
];

static SCHEMA: Schema = Schema::new(FIELDS);

/// File upload question
///
/// `mediaUrl` / `mediaType` describe an optional illustration attached by
/// the form author, not the respondent's upload.
#[derive(Debug, Clone, Copy, Default)]
pub struct Media;

impl BlockDefinition for Media {
    fn block_type(&self) -> BlockType {
        BlockType::Media
    }

    fn category(&self) -> BlockCategory {
        BlockCategory::Field
    }

    fn palette(&self) -> PaletteEntry {
        PaletteEntry {
            label: "Media",
            icon: "image-up",
        }
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn create_instance(&self, id: BlockId) -> BlockInstance {
        BlockInstance::new(id, BlockType::Media).with_attributes(defaults(json!({
            "label": "Upload Media",
            "required": false,
            "acceptedTypes": ["image/*", "application/pdf"],
            "maxFileSize": 5,
            "mediaUrl": "",
            "mediaType": ""
        })))
    }

    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
        let max = block.attr_f64("maxFileSize").unwrap_or(5.0);
        let mut zone = VNode::element("div").with_class("upload-zone").with_child(VNode::text(
            format!(
                "Accepts {} up to {} MB",
                block.attr_list("acceptedTypes").join(", "),
                max
            ),
        ));
        if let Some(url) = block.attr_str("mediaUrl").filter(|u| !u.is_empty()) {
            zone = zone.with_child(
                VNode::element("img")
                    .with_attr("src", url)
                    .with_attr("data-media-type", block.attr_str("mediaType").unwrap_or_default()),
            );
        }
        field_canvas(block, ctx, zone)
    }

    fn render_form(&self, block: &BlockInstance, _registry: &Registry) -> FormElement {
        FormElement::Input(Box::new(MediaInput::new(block)))
    }

    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor {
        PropertyEditor::new(target, block, &SCHEMA, format!("Media Upload {}", position))
    }
}
