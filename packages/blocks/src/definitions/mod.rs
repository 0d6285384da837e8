//! Built-in block definitions, one module per block type
//!
//! Registration order here is the palette order.

mod calendar;
mod heading;
mod media;
mod paragraph;
mod radio_select;
mod row_layout;
mod select;
mod star_rating;
mod text_area;
mod text_field;

pub use calendar::Calendar;
pub use heading::Heading;
pub use media::Media;
pub use paragraph::Paragraph;
pub use radio_select::RadioSelect;
pub use row_layout::RowLayout;
pub use select::Select;
pub use star_rating::StarRating;
pub use text_area::TextArea;
pub use text_field::TextField;

use crate::block::{Attributes, BlockInstance};
use crate::registry::BlockDefinition;
use crate::render::{canvas_frame, field_label, helper_text, CanvasContext, VNode};
use serde_json::Value;

pub const FONT_SIZES: &[&str] = &["small", "medium", "large", "x-large", "2x-large", "4x-large"];

pub const FONT_WEIGHTS: &[&str] = &["normal", "bold", "bolder", "lighter"];

pub fn builtin() -> Vec<Box<dyn BlockDefinition>> {
    vec![
        Box::new(TextField),
        Box::new(TextArea),
        Box::new(RadioSelect),
        Box::new(StarRating),
        Box::new(Media),
        Box::new(Calendar),
        Box::new(Select),
        Box::new(Heading),
        Box::new(Paragraph),
        Box::new(RowLayout),
    ]
}

/// Unwrap a `json!({...})` literal into an attribute map
pub(crate) fn defaults(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// Canvas preview shared by field blocks: label, a disabled control, helper
pub(crate) fn field_canvas(block: &BlockInstance, ctx: &CanvasContext<'_>, control: VNode) -> VNode {
    let node = canvas_frame(block, ctx)
        .with_child(field_label(block))
        .with_child(control);
    match helper_text(block) {
        Some(helper) => node.with_child(helper),
        None => node,
    }
}

/// Typography classes of content blocks
pub(crate) fn text_classes(block: &BlockInstance, default_size: &str) -> String {
    format!(
        "text-{} font-{}",
        block.attr_str("fontSize").unwrap_or(default_size),
        block.attr_str("fontWeight").unwrap_or("normal")
    )
}
