//! # Render Dispatch
//!
//! Three parallel views of a block tree, each produced per block by the
//! block's [`BlockDefinition`](crate::BlockDefinition):
//!
//! - **canvas**: read-only builder preview ([`render_canvas`])
//! - **live form**: interactive input capture ([`live::LiveForm`])
//! - **properties**: validated edit surface for one block
//!   ([`properties::PropertyEditor`])
//!
//! Dispatch is a registry lookup by block type. Views are plain [`VNode`]
//! trees; [`html`] turns them into markup.

pub mod html;
pub mod live;
pub mod properties;

use crate::block::{BlockInstance, BlockTarget};
use crate::document::{BlockLocation, FormDocument};
use crate::registry::Registry;
use properties::PropertyEditor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Block this element was rendered from
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
    },

    Text { content: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            block_id: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    /// Adds `key` only when `on` holds
    pub fn with_flag(self, key: &str, on: bool) -> Self {
        if on {
            self.with_attr(key, "")
        } else {
            self
        }
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_block_id(mut self, id: impl Into<String>) -> Self {
        if let VNode::Element {
            block_id: ref mut node_id,
            ..
        } = self
        {
            *node_id = Some(id.into());
        }
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            VNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            VNode::Text { .. } => &[],
        }
    }

    pub fn block_id(&self) -> Option<&str> {
        match self {
            VNode::Element { block_id, .. } => block_id.as_deref(),
            VNode::Text { .. } => None,
        }
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        match self {
            VNode::Text { content } => content.clone(),
            VNode::Element { children, .. } => {
                children.iter().map(VNode::text_content).collect()
            }
        }
    }

    /// Depth-first search for the element rendered from `id`
    pub fn find_block(&self, id: &str) -> Option<&VNode> {
        if self.block_id() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_block(id))
    }
}

/// What a canvas renderer can see besides its own block
#[derive(Clone, Copy)]
pub struct CanvasContext<'a> {
    pub registry: &'a Registry,
    pub selected: Option<&'a str>,
}

impl<'a> CanvasContext<'a> {
    pub fn new(registry: &'a Registry, selected: Option<&'a str>) -> Self {
        Self { registry, selected }
    }

    pub fn is_selected(&self, block: &BlockInstance) -> bool {
        self.selected == Some(block.id.as_str())
    }

    /// Render a nested block through its own definition
    pub fn render_child(&self, block: &BlockInstance) -> VNode {
        render_canvas_block(block, self)
    }
}

/// Canvas preview of the whole tree, top to bottom
pub fn render_canvas(doc: &FormDocument, registry: &Registry, selected: Option<&str>) -> Vec<VNode> {
    let ctx = CanvasContext::new(registry, selected);
    doc.blocks
        .iter()
        .map(|block| render_canvas_block(block, &ctx))
        .collect()
}

fn render_canvas_block(block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
    match ctx.registry.lookup(block.block_type) {
        Ok(definition) => definition.render_canvas(block, ctx),
        Err(err) => VNode::element("div")
            .with_class("canvas-block canvas-block--unknown")
            .with_block_id(&block.id)
            .with_child(VNode::text(err.to_string())),
    }
}

/// Property editor for the block with `id`, wherever it sits
pub fn property_editor(doc: &FormDocument, registry: &Registry, id: &str) -> Option<PropertyEditor> {
    let (block, target, position) = match doc.locate(id)? {
        BlockLocation::TopLevel { index } => {
            (&doc.blocks[index], BlockTarget::top_level(id), index + 1)
        }
        BlockLocation::Child { parent_id, index } => {
            let parent = doc.find(&parent_id)?;
            (
                &parent.children()[index],
                BlockTarget::child(parent_id, id),
                index + 1,
            )
        }
    };
    let definition = registry.lookup(block.block_type).ok()?;
    Some(definition.render_properties(block, target, position))
}

/// `<label>` with a required marker, shared by field renderers
pub fn field_label(block: &BlockInstance) -> VNode {
    let mut label = VNode::element("label")
        .with_class("field-label")
        .with_child(VNode::text(block.label().unwrap_or_default()));
    if block.is_required() {
        label = label.with_child(
            VNode::element("span")
                .with_class("required-marker")
                .with_child(VNode::text("*")),
        );
    }
    label
}

/// Outer wrapper every canvas block shares
pub fn canvas_frame(block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode {
    let mut class = format!("canvas-block canvas-block--{}", block.block_type);
    if ctx.is_selected(block) {
        class.push_str(" is-selected");
    }
    VNode::element("div")
        .with_class(class)
        .with_block_id(&block.id)
        .with_flag("data-locked", block.is_locked)
}

/// Helper text under a field, if any
pub fn helper_text(block: &BlockInstance) -> Option<VNode> {
    block
        .attr_str("helperText")
        .filter(|text| !text.trim().is_empty())
        .map(|text| {
            VNode::element("p")
                .with_class("helper-text")
                .with_child(VNode::text(text))
        })
}
