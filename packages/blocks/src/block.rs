use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Block identifiers are opaque strings, unique within one form.
pub type BlockId = String;

/// Type-specific named properties of a block. The shape is fixed by the
/// block type's [`Schema`](crate::Schema).
pub type Attributes = serde_json::Map<String, Value>;

/// Closed set of block types a form can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockType {
    TextField,
    TextArea,
    RadioSelect,
    StarRating,
    Media,
    Calendar,
    Select,
    Heading,
    Paragraph,
    RowLayout,
}

impl BlockType {
    pub const ALL: [BlockType; 10] = [
        BlockType::TextField,
        BlockType::TextArea,
        BlockType::RadioSelect,
        BlockType::StarRating,
        BlockType::Media,
        BlockType::Calendar,
        BlockType::Select,
        BlockType::Heading,
        BlockType::Paragraph,
        BlockType::RowLayout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::TextField => "TextField",
            BlockType::TextArea => "TextArea",
            BlockType::RadioSelect => "RadioSelect",
            BlockType::StarRating => "StarRating",
            BlockType::Media => "Media",
            BlockType::Calendar => "Calendar",
            BlockType::Select => "Select",
            BlockType::Heading => "Heading",
            BlockType::Paragraph => "Paragraph",
            BlockType::RowLayout => "RowLayout",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownBlockType(s.to_string()))
    }
}

/// Palette grouping of block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCategory {
    /// Single user-input question
    Field,
    /// Owns an ordered list of child blocks
    Layout,
    /// Presentational, no input
    Content,
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockCategory::Field => "Field",
            BlockCategory::Layout => "Layout",
            BlockCategory::Content => "Content",
        };
        f.write_str(name)
    }
}

/// One node of the form tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInstance {
    pub id: BlockId,
    pub block_type: BlockType,
    #[serde(default)]
    pub attributes: Attributes,
    /// Present only on layout blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub childblocks: Option<Vec<BlockInstance>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_locked: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl BlockInstance {
    pub fn new(id: impl Into<BlockId>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            attributes: Attributes::new(),
            childblocks: None,
            is_locked: false,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<BlockInstance>) -> Self {
        self.childblocks = Some(children);
        self
    }

    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    /// Children in order (empty for non-layout blocks)
    pub fn children(&self) -> &[BlockInstance] {
        self.childblocks.as_deref().unwrap_or(&[])
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<BlockInstance>> {
        self.childblocks.as_mut()
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    pub fn attr_bool(&self, name: &str) -> bool {
        self.attributes
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn attr_u64(&self, name: &str) -> Option<u64> {
        self.attributes.get(name).and_then(Value::as_u64)
    }

    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(Value::as_f64)
    }

    pub fn attr_list(&self, name: &str) -> Vec<&str> {
        self.attributes
            .get(name)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn label(&self) -> Option<&str> {
        self.attr_str("label")
    }

    pub fn is_required(&self) -> bool {
        self.attr_bool("required")
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(BlockInstance::subtree_len).sum::<usize>()
    }

    /// Whether this block or anything below it is locked
    pub fn subtree_locked(&self) -> bool {
        self.is_locked || self.children().iter().any(BlockInstance::subtree_locked)
    }
}

/// Addresses a block for in-place replacement and attribute edits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "scope")]
pub enum BlockTarget {
    TopLevel { id: BlockId },
    Child { parent_id: BlockId, child_id: BlockId },
}

impl BlockTarget {
    pub fn top_level(id: impl Into<BlockId>) -> Self {
        BlockTarget::TopLevel { id: id.into() }
    }

    pub fn child(parent_id: impl Into<BlockId>, child_id: impl Into<BlockId>) -> Self {
        BlockTarget::Child {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        }
    }

    /// Id of the addressed block itself
    pub fn block_id(&self) -> &str {
        match self {
            BlockTarget::TopLevel { id } => id,
            BlockTarget::Child { child_id, .. } => child_id,
        }
    }
}
