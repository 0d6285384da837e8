//! # Block Type Registry
//!
//! Process-wide table from [`BlockType`] to its [`BlockDefinition`].
//!
//! Generic tree code asks the registry instead of branching on a type:
//! the factory builds new instances, the schema checks attributes, and the
//! three renderers produce the canvas, live-form and property views.
//! Adding a block type means adding one definition here; nothing in the
//! mutation engine changes.

use crate::block::{BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
use crate::definitions;
use crate::error::RegistryError;
use crate::render::live::FormElement;
use crate::render::properties::PropertyEditor;
use crate::render::{CanvasContext, VNode};
use crate::schema::Schema;
use serde::Serialize;
use std::sync::OnceLock;

/// How a block type shows up in the builder's palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub label: &'static str,
    pub icon: &'static str,
}

/// Everything that differs per block type
pub trait BlockDefinition: Send + Sync {
    fn block_type(&self) -> BlockType;

    fn category(&self) -> BlockCategory;

    fn palette(&self) -> PaletteEntry;

    fn schema(&self) -> &'static Schema;

    /// New instance with default attributes
    fn create_instance(&self, id: BlockId) -> BlockInstance;

    /// Builder preview
    fn render_canvas(&self, block: &BlockInstance, ctx: &CanvasContext<'_>) -> VNode;

    /// Submission-time input; layouts render their children through `registry`
    fn render_form(&self, block: &BlockInstance, registry: &Registry) -> FormElement;

    /// Edit surface; `position` is the 1-based index among the block's siblings
    fn render_properties(
        &self,
        block: &BlockInstance,
        target: BlockTarget,
        position: usize,
    ) -> PropertyEditor;

    fn accepts_children(&self) -> bool {
        self.category() == BlockCategory::Layout
    }
}

pub struct Registry {
    definitions: Vec<Box<dyn BlockDefinition>>,
}

impl Registry {
    /// Shared registry of the built-in block types
    pub fn builtin() -> &'static Registry {
        static BUILTIN: OnceLock<Registry> = OnceLock::new();
        BUILTIN.get_or_init(Registry::new)
    }

    /// Create a new registry with all built-in block types
    pub fn new() -> Self {
        Self {
            definitions: definitions::builtin(),
        }
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Register a definition, replacing any earlier one for the same type
    pub fn with_definition(mut self, definition: Box<dyn BlockDefinition>) -> Self {
        let block_type = definition.block_type();
        match self
            .definitions
            .iter()
            .position(|d| d.block_type() == block_type)
        {
            Some(index) => self.definitions[index] = definition,
            None => self.definitions.push(definition),
        }
        self
    }

    pub fn lookup(&self, block_type: BlockType) -> Result<&dyn BlockDefinition, RegistryError> {
        self.definitions
            .iter()
            .find(|d| d.block_type() == block_type)
            .map(Box::as_ref)
            .ok_or_else(|| RegistryError::UnknownBlockType(block_type.to_string()))
    }

    /// Lookup by the persisted type name
    pub fn lookup_name(&self, name: &str) -> Result<&dyn BlockDefinition, RegistryError> {
        self.lookup(name.parse()?)
    }

    /// Definitions of one category in registration order
    pub fn list_by_category(&self, category: BlockCategory) -> Vec<&dyn BlockDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category() == category)
            .map(Box::as_ref)
            .collect()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &dyn BlockDefinition> {
        self.definitions.iter().map(Box::as_ref)
    }

    pub fn contains(&self, block_type: BlockType) -> bool {
        self.lookup(block_type).is_ok()
    }

    pub fn is_layout(&self, block_type: BlockType) -> bool {
        self.lookup(block_type)
            .map(|d| d.accepts_children())
            .unwrap_or(false)
    }

    pub fn create(&self, block_type: BlockType, id: BlockId) -> Result<BlockInstance, RegistryError> {
        Ok(self.lookup(block_type)?.create_instance(id))
    }

    /// Factory instance, or a bare block without attributes when the type
    /// is not registered
    pub fn create_or_bare(&self, block_type: BlockType, id: BlockId) -> BlockInstance {
        match self.lookup(block_type) {
            Ok(definition) => definition.create_instance(id),
            Err(_) => BlockInstance::new(id, block_type),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field(
                "definitions",
                &self
                    .definitions
                    .iter()
                    .map(|d| d.block_type())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
