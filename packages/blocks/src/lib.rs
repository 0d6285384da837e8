//! # Formcraft Blocks
//!
//! The form-block tree model and the per-type behavior that hangs off it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ block / document: BlockInstance tree        │
//! │  - typed blocks, ordered children           │
//! │  - id generation, traversal                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ registry: BlockType → BlockDefinition       │
//! │  - factory + attribute schema               │
//! │  - canvas / live form / property editor     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ render: dispatch by type into VNode trees   │
//! │ serializer: jsonBlocks <-> FormDocument     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Generic tree code never branches on a block type. Anything that differs
//! per type lives in a [`BlockDefinition`] registered in the [`Registry`].

pub mod block;
pub mod definitions;
pub mod document;
pub mod error;
pub mod id_generator;
pub mod registry;
pub mod render;
pub mod schema;
pub mod serializer;
pub mod visitor;

pub use block::{Attributes, BlockCategory, BlockId, BlockInstance, BlockTarget, BlockType};
pub use document::{BlockLocation, FormDocument, MAX_DEPTH};
pub use error::{DeserializeError, FieldError, RegistryError, ValidationError};
pub use id_generator::IdGenerator;
pub use registry::{BlockDefinition, PaletteEntry, Registry};
pub use render::{
    live::{FormElement, LiveField, LiveForm},
    properties::PropertyEditor,
    CanvasContext, VNode,
};
pub use schema::{FieldKind, FieldSpec, Schema};
pub use serializer::{deserialize, migrate_duplicate_ids, serialize, serialize_pretty};
pub use visitor::{Visitor, VisitorMut};
