//! # Formcraft Editor
//!
//! Editing engine for form block trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: FormDocument + Registry             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save documents                      │
//! │  - Apply mutations all or nothing           │
//! │  - Validated attribute edits                │
//! │  - Sessions: selection, undo, subscribers   │
//! │  - Merge generated blocks                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ views: canvas, live form, property editor   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: every view is derived from it
//! 2. **Owned values**: mutations work on clones, never on shared nodes
//! 3. **One writer**: all edits, including async completions, go through
//!    the session
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formcraft_blocks::{BlockType, Registry};
//! use formcraft_editor::{Document, EditSession};
//!
//! let registry = Registry::builtin();
//! let doc = Document::load("forms/contact.json", registry)?;
//! let mut session = EditSession::new("editor-1", doc, registry);
//!
//! session.subscribe(|event, form| println!("{event:?}: {} blocks", form.block_count()));
//! session.insert_top_level(BlockType::TextField, 1)?;
//!
//! session.document_mut().save(true)?;
//! ```

mod attributes;
mod document;
mod errors;
mod generation;
mod mutations;
mod responses;
mod session;
mod undo_stack;

pub use attributes::{attribute_update, set_attributes};
pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use generation::{merge, prepare_blocks, ActionType, GenerationRequest, GenerationResponse};
pub use mutations::{Mutation, MutationContext, MutationError, MutationOutcome, MutationResult};
pub use responses::{describe_response, validate_submission, Submission, REQUIRED_MESSAGE};
pub use session::{
    EditSession, FormInfo, GenerationOutcome, GenerationTicket, SessionEvent, SessionOptions,
    Subscriber, SubscriptionId,
};
pub use undo_stack::{EditBatch, UndoStack};

// Re-export common types for convenience
pub use formcraft_blocks::{FormDocument, Registry};
