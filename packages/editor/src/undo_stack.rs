//! # Undo/Redo Stack
//!
//! Tracks edit history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Each entry stores the tree before and after an edit
//! - Undo restores `before` and moves the entry to the redo stack
//! - Redo restores `after`
//! - New edits clear the redo stack
//! - Batches group several edits into one step (a generated-form merge is
//!   always one step)
//!
//! Trees are plain owned values, so a snapshot can never alias the live
//! tree.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let before = doc.clone();
//! mutation.apply(&mut doc, &mut ctx)?;
//! stack.record(before, doc.clone());
//!
//! if let Some(previous) = stack.undo() {
//!     doc = previous;
//! }
//! ```

use formcraft_blocks::FormDocument;

/// One undoable step
#[derive(Debug, Clone)]
pub struct EditBatch {
    pub before: FormDocument,
    pub after: FormDocument,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl EditBatch {
    pub fn new(before: FormDocument, after: FormDocument) -> Self {
        Self {
            before,
            after,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied edits (most recent last)
    undo_stack: Vec<EditBatch>,

    /// Undone edits (most recent last)
    redo_stack: Vec<EditBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Batch being built, if any
    current_batch: Option<BatchBuilder>,
}

#[derive(Debug)]
struct BatchBuilder {
    batch: Option<EditBatch>,
    description: Option<String>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record one successful edit
    pub fn record(&mut self, before: FormDocument, after: FormDocument) {
        if let Some(builder) = &mut self.current_batch {
            match &mut builder.batch {
                // Keep the first `before`, move `after` forward
                Some(batch) => batch.after = after,
                None => builder.batch = Some(EditBatch::new(before, after)),
            }
        } else {
            self.push_batch(EditBatch::new(before, after));
        }
    }

    /// Start a batch of edits (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(BatchBuilder {
            batch: None,
            description: None,
        });
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(builder) = self.current_batch.take() {
            if let Some(mut batch) = builder.batch {
                batch.description = builder.description;
                self.push_batch(batch);
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(builder) = &mut self.current_batch {
            builder.description = Some(description.into());
        }
    }

    /// Push a batch to the undo stack
    pub fn push_batch(&mut self, batch: EditBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the redo history
        self.redo_stack.clear();
    }

    /// Undo the most recent batch, returning the tree to restore
    pub fn undo(&mut self) -> Option<FormDocument> {
        let batch = self.undo_stack.pop()?;
        let restore = batch.before.clone();
        self.redo_stack.push(batch);
        Some(restore)
    }

    /// Redo the most recently undone batch, returning the tree to restore
    pub fn redo(&mut self) -> Option<FormDocument> {
        let batch = self.redo_stack.pop()?;
        let restore = batch.after.clone();
        self.undo_stack.push(batch);
        Some(restore)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_blocks::{BlockInstance, BlockType};

    fn doc(ids: &[&str]) -> FormDocument {
        FormDocument::from_blocks(
            ids.iter()
                .map(|id| BlockInstance::new(*id, BlockType::Heading))
                .collect(),
        )
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut stack = UndoStack::new();
        stack.record(doc(&["a"]), doc(&["a", "b"]));

        assert_eq!(stack.undo(), Some(doc(&["a"])));
        assert_eq!(stack.redo_levels(), 1);

        assert_eq!(stack.redo(), Some(doc(&["a", "b"])));
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo(), None);
    }

    #[test]
    fn test_batched_edits_undo_together() {
        let mut stack = UndoStack::new();

        stack.begin_batch();
        stack.set_batch_description("Generate questions");
        stack.record(doc(&[]), doc(&["a"]));
        stack.record(doc(&["a"]), doc(&["a", "b"]));
        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Generate questions"));
        assert_eq!(stack.undo(), Some(doc(&[])));
        assert_eq!(stack.redo(), Some(doc(&["a", "b"])));
    }

    #[test]
    fn test_empty_batch_is_dropped() {
        let mut stack = UndoStack::new();
        stack.begin_batch();
        stack.end_batch();
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut stack = UndoStack::new();
        stack.record(doc(&[]), doc(&["a"]));
        stack.undo();
        assert_eq!(stack.redo_levels(), 1);

        stack.record(doc(&[]), doc(&["b"]));
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(2);
        for i in 0..3 {
            let id = i.to_string();
            stack.record(doc(&[]), doc(&[id.as_str()]));
        }
        assert_eq!(stack.undo_levels(), 2);
    }
}
