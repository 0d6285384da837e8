//! # Tree Mutations
//!
//! Structural operations on a form tree: insert, move, reparent,
//! duplicate, remove and in-place replacement.
//!
//! ## Mutation Semantics
//!
//! ### Atomicity
//! - A mutation runs on a working copy of the tree that replaces the
//!   original only on success. A failed mutation leaves the tree untouched.
//!
//! ### Indices
//! - Insert and move targets are clamped to the valid range
//! - A move source index must exist
//! - A move that lands where it started is a successful no-op
//!
//! ### Ids
//! - New blocks get ids from the session's generator, skipping every id
//!   already present in the tree
//! - Duplicates get fresh ids for the copy and all of its descendants
//!
//! ### Locks
//! - Locked blocks cannot be removed, duplicated or reparented. Removing a
//!   block fails when anything in its subtree is locked
//! - Children of a locked layout can still be edited, moved and removed

use formcraft_blocks::{
    BlockId, BlockInstance, BlockLocation, BlockType, FormDocument, IdGenerator, Registry,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Structural edits of a form tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Create a block from the registry factory at a top-level index
    InsertTopLevel { block_type: BlockType, index: usize },

    /// Create a block inside a layout
    InsertChild {
        parent_id: BlockId,
        block_type: BlockType,
        index: usize,
    },

    MoveTopLevel { from_index: usize, to_index: usize },

    /// Reorder within one layout's children
    MoveChild {
        parent_id: BlockId,
        from_index: usize,
        to_index: usize,
    },

    /// Drag a top-level block into a layout
    ReparentToChild {
        block_id: BlockId,
        from_index: usize,
        parent_id: BlockId,
        index: usize,
    },

    /// Deep copy placed right after the original
    Duplicate { block_id: BlockId },

    /// Remove a block and everything below it
    Remove { block_id: BlockId },

    /// Replace a layout child in place
    UpdateChild {
        parent_id: BlockId,
        child_id: BlockId,
        instance: BlockInstance,
    },

    /// Replace a top-level block in place
    UpdateTopLevel {
        block_id: BlockId,
        instance: BlockInstance,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block type is not registered: {0}")]
    InvalidBlockType(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Block {0} is not a layout block")]
    NotALayoutBlock(String),

    #[error("Block {0} is locked")]
    BlockLocked(String),

    #[error("Block {0} would be nested deeper than a layout child")]
    NestingTooDeep(String),

    #[error("Replacement id {found} does not match {expected}")]
    IdMismatch { expected: String, found: String },

    #[error("Replacement for {id} changes its type from {expected} to {found}")]
    TypeMismatch {
        id: String,
        expected: BlockType,
        found: BlockType,
    },

    #[error("Duplicate block id: {0}")]
    DuplicateId(String),

    #[error("Source index {index} is out of range (length {len})")]
    SourceIndexOutOfRange { index: usize, len: usize },

    #[error("Block {id} has invalid attributes: {source}")]
    InvalidAttributes {
        id: String,
        #[source]
        source: ValidationError,
    },
}

/// What a mutation needs besides the tree
pub struct MutationContext<'a> {
    pub registry: &'a Registry,
    pub ids: &'a mut IdGenerator,
}

impl<'a> MutationContext<'a> {
    pub fn new(registry: &'a Registry, ids: &'a mut IdGenerator) -> Self {
        Self { registry, ids }
    }
}

/// Result of a mutation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The tree changed; `block_id` is the block that was created, moved,
    /// removed or replaced
    Applied { block_id: BlockId },
    /// Nothing to do (drop on self, drop at the same position)
    NoOp,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }

    pub fn block_id(&self) -> Option<&str> {
        match self {
            MutationOutcome::Applied { block_id } => Some(block_id),
            MutationOutcome::NoOp => None,
        }
    }
}

/// Result of applying a mutation to a [`Document`](crate::Document)
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// Version after the mutation
    pub version: u64,

    pub outcome: MutationOutcome,
}

impl Mutation {
    /// Apply to `doc`, all or nothing
    pub fn apply(
        &self,
        doc: &mut FormDocument,
        ctx: &mut MutationContext<'_>,
    ) -> Result<MutationOutcome, MutationError> {
        let mut working = doc.clone();
        let outcome = self.apply_in_place(&mut working, ctx)?;
        if outcome.is_applied() {
            *doc = working;
        }
        debug!(mutation = self.name(), ?outcome, "mutation applied");
        Ok(outcome)
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertTopLevel { .. } => "insert_top_level",
            Mutation::InsertChild { .. } => "insert_child",
            Mutation::MoveTopLevel { .. } => "move_top_level",
            Mutation::MoveChild { .. } => "move_child",
            Mutation::ReparentToChild { .. } => "reparent_to_child",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::Remove { .. } => "remove",
            Mutation::UpdateChild { .. } => "update_child",
            Mutation::UpdateTopLevel { .. } => "update_top_level",
        }
    }

    fn apply_in_place(
        &self,
        doc: &mut FormDocument,
        ctx: &mut MutationContext<'_>,
    ) -> Result<MutationOutcome, MutationError> {
        match self {
            Mutation::InsertTopLevel { block_type, index } => {
                Self::apply_insert_top_level(doc, ctx, *block_type, *index)
            }

            Mutation::InsertChild {
                parent_id,
                block_type,
                index,
            } => Self::apply_insert_child(doc, ctx, parent_id, *block_type, *index),

            Mutation::MoveTopLevel {
                from_index,
                to_index,
            } => Self::apply_move_top_level(doc, *from_index, *to_index),

            Mutation::MoveChild {
                parent_id,
                from_index,
                to_index,
            } => Self::apply_move_child(doc, ctx.registry, parent_id, *from_index, *to_index),

            Mutation::ReparentToChild {
                block_id,
                from_index,
                parent_id,
                index,
            } => Self::apply_reparent(doc, ctx.registry, block_id, *from_index, parent_id, *index),

            Mutation::Duplicate { block_id } => Self::apply_duplicate(doc, ctx, block_id),

            Mutation::Remove { block_id } => Self::apply_remove(doc, block_id),

            Mutation::UpdateChild {
                parent_id,
                child_id,
                instance,
            } => Self::apply_update_child(doc, ctx.registry, parent_id, child_id, instance),

            Mutation::UpdateTopLevel { block_id, instance } => {
                Self::apply_update_top_level(doc, ctx.registry, block_id, instance)
            }
        }
    }

    fn apply_insert_top_level(
        doc: &mut FormDocument,
        ctx: &mut MutationContext<'_>,
        block_type: BlockType,
        index: usize,
    ) -> Result<MutationOutcome, MutationError> {
        let definition = ctx
            .registry
            .lookup(block_type)
            .map_err(|_| MutationError::InvalidBlockType(block_type.to_string()))?;

        let id = ctx.ids.next_unused(|candidate| doc.contains_id(candidate));
        let block = definition.create_instance(id.clone());

        let index = index.min(doc.blocks.len());
        doc.blocks.insert(index, block);

        Ok(MutationOutcome::Applied { block_id: id })
    }

    fn apply_insert_child(
        doc: &mut FormDocument,
        ctx: &mut MutationContext<'_>,
        parent_id: &str,
        block_type: BlockType,
        index: usize,
    ) -> Result<MutationOutcome, MutationError> {
        let definition = ctx
            .registry
            .lookup(block_type)
            .map_err(|_| MutationError::InvalidBlockType(block_type.to_string()))?;

        let parent_index = layout_index(doc, ctx.registry, parent_id)?;
        if definition.accepts_children() {
            return Err(MutationError::NestingTooDeep(block_type.to_string()));
        }

        let id = ctx.ids.next_unused(|candidate| doc.contains_id(candidate));
        let block = definition.create_instance(id.clone());

        let children = doc.blocks[parent_index]
            .childblocks
            .get_or_insert_with(Vec::new);
        let index = index.min(children.len());
        children.insert(index, block);

        Ok(MutationOutcome::Applied { block_id: id })
    }

    fn apply_move_top_level(
        doc: &mut FormDocument,
        from_index: usize,
        to_index: usize,
    ) -> Result<MutationOutcome, MutationError> {
        move_within(&mut doc.blocks, from_index, to_index)
    }

    fn apply_move_child(
        doc: &mut FormDocument,
        registry: &Registry,
        parent_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> Result<MutationOutcome, MutationError> {
        let parent_index = layout_index(doc, registry, parent_id)?;
        let children = doc.blocks[parent_index]
            .childblocks
            .get_or_insert_with(Vec::new);
        move_within(children, from_index, to_index)
    }

    fn apply_reparent(
        doc: &mut FormDocument,
        registry: &Registry,
        block_id: &str,
        from_index: usize,
        parent_id: &str,
        index: usize,
    ) -> Result<MutationOutcome, MutationError> {
        // Trust the index only when it still points at the block
        let source = match doc.blocks.get(from_index) {
            Some(block) if block.id == block_id => from_index,
            _ => doc
                .top_level_index(block_id)
                .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?,
        };

        if block_id == parent_id {
            return Ok(MutationOutcome::NoOp);
        }

        let parent_index = layout_index(doc, registry, parent_id)?;

        let block = &doc.blocks[source];
        if block.is_locked {
            return Err(MutationError::BlockLocked(block_id.to_string()));
        }
        if registry.is_layout(block.block_type) {
            return Err(MutationError::NestingTooDeep(block_id.to_string()));
        }

        let block = doc.blocks.remove(source);
        let parent_index = if source < parent_index {
            parent_index - 1
        } else {
            parent_index
        };

        let children = doc.blocks[parent_index]
            .childblocks
            .get_or_insert_with(Vec::new);
        let index = index.min(children.len());
        children.insert(index, block);

        Ok(MutationOutcome::Applied {
            block_id: block_id.to_string(),
        })
    }

    fn apply_duplicate(
        doc: &mut FormDocument,
        ctx: &mut MutationContext<'_>,
        block_id: &str,
    ) -> Result<MutationOutcome, MutationError> {
        let original = doc
            .find(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;
        // A copy carrying a locked block could never be removed again
        if original.subtree_locked() {
            return Err(MutationError::BlockLocked(block_id.to_string()));
        }

        let mut copy = original.clone();
        let mut reserved = HashSet::new();
        assign_fresh_ids(&mut copy, doc, ctx.ids, &mut reserved);
        let copy_id = copy.id.clone();

        match doc.locate(block_id) {
            Some(BlockLocation::TopLevel { index }) => doc.blocks.insert(index + 1, copy),
            Some(BlockLocation::Child { parent_id, index }) => {
                children_of_mut(doc, &parent_id)?.insert(index + 1, copy)
            }
            None => return Err(MutationError::BlockNotFound(block_id.to_string())),
        }

        Ok(MutationOutcome::Applied { block_id: copy_id })
    }

    fn apply_remove(doc: &mut FormDocument, block_id: &str) -> Result<MutationOutcome, MutationError> {
        let locked = || MutationError::BlockLocked(block_id.to_string());

        match doc.locate(block_id) {
            Some(BlockLocation::TopLevel { index }) => {
                if doc.blocks[index].subtree_locked() {
                    return Err(locked());
                }
                doc.blocks.remove(index);
            }
            Some(BlockLocation::Child { parent_id, index }) => {
                let children = children_of_mut(doc, &parent_id)?;
                if children[index].subtree_locked() {
                    return Err(locked());
                }
                children.remove(index);
            }
            None => return Err(MutationError::BlockNotFound(block_id.to_string())),
        }

        Ok(MutationOutcome::Applied {
            block_id: block_id.to_string(),
        })
    }

    fn apply_update_child(
        doc: &mut FormDocument,
        registry: &Registry,
        parent_id: &str,
        child_id: &str,
        instance: &BlockInstance,
    ) -> Result<MutationOutcome, MutationError> {
        let parent_index = doc
            .top_level_index(parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;
        let position = doc.blocks[parent_index]
            .children()
            .iter()
            .position(|c| c.id == child_id)
            .ok_or_else(|| MutationError::BlockNotFound(child_id.to_string()))?;

        let existing = &doc.blocks[parent_index].children()[position];
        check_replacement(existing, child_id, instance, registry)?;
        if !instance.children().is_empty() {
            return Err(MutationError::NestingTooDeep(
                instance.children()[0].id.clone(),
            ));
        }

        let mut replacement = instance.clone();
        replacement.is_locked = existing.is_locked;
        replacement.childblocks = existing.childblocks.clone();

        children_of_mut(doc, parent_id)?[position] = replacement;
        Ok(MutationOutcome::Applied {
            block_id: child_id.to_string(),
        })
    }

    fn apply_update_top_level(
        doc: &mut FormDocument,
        registry: &Registry,
        block_id: &str,
        instance: &BlockInstance,
    ) -> Result<MutationOutcome, MutationError> {
        let index = doc
            .top_level_index(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let existing = &doc.blocks[index];
        check_replacement(existing, block_id, instance, registry)?;

        let mut replacement = instance.clone();
        replacement.is_locked = existing.is_locked;
        if replacement.childblocks.is_none() {
            replacement.childblocks = existing.childblocks.clone();
        }

        if !replacement.children().is_empty() {
            if !registry.is_layout(replacement.block_type) {
                return Err(MutationError::NotALayoutBlock(block_id.to_string()));
            }

            // Ids of the block being replaced may be reused by the replacement
            let mut taken: HashSet<String> = doc.ids().into_iter().collect();
            for id in FormDocument::from_blocks(vec![existing.clone()]).ids() {
                taken.remove(&id);
            }
            taken.insert(replacement.id.clone());

            for child in replacement.children() {
                if registry.is_layout(child.block_type) || !child.children().is_empty() {
                    return Err(MutationError::NestingTooDeep(child.id.clone()));
                }
                let definition = registry
                    .lookup(child.block_type)
                    .map_err(|_| MutationError::InvalidBlockType(child.block_type.to_string()))?;
                definition
                    .schema()
                    .check_shape(&child.attributes)
                    .map_err(|source| MutationError::InvalidAttributes {
                        id: child.id.clone(),
                        source,
                    })?;
                if !taken.insert(child.id.clone()) {
                    return Err(MutationError::DuplicateId(child.id.clone()));
                }
            }
        }

        doc.blocks[index] = replacement;
        Ok(MutationOutcome::Applied {
            block_id: block_id.to_string(),
        })
    }
}

/// Index of the top-level layout `parent_id`
fn layout_index(doc: &FormDocument, registry: &Registry, parent_id: &str) -> Result<usize, MutationError> {
    match doc.locate(parent_id) {
        Some(BlockLocation::TopLevel { index }) => {
            if registry.is_layout(doc.blocks[index].block_type) {
                Ok(index)
            } else {
                Err(MutationError::NotALayoutBlock(parent_id.to_string()))
            }
        }
        Some(BlockLocation::Child { .. }) => {
            let nested_layout = doc
                .find(parent_id)
                .map(|b| registry.is_layout(b.block_type))
                .unwrap_or(false);
            if nested_layout {
                Err(MutationError::NestingTooDeep(parent_id.to_string()))
            } else {
                Err(MutationError::NotALayoutBlock(parent_id.to_string()))
            }
        }
        None => Err(MutationError::ParentNotFound(parent_id.to_string())),
    }
}

fn children_of_mut<'d>(
    doc: &'d mut FormDocument,
    parent_id: &str,
) -> Result<&'d mut Vec<BlockInstance>, MutationError> {
    doc.find_mut(parent_id)
        .and_then(BlockInstance::children_mut)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))
}

fn move_within(
    blocks: &mut Vec<BlockInstance>,
    from_index: usize,
    to_index: usize,
) -> Result<MutationOutcome, MutationError> {
    let len = blocks.len();
    if from_index >= len {
        return Err(MutationError::SourceIndexOutOfRange {
            index: from_index,
            len,
        });
    }

    let to_index = to_index.min(len - 1);
    if from_index == to_index {
        return Ok(MutationOutcome::NoOp);
    }

    let block = blocks.remove(from_index);
    let block_id = block.id.clone();
    blocks.insert(to_index, block);
    Ok(MutationOutcome::Applied { block_id })
}

fn check_replacement(
    existing: &BlockInstance,
    addressed_id: &str,
    instance: &BlockInstance,
    registry: &Registry,
) -> Result<(), MutationError> {
    if instance.id != addressed_id {
        return Err(MutationError::IdMismatch {
            expected: addressed_id.to_string(),
            found: instance.id.clone(),
        });
    }
    if instance.block_type != existing.block_type {
        return Err(MutationError::TypeMismatch {
            id: existing.id.clone(),
            expected: existing.block_type,
            found: instance.block_type,
        });
    }
    let definition = registry
        .lookup(instance.block_type)
        .map_err(|_| MutationError::InvalidBlockType(instance.block_type.to_string()))?;
    definition
        .schema()
        .check_shape(&instance.attributes)
        .map_err(|source| MutationError::InvalidAttributes {
            id: instance.id.clone(),
            source,
        })
}

/// Give `block` and its descendants ids that are neither in `doc` nor in
/// `reserved`; every assigned id is added to `reserved`.
pub(crate) fn assign_fresh_ids(
    block: &mut BlockInstance,
    doc: &FormDocument,
    ids: &mut IdGenerator,
    reserved: &mut HashSet<String>,
) {
    block.id = ids.next_unused(|candidate| doc.contains_id(candidate) || reserved.contains(candidate));
    reserved.insert(block.id.clone());
    if let Some(children) = block.children_mut() {
        for child in children {
            assign_fresh_ids(child, doc, ids, reserved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (FormDocument, IdGenerator) {
        let mut ids = IdGenerator::from_seed("t");
        let doc = FormDocument::seed("", "", Registry::builtin(), &mut ids);
        (doc, ids)
    }

    fn apply(
        mutation: Mutation,
        doc: &mut FormDocument,
        ids: &mut IdGenerator,
    ) -> Result<MutationOutcome, MutationError> {
        let mut ctx = MutationContext::new(Registry::builtin(), ids);
        mutation.apply(doc, &mut ctx)
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::InsertChild {
            parent_id: "row".to_string(),
            block_type: BlockType::Calendar,
            index: 1,
        };

        let json = serde_json::to_string(&mutation).unwrap();
        assert!(json.contains("\"Calendar\""));
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_insert_top_level_clamps_index() {
        let (mut doc, mut ids) = seeded();
        let outcome = apply(
            Mutation::InsertTopLevel {
                block_type: BlockType::TextField,
                index: 99,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap();

        assert_eq!(outcome.block_id(), Some("t-4"));
        assert_eq!(doc.blocks[1].id, "t-4");
    }

    #[test]
    fn test_insert_skips_ids_already_in_tree() {
        let mut doc = FormDocument::from_blocks(vec![BlockInstance::new("t-1", BlockType::Heading)]);
        let mut ids = IdGenerator::from_seed("t");

        apply(
            Mutation::InsertTopLevel {
                block_type: BlockType::Heading,
                index: 0,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap();

        assert_eq!(doc.ids(), vec!["t-2", "t-1"]);
    }

    #[test]
    fn test_nested_layouts_are_rejected() {
        let (mut doc, mut ids) = seeded();
        let err = apply(
            Mutation::InsertChild {
                parent_id: "t-1".into(),
                block_type: BlockType::RowLayout,
                index: 0,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap_err();
        assert_eq!(err, MutationError::NestingTooDeep("RowLayout".into()));
    }

    #[test]
    fn test_move_with_bad_source_fails() {
        let (mut doc, mut ids) = seeded();
        let before = doc.clone();
        let err = apply(
            Mutation::MoveChild {
                parent_id: "t-1".into(),
                from_index: 5,
                to_index: 0,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap_err();

        assert_eq!(err, MutationError::SourceIndexOutOfRange { index: 5, len: 2 });
        assert_eq!(doc, before);
    }

    #[test]
    fn test_reparent_moves_block_into_layout() {
        let (mut doc, mut ids) = seeded();
        doc.blocks.push(BlockInstance::new("loose", BlockType::Calendar));

        apply(
            Mutation::ReparentToChild {
                block_id: "loose".into(),
                from_index: 1,
                parent_id: "t-1".into(),
                index: 1,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.ids(), vec!["t-1", "t-2", "loose", "t-3"]);
    }

    #[test]
    fn test_reparent_onto_itself_is_noop() {
        let (mut doc, mut ids) = seeded();
        let outcome = apply(
            Mutation::ReparentToChild {
                block_id: "t-1".into(),
                from_index: 0,
                parent_id: "t-1".into(),
                index: 0,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap();
        assert_eq!(outcome, MutationOutcome::NoOp);
    }

    #[test]
    fn test_remove_child_of_locked_layout() {
        let (mut doc, mut ids) = seeded();

        apply(Mutation::Remove { block_id: "t-3".into() }, &mut doc, &mut ids).unwrap();
        assert_eq!(doc.ids(), vec!["t-1", "t-2"]);

        let err = apply(Mutation::Remove { block_id: "t-1".into() }, &mut doc, &mut ids).unwrap_err();
        assert_eq!(err, MutationError::BlockLocked("t-1".into()));
    }

    #[test]
    fn test_remove_fails_when_descendant_locked() {
        let mut doc = FormDocument::from_blocks(vec![BlockInstance::new("row", BlockType::RowLayout)
            .with_children(vec![BlockInstance::new("h", BlockType::Heading).locked()])]);
        let mut ids = IdGenerator::from_seed("x");

        let err = apply(Mutation::Remove { block_id: "row".into() }, &mut doc, &mut ids).unwrap_err();
        assert_eq!(err, MutationError::BlockLocked("row".into()));
        assert_eq!(doc.block_count(), 2);
    }

    #[test]
    fn test_update_rejects_type_change() {
        let (mut doc, mut ids) = seeded();
        let err = apply(
            Mutation::UpdateChild {
                parent_id: "t-1".into(),
                child_id: "t-2".into(),
                instance: BlockInstance::new("t-2", BlockType::Paragraph).with_attr("label", "Hi"),
            },
            &mut doc,
            &mut ids,
        )
        .unwrap_err();

        assert!(matches!(err, MutationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_update_keeps_lock_flag() {
        let (mut doc, mut ids) = seeded();
        let mut instance = doc.blocks[0].clone();
        instance.is_locked = false;

        apply(
            Mutation::UpdateTopLevel {
                block_id: "t-1".into(),
                instance,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap();

        assert!(doc.blocks[0].is_locked);
    }

    #[test]
    fn test_update_top_level_rejects_colliding_child_ids() {
        let (mut doc, mut ids) = seeded();
        doc.blocks.push(BlockInstance::new("other", BlockType::Heading).with_attr("label", "Hi"));

        let mut instance = doc.blocks[0].clone();
        instance
            .children_mut()
            .unwrap()
            .push(BlockInstance::new("other", BlockType::Heading).with_attr("label", "Hi"));

        let err = apply(
            Mutation::UpdateTopLevel {
                block_id: "t-1".into(),
                instance,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap_err();
        assert_eq!(err, MutationError::DuplicateId("other".into()));
    }
}
