//! # Attribute Updates
//!
//! Validated, merging edits of one block's attributes. The change set is
//! checked against the block type's schema first; a valid change is merged
//! over the existing attributes (`null` removes an optional field) and
//! written back through the update mutations, never by touching the tree
//! directly.

use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationContext, MutationError, MutationOutcome};
use formcraft_blocks::{Attributes, BlockTarget, FormDocument, Registry, Schema};
use tracing::debug;

/// Build the update mutation for a partial attribute change
pub fn attribute_update(
    doc: &FormDocument,
    registry: &Registry,
    target: &BlockTarget,
    partial: &Attributes,
) -> Result<Mutation, EditorError> {
    let block = match target {
        BlockTarget::TopLevel { id } => doc
            .top_level_index(id)
            .map(|index| &doc.blocks[index])
            .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?,
        BlockTarget::Child {
            parent_id,
            child_id,
        } => {
            let parent = doc
                .top_level_index(parent_id)
                .map(|index| &doc.blocks[index])
                .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
            parent
                .children()
                .iter()
                .find(|c| &c.id == child_id)
                .ok_or_else(|| MutationError::BlockNotFound(child_id.clone()))?
        }
    };

    let definition = registry
        .lookup(block.block_type)
        .map_err(|_| MutationError::InvalidBlockType(block.block_type.to_string()))?;
    definition.schema().validate_partial(partial)?;

    let mut instance = block.clone();
    instance.attributes = Schema::merge(&block.attributes, partial);
    debug!(block_id = %instance.id, fields = partial.len(), "attributes merged");

    Ok(match target {
        BlockTarget::TopLevel { id } => Mutation::UpdateTopLevel {
            block_id: id.clone(),
            instance,
        },
        BlockTarget::Child {
            parent_id,
            child_id,
        } => Mutation::UpdateChild {
            parent_id: parent_id.clone(),
            child_id: child_id.clone(),
            instance,
        },
    })
}

/// Validate, merge and write back in one step
pub fn set_attributes(
    doc: &mut FormDocument,
    ctx: &mut MutationContext<'_>,
    target: &BlockTarget,
    partial: &Attributes,
) -> Result<MutationOutcome, EditorError> {
    let mutation = attribute_update(doc, ctx.registry, target, partial)?;
    Ok(mutation.apply(doc, ctx)?)
}
