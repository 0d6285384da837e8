//! # Form Document
//!
//! The aggregate form tree: an ordered top-level sequence of blocks, where
//! layout blocks own an ordered list of children.
//!
//! ```text
//! FormDocument
//!   ├── RowLayout (locked)
//!   │     ├── Heading
//!   │     └── Paragraph
//!   └── TextField
//! ```
//!
//! Nesting stops at [`MAX_DEPTH`] levels. The tree is plain owned data;
//! every edit works on owned clones so no node is ever shared between two
//! versions of a document.

use crate::block::{BlockId, BlockInstance, BlockType};
use crate::id_generator::IdGenerator;
use crate::registry::Registry;
use crate::visitor::{walk_block, IdCollector, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Top-level blocks are depth 1, layout children depth 2
pub const MAX_DEPTH: usize = 2;

const DEFAULT_TITLE: &str = "Untitled form";
const DEFAULT_DESCRIPTION: &str = "Add a description here.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDocument {
    pub blocks: Vec<BlockInstance>,
}

/// Where a block sits in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLocation {
    TopLevel { index: usize },
    Child { parent_id: BlockId, index: usize },
}

impl FormDocument {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn from_blocks(blocks: Vec<BlockInstance>) -> Self {
        Self { blocks }
    }

    /// Seed for a freshly created form: a locked row holding the title
    /// heading and a description paragraph.
    pub fn seed(name: &str, description: &str, registry: &Registry, ids: &mut IdGenerator) -> Self {
        let title = if name.trim().is_empty() { DEFAULT_TITLE } else { name };
        let description = if description.trim().is_empty() {
            DEFAULT_DESCRIPTION
        } else {
            description
        };

        let mut row = registry.create_or_bare(BlockType::RowLayout, ids.new_id());
        row.is_locked = true;

        let heading = registry
            .create_or_bare(BlockType::Heading, ids.new_id())
            .with_attr("label", title)
            .with_attr("level", 1)
            .with_attr("fontSize", "4x-large")
            .with_attr("fontWeight", "normal");

        let paragraph = registry
            .create_or_bare(BlockType::Paragraph, ids.new_id())
            .with_attr("label", "Paragraph")
            .with_attr("text", description)
            .with_attr("fontSize", "small")
            .with_attr("fontWeight", "normal");

        Self::from_blocks(vec![row.with_children(vec![heading, paragraph])])
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of blocks, nested ones included
    pub fn block_count(&self) -> usize {
        self.blocks.iter().map(BlockInstance::subtree_len).sum()
    }

    pub fn find(&self, id: &str) -> Option<&BlockInstance> {
        for block in &self.blocks {
            if block.id == id {
                return Some(block);
            }
            if let Some(child) = block.children().iter().find(|c| c.id == id) {
                return Some(child);
            }
        }
        None
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut BlockInstance> {
        for block in &mut self.blocks {
            if block.id == id {
                return Some(block);
            }
            if let Some(children) = block.children_mut() {
                if let Some(child) = children.iter_mut().find(|c| c.id == id) {
                    return Some(child);
                }
            }
        }
        None
    }

    pub fn top_level_index(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn locate(&self, id: &str) -> Option<BlockLocation> {
        for (index, block) in self.blocks.iter().enumerate() {
            if block.id == id {
                return Some(BlockLocation::TopLevel { index });
            }
            if let Some(child_index) = block.children().iter().position(|c| c.id == id) {
                return Some(BlockLocation::Child {
                    parent_id: block.id.clone(),
                    index: child_index,
                });
            }
        }
        None
    }

    /// The layout block owning `id`, if `id` is nested
    pub fn parent_of(&self, id: &str) -> Option<&BlockInstance> {
        self.blocks
            .iter()
            .find(|b| b.children().iter().any(|c| c.id == id))
    }

    /// Every id in document order
    pub fn ids(&self) -> Vec<String> {
        let mut collector = IdCollector::default();
        collector.visit_document(self);
        collector.ids
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Ids that occur more than once, each reported once
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for id in self.ids() {
            if !seen.insert(id.clone()) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }

    /// Child id → question label for every layout child
    ///
    /// Response views use this to label submitted values; children without
    /// a label map to `"No label"`.
    pub fn question_labels(&self) -> BTreeMap<String, String> {
        let mut labels = QuestionLabels::default();
        labels.visit_document(self);
        labels.labels
    }

    /// Assign a fresh id to every block whose id was already seen earlier in
    /// document order. Returns how many blocks were renamed.
    pub fn repair_duplicate_ids(&mut self, ids: &mut IdGenerator) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        let all: HashSet<String> = self.ids().into_iter().collect();
        let mut repaired = 0;

        for block in &mut self.blocks {
            repaired += repair_block(block, &mut seen, &all, ids);
            if let Some(children) = block.children_mut() {
                for child in children {
                    repaired += repair_block(child, &mut seen, &all, ids);
                }
            }
        }
        repaired
    }
}

fn repair_block(
    block: &mut BlockInstance,
    seen: &mut HashSet<String>,
    all: &HashSet<String>,
    ids: &mut IdGenerator,
) -> usize {
    if seen.insert(block.id.clone()) {
        return 0;
    }
    let fresh = ids.next_unused(|candidate| all.contains(candidate) || seen.contains(candidate));
    seen.insert(fresh.clone());
    block.id = fresh;
    1
}

#[derive(Default)]
struct QuestionLabels {
    labels: BTreeMap<String, String>,
}

impl Visitor for QuestionLabels {
    fn visit_block(&mut self, block: &BlockInstance, parent: Option<&BlockInstance>) {
        if parent.is_some() {
            let label = block.label().unwrap_or("No label");
            self.labels.insert(block.id.clone(), label.to_string());
        }
        walk_block(self, block);
    }
}
