use crate::block::BlockInstance;
use crate::document::FormDocument;

/// Visitor pattern for traversing a block tree immutably
///
/// Default implementations walk the whole tree in document order (parent
/// before its children). Override `visit_block` to act on each node.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &FormDocument) {
        walk_document(self, doc);
    }

    /// `parent` is the enclosing layout block, `None` at top level
    fn visit_block(&mut self, block: &BlockInstance, parent: Option<&BlockInstance>) {
        let _ = parent;
        walk_block(self, block);
    }
}

/// Mutable visitor for rewriting blocks in place
pub trait VisitorMut: Sized {
    fn visit_document_mut(&mut self, doc: &mut FormDocument) {
        walk_document_mut(self, doc);
    }

    fn visit_block_mut(&mut self, block: &mut BlockInstance) {
        walk_block_mut(self, block);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &FormDocument) {
    for block in &doc.blocks {
        visitor.visit_block(block, None);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &BlockInstance) {
    for child in block.children() {
        visitor.visit_block(child, Some(block));
    }
}

pub fn walk_document_mut<V: VisitorMut>(visitor: &mut V, doc: &mut FormDocument) {
    for block in &mut doc.blocks {
        visitor.visit_block_mut(block);
    }
}

pub fn walk_block_mut<V: VisitorMut>(visitor: &mut V, block: &mut BlockInstance) {
    if let Some(children) = block.children_mut() {
        for child in children {
            visitor.visit_block_mut(child);
        }
    }
}

/// Collects every block id in document order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl Visitor for IdCollector {
    fn visit_block(&mut self, block: &BlockInstance, _parent: Option<&BlockInstance>) {
        self.ids.push(block.id.clone());
        walk_block(self, block);
    }
}
