use batchtree_core::BatchId;

use crate::batch::Batch;
use crate::denormalized::DenormalizedBatch;

/// A tree node that also has a flat form: an id and a `parent_id`
/// back-reference instead of owned children.
pub trait FlatTreeNode: Sized {
    fn node_id(&self) -> Option<BatchId>;

    fn parent_id(&self) -> Option<BatchId>;

    fn set_parent_id(&mut self, parent_id: Option<BatchId>);

    fn node_label(&self) -> &str;

    fn children_mut(&mut self) -> &mut Vec<Self>;

    /// Called when the node is attached at `level` (root = 1).
    fn set_tree_level(&mut self, _level: u32) {}
}

impl FlatTreeNode for Batch {
    fn node_id(&self) -> Option<BatchId> {
        self.id
    }

    fn parent_id(&self) -> Option<BatchId> {
        self.parent_id
    }

    fn set_parent_id(&mut self, parent_id: Option<BatchId>) {
        self.parent_id = parent_id;
    }

    fn node_label(&self) -> &str {
        self.label()
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

impl FlatTreeNode for DenormalizedBatch {
    fn node_id(&self) -> Option<BatchId> {
        self.id
    }

    fn parent_id(&self) -> Option<BatchId> {
        self.parent_id
    }

    fn set_parent_id(&mut self, parent_id: Option<BatchId>) {
        self.parent_id = parent_id;
    }

    fn node_label(&self) -> &str {
        &self.label
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    fn set_tree_level(&mut self, level: u32) {
        self.tree_level = Some(level);
    }
}
