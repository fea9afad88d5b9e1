use batchtree_model::{Batch, EmptyOptions};

/// Drop empty leaves, bottom-up. Returns true when `batch` itself ended up
/// empty, so the caller can drop it as well.
///
/// Taxa and children are not counted as content here: a batch holding only
/// a taxon and no data is empty.
pub fn clean_tree(batch: &mut Batch) -> bool {
    batch.children.retain_mut(|child| !clean_tree(child));
    batch.children.is_empty() && batch.is_empty(EmptyOptions::own_values())
}
