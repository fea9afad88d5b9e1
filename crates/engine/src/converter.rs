//! Conversions between nested batch trees and flat parent-linked lists, and
//! the shaping of report trees.

use tracing::debug;

use batchtree_model::label::sampling_label;
use batchtree_model::{Batch, DenormalizedBatch, FlatTreeNode};

use crate::error::EngineError;

/// Rebuild trees from a flat list. Nodes without a parent are roots; every
/// other node is attached under the node whose id is its `parent_id`.
/// Nodes that cannot be reached from a root are dropped.
pub fn array_to_tree<T: FlatTreeNode>(nodes: Vec<T>) -> Vec<T> {
    let (roots, mut pool): (Vec<T>, Vec<T>) =
        nodes.into_iter().partition(|n| n.parent_id().is_none());

    let roots = roots
        .into_iter()
        .map(|mut root| {
            root.set_tree_level(1);
            attach_children(&mut root, &mut pool, 1);
            root
        })
        .collect();

    if !pool.is_empty() {
        debug!("{} batches not reachable from a root were dropped", pool.len());
    }
    roots
}

fn attach_children<T: FlatTreeNode>(node: &mut T, pool: &mut Vec<T>, level: u32) {
    let Some(id) = node.node_id() else { return };
    let (claimed, rest): (Vec<T>, Vec<T>) = std::mem::take(pool)
        .into_iter()
        .partition(|n| n.parent_id() == Some(id));
    *pool = rest;

    for mut child in claimed {
        child.set_tree_level(level + 1);
        attach_children(&mut child, pool, level + 1);
        node.children_mut().push(child);
    }
}

/// Flatten trees in pre-order. Children are detached and their `parent_id`
/// set to their parent's id, which must exist.
pub fn tree_to_array<T: FlatTreeNode>(roots: Vec<T>) -> Result<Vec<T>, EngineError> {
    let mut out = Vec::new();
    for root in roots {
        flatten_into(root, &mut out)?;
    }
    Ok(out)
}

fn flatten_into<T: FlatTreeNode>(mut node: T, out: &mut Vec<T>) -> Result<(), EngineError> {
    let children = std::mem::take(node.children_mut());
    let id = node.node_id();
    if !children.is_empty() && id.is_none() {
        return Err(EngineError::MissingId {
            label: node.node_label().to_string(),
        });
    }
    out.push(node);
    for mut child in children {
        child.set_parent_id(id);
        flatten_into(child, out)?;
    }
    Ok(())
}

/// Rebuild the catch batch tree from a flat list: the root without parent
/// whose label is empty or `CATCH_BATCH`.
pub fn batch_tree_from_array(batches: Vec<Batch>) -> Option<Batch> {
    array_to_tree(batches)
        .into_iter()
        .find(|root| !root.has_label() || root.is_catch_batch())
}

pub fn batch_tree_to_array(root: Batch) -> Result<Vec<Batch>, EngineError> {
    tree_to_array(vec![root])
}

/// Collapse single-child chains: while `node` has exactly one child that
/// `keep` rejects, that child is replaced by its own children.
pub fn filter_tree_components<T, F>(node: &mut T, keep: &F)
where
    T: FlatTreeNode,
    F: Fn(&T) -> bool,
{
    let id = node.node_id();
    loop {
        let children = node.children_mut();
        if children.len() != 1 || keep(&children[0]) {
            break;
        }
        let Some(mut hidden) = children.pop() else { break };
        let mut grandchildren = std::mem::take(hidden.children_mut());
        for grandchild in grandchildren.iter_mut() {
            grandchild.set_parent_id(id);
        }
        *children = grandchildren;
    }

    for child in node.children_mut() {
        filter_tree_components(child, keep);
    }
}

/// Drop every child rejected by `keep`, with its subtree. Returns whether
/// `node` itself is kept.
pub fn filter_recursively<T: FlatTreeNode>(node: &mut T, keep: &dyn Fn(&T) -> bool) -> bool {
    node.children_mut()
        .retain_mut(|child| filter_recursively(child, keep));
    keep(&*node)
}

/// Copy the values of each sampling child onto its parent, so a report
/// row shows what was sampled.
pub fn lift_sampling_values(node: &mut DenormalizedBatch) {
    for child in node.children.iter_mut() {
        lift_sampling_values(child);
    }

    let label = sampling_label(&node.label);
    let Some(sampling) = node.children.iter().find(|c| c.label == label) else {
        return;
    };
    let sampling_ratio = sampling.sampling_ratio;
    let sampling_ratio_text = sampling.sampling_ratio_text.clone();
    let weight = sampling.weight.clone();
    let indirect_weight = sampling.indirect_weight.clone();
    let individual_count = sampling.individual_count;
    let indirect_individual_count = sampling.indirect_individual_count;

    node.sampling_ratio = sampling_ratio;
    node.sampling_ratio_text = sampling_ratio_text;
    node.weight = weight;
    node.indirect_weight = indirect_weight;
    node.individual_count = individual_count;
    node.indirect_individual_count = indirect_individual_count;
}

/// Markers drawn in front of report rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentGlyphs {
    pub leaf: &'static str,
    pub last_leaf: &'static str,
    pub trunk: &'static str,
    pub blank: &'static str,
}

impl IndentGlyphs {
    pub const TEXT: IndentGlyphs = IndentGlyphs {
        leaf: "|-",
        last_leaf: "|_",
        trunk: "| ",
        blank: "  ",
    };

    pub const HTML: IndentGlyphs = IndentGlyphs {
        leaf: r#"<div class="tree-indent-leaf"></div>"#,
        last_leaf: r#"<div class="tree-indent-last-leaf"></div>"#,
        trunk: r#"<div class="tree-indent-trunk"></div>"#,
        blank: r#"<div class="tree-indent-blank"></div>"#,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndentOptions {
    pub html: bool,
}

impl IndentOptions {
    pub fn glyphs(&self) -> &'static IndentGlyphs {
        if self.html {
            &IndentGlyphs::HTML
        } else {
            &IndentGlyphs::TEXT
        }
    }
}

/// Set `tree_indent` and `tree_level` on `node` and its descendants.
/// `indent_stack` holds one marker per ancestor and is restored on return.
pub fn compute_tree_indent(
    node: &mut DenormalizedBatch,
    indent_stack: &mut Vec<&'static str>,
    is_last: bool,
    opts: &IndentOptions,
) {
    let glyphs = opts.glyphs();
    let marker = if is_last { glyphs.last_leaf } else { glyphs.leaf };
    node.tree_indent = format!("{}{marker}", indent_stack.concat());
    node.tree_level = Some(indent_stack.len() as u32 + 1);

    indent_stack.push(if is_last { glyphs.blank } else { glyphs.trunk });
    let count = node.children.len();
    for (index, child) in node.children.iter_mut().enumerate() {
        compute_tree_indent(child, indent_stack, index + 1 == count, opts);
    }
    indent_stack.pop();
}

/// Shape flat backend records into an indented report tree: sampling values
/// are lifted onto their parents, rows rejected by `keep` are dropped,
/// lone sampling rows are collapsed and indents computed.
///
/// Returns `None` when there is no root or `keep` rejects it.
pub fn prepare_report_tree<F>(
    records: Vec<DenormalizedBatch>,
    keep: F,
    opts: &IndentOptions,
) -> Option<DenormalizedBatch>
where
    F: Fn(&DenormalizedBatch) -> bool,
{
    let mut root = array_to_tree(records).into_iter().next()?;
    lift_sampling_values(&mut root);

    let keep_row = |b: &DenormalizedBatch| b.is_sampling_batch() || keep(b);
    if !filter_recursively(&mut root, &keep_row) {
        return None;
    }
    filter_tree_components(&mut root, &|b: &DenormalizedBatch| !b.is_sampling_batch());

    compute_tree_indent(&mut root, &mut Vec::new(), true, opts);
    Some(root)
}
