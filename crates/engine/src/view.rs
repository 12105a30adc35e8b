//! Drilldown: flattening the aggregation tree into the visible row sequence.
//!
//! The tree is built eagerly; this module only decides which rows are on
//! screen. A node's expansion is keyed by its path — the key values from the
//! root down to it — so expansion state survives recomputation as long as
//! the same groups reappear. Collapsing a parent hides its descendants
//! without touching their own expansion entries.

use rustc_hash::FxHashSet;

use crate::model::{EnhancedTransaction, GroupNode};

/// One row of the rendered report, borrowing from the computed tree.
#[derive(Debug, Clone, Copy)]
pub enum VisibleRow<'a> {
    /// A group header with its rolled-up aggregate.
    GroupSummary(&'a GroupNode),
    /// A detail row beneath its deepest enclosing group.
    LeafRow(&'a EnhancedTransaction),
}

/// Flatten the tree into the rows currently visible, honoring `expanded`.
///
/// Group-summary rows always appear for every child of the root; an
/// expanded node additionally interleaves its children (or, at the deepest
/// level, its detail rows) in tree order. Pure function of its arguments —
/// toggling expansion never re-runs aggregation.
pub fn visible_rows<'a>(
    root: &'a GroupNode,
    expanded: &FxHashSet<Vec<String>>,
) -> Vec<VisibleRow<'a>> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    for child in &root.children {
        walk(child, expanded, &mut path, &mut out);
    }
    out
}

fn walk<'a>(
    node: &'a GroupNode,
    expanded: &FxHashSet<Vec<String>>,
    path: &mut Vec<String>,
    out: &mut Vec<VisibleRow<'a>>,
) {
    out.push(VisibleRow::GroupSummary(node));
    path.push(node.key.clone());
    if expanded.contains(path.as_slice()) {
        for child in &node.children {
            walk(child, expanded, path, out);
        }
        for row in &node.rows {
            out.push(VisibleRow::LeafRow(row));
        }
    }
    path.pop();
}

/// Every expandable path in the tree, in tree order. Feed the result into
/// the expanded set to implement expand-all.
pub fn all_group_paths(root: &GroupNode) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    collect_paths(&root.children, &mut path, &mut out);
    out
}

fn collect_paths(nodes: &[GroupNode], path: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    for node in nodes {
        path.push(node.key.clone());
        if node.is_expandable() {
            out.push(path.clone());
        }
        collect_paths(&node.children, path, out);
        path.pop();
    }
}
