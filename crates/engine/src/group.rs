//! Key extraction and tree building.
//!
//! Records are partitioned by the primary dimension, then (when configured)
//! by the secondary dimension inside each primary group. Key values keep
//! **first-occurrence order** — the order they appear in the filtered
//! sequence — which is deterministic and stable without a sort pass. Leaf
//! nodes hold the detail rows; every inner node's aggregate is rolled up
//! from its direct children.

use rustc_hash::FxHashMap;

use crate::aggregate::{leaf_aggregate, rollup, weighted_rate};
use crate::bucket::{key_for, parse_date, Granularity};
use crate::config::GroupSpec;
use crate::model::{
    Aggregate, Dimension, EnhancedTransaction, GroupNode, Transaction, Warnings,
};

// ---------------------------------------------------------------------------
// Enhancement
// ---------------------------------------------------------------------------

/// Derive the per-pass fields for one record. Non-finite numerics are
/// coerced to 0 (counted once per record) so a single poisoned value cannot
/// spread NaN through every ancestor sum.
fn enhance(
    source: &Transaction,
    granularity: Option<Granularity>,
    warnings: &mut Warnings,
) -> EnhancedTransaction {
    let mut txn = source.clone();
    let mut coerced = false;
    for value in [&mut txn.qty, &mut txn.rate, &mut txn.amount] {
        if !value.is_finite() {
            *value = 0.0;
            coerced = true;
        }
    }
    if coerced {
        warnings.coerced_values += 1;
    }

    let date_bucket =
        granularity.and_then(|g| parse_date(&txn.date).ok().map(|d| key_for(d, g)));
    let unit_rate = weighted_rate(txn.amount, txn.qty);

    EnhancedTransaction {
        txn,
        date_bucket,
        unit_rate,
    }
}

fn key_of(row: &EnhancedTransaction, dim: Dimension) -> String {
    match dim {
        Dimension::Customer => row.txn.customer.clone(),
        Dimension::StockItem => row.txn.stockitem.clone(),
        // Rows without a bucket never reach a date partition (dropped in
        // build_tree), so the default only covers the impossible.
        Dimension::Date => row.date_bucket.clone().unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Split rows into one node per distinct key, first-occurrence order.
fn partition(rows: Vec<EnhancedTransaction>, dim: Dimension, depth: usize) -> Vec<GroupNode> {
    let mut nodes: Vec<GroupNode> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for row in rows {
        let key = key_of(&row, dim);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), nodes.len());
                nodes.push(empty_node(key, Some(dim), depth));
                nodes.len() - 1
            }
        };
        nodes[slot].rows.push(row);
    }
    nodes
}

fn empty_node(key: String, dim: Option<Dimension>, depth: usize) -> GroupNode {
    GroupNode {
        key,
        dim,
        depth,
        children: Vec::new(),
        rows: Vec::new(),
        aggregate: Aggregate::default(),
    }
}

fn seal_leaf(mut node: GroupNode) -> GroupNode {
    node.aggregate = leaf_aggregate(&node.rows);
    node
}

// ---------------------------------------------------------------------------
// Tree build
// ---------------------------------------------------------------------------

/// Build the aggregation tree for already-filtered records.
///
/// When a date dimension is active, records whose date does not parse are
/// dropped from the whole tree (a partial placement would break the
/// parent-sum invariant) and counted in `warnings.invalid_dates`. Without a
/// date dimension such records group normally.
pub fn build_tree(
    records: &[&Transaction],
    spec: &GroupSpec,
    warnings: &mut Warnings,
) -> GroupNode {
    let granularity = spec.active_granularity();

    let mut rows: Vec<EnhancedTransaction> = Vec::with_capacity(records.len());
    for source in records {
        let row = enhance(source, granularity, warnings);
        if granularity.is_some() && row.date_bucket.is_none() {
            warnings.invalid_dates += 1;
            continue;
        }
        rows.push(row);
    }

    let mut root = empty_node(String::new(), None, 0);

    match (spec.primary(), spec.secondary()) {
        (None, _) => {
            // No grouping: one implicit group carrying every detail row.
            let mut all = empty_node(String::new(), None, 0);
            all.rows = rows;
            root.children.push(seal_leaf(all));
        }
        (Some(primary), None) => {
            root.children = partition(rows, primary, 0).into_iter().map(seal_leaf).collect();
        }
        (Some(primary), Some(secondary)) => {
            root.children = partition(rows, primary, 0)
                .into_iter()
                .map(|mut node| {
                    let detail = std::mem::take(&mut node.rows);
                    node.children =
                        partition(detail, secondary, 1).into_iter().map(seal_leaf).collect();
                    node.aggregate = rollup(&node.children);
                    node
                })
                .collect();
        }
    }

    root.aggregate = rollup(&root.children);
    root
}
