//! Roll-up math. The one rule that matters: a rate is always recomputed
//! from rolled-up sums (`sum_amount / sum_qty`), never averaged across
//! children — an average of averages misrepresents total economics whenever
//! group sizes differ.

use crate::model::{Aggregate, EnhancedTransaction, GroupNode};

/// Volume-weighted rate; `0` when the quantity nets to zero.
pub fn weighted_rate(sum_amount: f64, sum_qty: f64) -> f64 {
    if sum_qty == 0.0 {
        0.0
    } else {
        sum_amount / sum_qty
    }
}

/// Aggregate a leaf partition directly from its rows.
pub fn leaf_aggregate(rows: &[EnhancedTransaction]) -> Aggregate {
    let mut sum_qty = 0.0;
    let mut sum_amount = 0.0;
    for row in rows {
        sum_qty += row.txn.qty;
        sum_amount += row.txn.amount;
    }
    Aggregate {
        count: rows.len(),
        sum_qty,
        sum_amount,
        weighted_rate: weighted_rate(sum_amount, sum_qty),
    }
}

/// Aggregate an inner node as the elementwise sum of its direct children.
pub fn rollup(children: &[GroupNode]) -> Aggregate {
    let mut count = 0;
    let mut sum_qty = 0.0;
    let mut sum_amount = 0.0;
    for child in children {
        count += child.aggregate.count;
        sum_qty += child.aggregate.sum_qty;
        sum_amount += child.aggregate.sum_amount;
    }
    Aggregate {
        count,
        sum_qty,
        sum_amount,
        weighted_rate: weighted_rate(sum_amount, sum_qty),
    }
}
