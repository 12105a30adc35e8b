use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single sale/purchase transaction as delivered by the ERP layer.
///
/// `date` stays text: the upstream system occasionally emits values that do
/// not parse, and those records must survive long enough for the warning
/// policy to count them. `amount` is trusted as given — nominally
/// `qty * rate` but never recomputed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub customer: String,
    pub stockitem: String,
    pub qty: f64,
    pub rate: f64,
    pub amount: f64,
}

/// A grouping dimension a report can partition by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Customer,
    StockItem,
    Date,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::StockItem => write!(f, "stockitem"),
            Self::Date => write!(f, "date"),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived rows
// ---------------------------------------------------------------------------

/// A transaction enriched for one aggregation pass.
///
/// `date_bucket` is the period key at the active granularity (`None` when no
/// date dimension is active, or when the date does not parse). `unit_rate`
/// is `amount / qty`, `0` when `qty == 0`. Both are recomputed on every
/// pass and never written back to the source record.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancedTransaction {
    #[serde(flatten)]
    pub txn: Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_bucket: Option<String>,
    pub unit_rate: f64,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Rolled-up statistics for one group node.
///
/// `weighted_rate` is `sum_amount / sum_qty` (`0` when `sum_qty == 0`) at
/// every level of the tree — recomputed from rolled-up sums, never averaged
/// across children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub count: usize,
    pub sum_qty: f64,
    pub sum_amount: f64,
    pub weighted_rate: f64,
}

/// One node of the aggregation tree.
///
/// Either `children` (inner node) or `rows` (deepest grouped level) is
/// populated, never both. Invariant: `aggregate.sum_qty`/`sum_amount` equal
/// the sums over children (or rows).
#[derive(Debug, Clone, Serialize)]
pub struct GroupNode {
    /// The dimension value or bucket label at this level. Empty for the
    /// synthetic root and the implicit all-rows group.
    pub key: String,
    /// Which dimension this level partitions by. `None` for the synthetic
    /// root and the implicit group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dim: Option<Dimension>,
    /// 0 = children of the root, 1 = nested level.
    pub depth: usize,
    pub children: Vec<GroupNode>,
    pub rows: Vec<EnhancedTransaction>,
    pub aggregate: Aggregate,
}

impl GroupNode {
    /// True for nodes that can be drilled into (have children or rows).
    pub fn is_expandable(&self) -> bool {
        !self.children.is_empty() || !self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Diagnostics + Output
// ---------------------------------------------------------------------------

/// Data-quality counters collected during a pass. The engine never aborts
/// on bad records and never prints; callers decide how to surface these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Warnings {
    /// Records whose date did not parse and were skipped or excluded.
    pub invalid_dates: usize,
    /// Numeric fields that were non-finite (or unparseable at import) and
    /// were coerced to 0.
    pub coerced_values: usize,
}

impl Warnings {
    pub fn is_empty(&self) -> bool {
        self.invalid_dates == 0 && self.coerced_values == 0
    }

    pub fn merge(&mut self, other: Warnings) {
        self.invalid_dates += other.invalid_dates;
        self.coerced_values += other.coerced_values;
    }
}

/// Result of one aggregation pass: the tree plus everything that went wrong.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Synthetic root; its children are the top-level groups (or a single
    /// implicit group holding all rows when no dimensions are configured).
    pub root: GroupNode,
    pub warnings: Warnings,
}
