//! `ledgerlens-engine` — transaction aggregation and drilldown.
//!
//! Pure engine crate: receives a closed batch of transactions, returns a
//! roll-up tree. No I/O, no hidden state, no cross-call caching.
//!
//! Pipeline: raw records → [`Filters`] → key extraction (with period
//! [`bucket`]ing) → [`aggregate`] → [`Report`] tree → [`visible_rows`]
//! drilldown → export (in `ledgerlens-io`).
//!
//! The central numerical contract: every node's `weighted_rate` is
//! `sum_amount / sum_qty` from its rolled-up sums — volume-weighted at
//! every depth, never an average of child rates.

pub mod aggregate;
pub mod bucket;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod group;
pub mod model;
pub mod view;

pub use bucket::{bucket, Granularity};
pub use config::{GroupSpec, ReportState};
pub use engine::{aggregate, ReportSession, Ticket};
pub use error::EngineError;
pub use filter::Filters;
pub use model::{
    Aggregate, Dimension, EnhancedTransaction, GroupNode, Report, Transaction, Warnings,
};
pub use view::{all_group_paths, visible_rows, VisibleRow};
