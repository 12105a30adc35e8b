//! `ledgerlens-io` — CSV text import/export over the engine's types.
//!
//! Operates on strings only; reading and writing actual files (or a share
//! sheet) stays with the enclosing application.

pub mod export;
pub mod import;

pub use export::export_csv;
pub use import::read_transactions;
