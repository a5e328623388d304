//! Real-time statistics over a trailing window of reported transactions.

pub mod pipeline;
pub mod stats;

pub use pipeline::{Gateway, StatsConfig, SummaryStats, Transaction, TransactionService};
pub use stats::{Aggregate, WindowBuffer, WindowError};
