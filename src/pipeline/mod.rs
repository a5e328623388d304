//! # Transaction Statistics Pipeline
//!
//! Glue between callers and the windowed statistics core.
//!
//! ## Architecture
//!
//! ```text
//! POST body ─► Gateway ─► TransactionService::submit
//!                            ├─ WindowBuffer::would_accept (sync answer)
//!                            └─ mpsc::try_send ─► start_stats_ingestion ─► WindowBuffer::record
//!
//! GET ─► Gateway ─► TransactionService::summary ─► WindowBuffer::summary
//! ```
//!
//! The buffer is built once by the runtime and shared through `Arc`; there is
//! no global instance.
//!
//! ## Module Organization
//!
//! - `types` - Transaction and SummaryStats payloads
//! - `config` - Environment configuration
//! - `ingestion` - Single-consumer channel processor
//! - `service` - Accept/reject and enqueue
//! - `gateway` - Status code mapping for whatever transport is in front

pub mod config;
pub mod gateway;
pub mod ingestion;
pub mod service;
pub mod types;

pub use config::StatsConfig;
pub use gateway::{Gateway, GatewayResponse};
pub use ingestion::{start_stats_ingestion, IngestionReport};
pub use service::{ServiceError, SubmitOutcome, TransactionService};
pub use types::{SummaryStats, Transaction};
