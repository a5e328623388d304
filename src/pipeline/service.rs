//! Transaction service - synchronous accept/reject plus queued application

use super::types::{SummaryStats, Transaction};
use crate::stats::WindowBuffer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Immediate answer given to a caller reporting a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Inside the window and queued for ingestion
    Accepted,
    /// Older than the window or ahead of the clock; not queued
    Rejected,
}

#[derive(Debug)]
pub enum ServiceError {
    /// Ingestion channel is at capacity
    QueueFull,
    /// Ingestion task has stopped
    QueueClosed,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::QueueFull => write!(f, "Ingestion queue is full"),
            ServiceError::QueueClosed => write!(f, "Ingestion queue is closed"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Front door to the window buffer.
///
/// Writes go through the ingestion channel; reads hit the buffer directly.
#[derive(Clone)]
pub struct TransactionService {
    tx: mpsc::Sender<Transaction>,
    buffer: Arc<WindowBuffer>,
}

impl TransactionService {
    pub fn new(tx: mpsc::Sender<Transaction>, buffer: Arc<WindowBuffer>) -> Self {
        Self { tx, buffer }
    }

    /// Pre-check the timestamp and enqueue without blocking.
    pub fn submit(&self, transaction: Transaction) -> Result<SubmitOutcome, ServiceError> {
        if !self.buffer.would_accept(transaction.timestamp) {
            log::debug!("Rejected transaction outside window (ts: {})", transaction.timestamp);
            return Ok(SubmitOutcome::Rejected);
        }

        match self.tx.try_send(transaction) {
            Ok(()) => Ok(SubmitOutcome::Accepted),
            Err(TrySendError::Full(_)) => {
                log::warn!("⚠️  Ingestion channel full, transaction not queued");
                Err(ServiceError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(ServiceError::QueueClosed),
        }
    }

    pub fn summary(&self) -> SummaryStats {
        SummaryStats::from(self.buffer.summary())
    }
}
