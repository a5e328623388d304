//! Pipeline ingestion - single consumer applying queued transactions
//!
//! Producers hand transactions to an mpsc channel and return immediately;
//! this task is the only writer to the [`WindowBuffer`].

use super::types::{SummaryStats, Transaction};
use crate::stats::{WindowBuffer, WindowError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

/// Totals for one run of the ingestion loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub recorded: u64,
    pub dropped_too_old: u64,
    pub rejected_future: u64,
}

impl IngestionReport {
    pub fn processed(&self) -> u64 {
        self.recorded + self.dropped_too_old + self.rejected_future
    }
}

/// Start statistics ingestion from the transaction channel
///
/// Main loop:
/// 1. Receives transactions via mpsc channel
/// 2. Applies each one to the window buffer (one write lock per transaction)
/// 3. Periodically logs the current summary and throughput
///
/// Callers were already answered by the synchronous pre-check, so failures
/// here are logged and dropped, never propagated.
///
/// Runs until every sender is dropped.
pub async fn start_stats_ingestion(
    mut rx: mpsc::Receiver<Transaction>,
    buffer: Arc<WindowBuffer>,
    report_interval_ms: u64,
) -> IngestionReport {
    log::info!("🚀 Starting statistics ingestion");
    log::info!("   ├─ Window: {} buckets x {:?}", buffer.bucket_count(), buffer.bucket_duration());
    log::info!("   └─ Report interval: {}ms", report_interval_ms);

    let mut report_timer = interval(Duration::from_millis(report_interval_ms));
    let mut report = IngestionReport::default();
    let mut interval_count = 0u64;
    let mut last_log_time = std::time::Instant::now();

    loop {
        tokio::select! {
            message = rx.recv() => {
                let transaction = match message {
                    Some(transaction) => transaction,
                    None => {
                        log::warn!("⚠️  Transaction channel closed, stopping ingestion");
                        break;
                    }
                };

                apply_transaction(&buffer, transaction, &mut report);
                interval_count += 1;
            }

            _ = report_timer.tick() => {
                let summary = SummaryStats::from(buffer.summary());
                let elapsed = last_log_time.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 { interval_count as f64 / elapsed } else { 0.0 };

                log::info!(
                    "📊 Window: count={} sum={:.2} avg={:.2} | ingestion: {:.1} tx/sec | channel: {}",
                    summary.count,
                    summary.sum,
                    summary.avg,
                    rate,
                    rx.len()
                );

                last_log_time = std::time::Instant::now();
                interval_count = 0;
            }
        }
    }

    log::info!(
        "✅ Statistics ingestion stopped (recorded: {}, too old: {}, future: {})",
        report.recorded,
        report.dropped_too_old,
        report.rejected_future
    );
    report
}

fn apply_transaction(buffer: &WindowBuffer, transaction: Transaction, report: &mut IngestionReport) {
    match buffer.record(transaction.amount, transaction.timestamp) {
        Ok(true) => report.recorded += 1,
        Ok(false) => {
            // Aged out while queued
            log::debug!("Dropped transaction older than window (ts: {})", transaction.timestamp);
            report.dropped_too_old += 1;
        }
        Err(e @ WindowError::FutureTimestamp { .. }) => {
            log::warn!("⚠️  Transaction not recorded: {}", e);
            report.rejected_future += 1;
        }
        Err(e) => {
            log::error!("❌ Unexpected window error: {}", e);
        }
    }
}
