//! Stats Runtime - transaction statistics service
//!
//! Wires the window buffer, ingestion task and gateway together and serves
//! requests from stdin:
//! - a line of transaction JSON is handled as `POST /transactions`
//! - `GET /statistics` (or `stats`) prints the current summary
//!
//! Usage:
//!   cargo run --release --bin stats_runtime < transactions.jsonl
//!
//! Environment variables:
//!   STATS_BUCKET_DURATION_MS - Bucket length (default: 1)
//!   STATS_BUCKET_COUNT - Buckets per window (default: 60000)
//!   STATS_CHANNEL_BUFFER - Ingestion channel size (default: 10000)
//!   STATS_REPORT_INTERVAL_MS - Summary log interval (default: 5000)

use dotenv::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use txstats::pipeline::{
    start_stats_ingestion, Gateway, StatsConfig, SummaryStats, Transaction, TransactionService,
};
use txstats::stats::WindowBuffer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    info!("🚀 Stats Runtime");

    let config = StatsConfig::from_env()?;
    info!("   ├─ Bucket duration: {}ms", config.bucket_duration_ms);
    info!("   ├─ Bucket count: {}", config.bucket_count);
    info!("   ├─ Window: {:?}", config.window_length());
    info!("   └─ Channel buffer: {} transactions", config.channel_buffer);

    let buffer = Arc::new(WindowBuffer::new(config.bucket_duration(), config.bucket_count)?);
    let (tx, rx) = mpsc::channel::<Transaction>(config.channel_buffer);

    let ingestion = tokio::spawn(start_stats_ingestion(
        rx,
        buffer.clone(),
        config.report_interval_ms,
    ));
    info!("✅ Ingestion task spawned");

    let gateway = Gateway::new(TransactionService::new(tx, buffer.clone()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!("🔄 Reading requests from stdin (CTRL+C to stop)");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let request = line.trim();
                        if request.is_empty() {
                            continue;
                        }
                        let response = if request == "GET /statistics" || request == "stats" {
                            gateway.handle_statistics_get()
                        } else {
                            gateway.handle_transaction_post(request)
                        };
                        println!("{} {}", response.status, response.body);
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Err(e) => {
                        error!("❌ Failed to read stdin: {}", e);
                        break;
                    }
                }
            }

            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    error!("❌ Failed to listen for CTRL+C: {}", err);
                }
                info!("⚠️  Received CTRL+C, shutting down...");
                break;
            }
        }
    }

    // Dropping the gateway drops the last sender and lets ingestion drain
    drop(gateway);
    match ingestion.await {
        Ok(report) => info!("✅ Ingestion processed {} transactions", report.processed()),
        Err(e) => error!("❌ Ingestion task failed: {}", e),
    }

    println!("{}", SummaryStats::from(buffer.summary()).to_json()?);
    info!("✅ Stats runtime stopped");
    Ok(())
}
