//! Integration tests for the statistics pipeline
//!
//! Tests verify the full flow:
//! - Gateway/service answer synchronously from the pre-check
//! - Accepted transactions reach the buffer through the single consumer
//! - Summaries stay correct with concurrent readers and writers

#[cfg(test)]
mod stats_pipeline_tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use txstats::pipeline::{
        start_stats_ingestion, Gateway, SubmitOutcome, Transaction, TransactionService,
    };
    use txstats::stats::{Clock, ManualClock, SystemClock, WindowBuffer};

    #[tokio::test]
    async fn test_submitted_transactions_reach_summary() {
        // Test: Many producers, one consumer, no lost updates
        let buffer = Arc::new(WindowBuffer::new(Duration::from_millis(20), 1_000).unwrap());
        let (tx, rx) = mpsc::channel::<Transaction>(100);
        let service = TransactionService::new(tx, buffer.clone());

        let ingestion = tokio::spawn(start_stats_ingestion(rx, buffer.clone(), 1_000));

        let timestamp = SystemClock.now_millis();
        let mut producers = Vec::new();
        for _ in 0..10 {
            let service = service.clone();
            producers.push(tokio::spawn(async move {
                service.submit(Transaction::new(1.0, timestamp)).unwrap()
            }));
        }
        for producer in producers {
            assert_eq!(producer.await.unwrap(), SubmitOutcome::Accepted);
        }

        drop(service);
        let report = ingestion.await.unwrap();
        assert_eq!(report.recorded, 10);

        let summary = buffer.summary();
        assert_eq!(summary.sum, 10.0);
        assert_eq!(summary.average(), 1.0);
        assert_eq!(summary.count, 10);
        assert_eq!(summary.max, 1.0);
        assert_eq!(summary.min, 1.0);
    }

    #[tokio::test]
    async fn test_gateway_end_to_end() {
        // Test: POST/GET through the gateway with a controlled clock
        let clock = Arc::new(ManualClock::new(1_478_192_204_000));
        let buffer = Arc::new(
            WindowBuffer::new_with_clock(Duration::from_millis(1), 60_000, clock.clone()).unwrap(),
        );
        let (tx, rx) = mpsc::channel::<Transaction>(100);
        let gateway = Gateway::new(TransactionService::new(tx, buffer.clone()));
        let ingestion = tokio::spawn(start_stats_ingestion(rx, buffer.clone(), 60_000));

        let now = clock.now_millis();
        let posts = [
            (format!(r#"{{"amount": 10.0, "timestamp": {}}}"#, now), 200),
            (format!(r#"{{"amount": 30.0, "timestamp": {}}}"#, now - 30_000), 200),
            (format!(r#"{{"amount": 99.0, "timestamp": {}}}"#, now - 60_000), 204),
            (format!(r#"{{"amount": 99.0, "timestamp": {}}}"#, now + 5), 204),
            ("{\"amount\": 1.0".to_string(), 400),
        ];
        for (body, status) in posts.iter() {
            assert_eq!(gateway.handle_transaction_post(body).status, *status, "{}", body);
        }

        drop(gateway);
        ingestion.await.unwrap();

        let summary = buffer.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.sum, 40.0);
        assert_eq!(summary.average(), 20.0);

        // The 30s-old transaction ages out first
        clock.advance(30_000);
        let summary = buffer.summary();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.max, 10.0);

        clock.advance(30_000);
        assert_eq!(buffer.summary().count, 0);
    }

    #[test]
    fn test_readers_concurrent_with_writer() {
        // Test: Readers never observe a partially applied write
        let clock = Arc::new(ManualClock::new(1_000_000));
        let buffer = Arc::new(
            WindowBuffer::new_with_clock(Duration::from_millis(5), 200, clock.clone()).unwrap(),
        );

        let writer = {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for _ in 0..2_000 {
                    assert!(buffer.record(2.0, 1_000_000).unwrap());
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let summary = buffer.summary();
                        assert_eq!(summary.sum, summary.count as f64 * 2.0);
                        assert!(summary.count <= 2_000);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(buffer.summary().count, 2_000);
    }
}
