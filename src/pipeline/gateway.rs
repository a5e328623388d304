//! Transport-agnostic request handlers
//!
//! Maps raw request bodies to service calls and back to status + body
//! pairs. Whatever transport sits in front only has to forward these.

use super::service::{SubmitOutcome, TransactionService};
use super::types::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

pub struct Gateway {
    service: TransactionService,
}

impl Gateway {
    pub fn new(service: TransactionService) -> Self {
        Self { service }
    }

    /// `POST /transactions`
    ///
    /// - 200: accepted and queued
    /// - 204: outside the window (too old or in the future)
    /// - 400: malformed payload
    /// - 503: ingestion queue full or stopped
    pub fn handle_transaction_post(&self, body: &str) -> GatewayResponse {
        let transaction = match Transaction::from_json(body) {
            Ok(transaction) => transaction,
            Err(e) => {
                log::debug!("Malformed transaction payload: {}", e);
                return GatewayResponse {
                    status: 400,
                    body: e.to_string(),
                };
            }
        };

        match self.service.submit(transaction) {
            Ok(SubmitOutcome::Accepted) => GatewayResponse::empty(200),
            Ok(SubmitOutcome::Rejected) => GatewayResponse::empty(204),
            Err(e) => GatewayResponse {
                status: 503,
                body: e.to_string(),
            },
        }
    }

    /// `GET /statistics`
    pub fn handle_statistics_get(&self) -> GatewayResponse {
        match self.service.summary().to_json() {
            Ok(body) => GatewayResponse { status: 200, body },
            Err(e) => {
                log::error!("❌ Failed to serialize summary: {}", e);
                GatewayResponse::empty(500)
            }
        }
    }
}
