use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const TRANSACTION_ID_HEADER: &str = "x-transaction-id";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const CLIENT_ID_HEADER: &str = "x-client-id";

const MAX_TRANSACTION_ID_LEN: usize = 128;

/// Per-request correlation data derived from the incoming headers.
///
/// Used to stamp response envelopes and log lines for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionContext {
    transaction_id: String,
    client_id: Option<String>,
    user_agent: Option<String>,
    received_at: DateTime<Utc>,
}

impl TransactionContext {
    pub fn new(
        transaction_id: impl Into<String>,
        client_id: Option<String>,
        user_agent: Option<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            client_id,
            user_agent,
            received_at,
        }
    }

    /// Build the context from request headers.
    ///
    /// The transaction id is taken from `x-transaction-id`, then
    /// `x-correlation-id`; a fresh UUIDv7 is used when neither carries a usable
    /// value.
    pub fn from_headers(headers: &HeaderMap, received_at: DateTime<Utc>) -> Self {
        let transaction_id = [TRANSACTION_ID_HEADER, CORRELATION_ID_HEADER]
            .into_iter()
            .filter_map(|name| header_text(headers, name))
            .find(|v| v.len() <= MAX_TRANSACTION_ID_LEN)
            .unwrap_or_else(|| Uuid::now_v7().to_string());

        Self {
            transaction_id,
            client_id: header_text(headers, CLIENT_ID_HEADER),
            user_agent: header_text(headers, axum::http::header::USER_AGENT.as_str()),
            received_at,
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
