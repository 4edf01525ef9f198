//! Standard success/error response envelopes.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::context::{TRANSACTION_ID_HEADER, TransactionContext};

/// Failure while turning a handler result into a success envelope.
///
/// Displays the underlying message unchanged; it is what clients see in the
/// error envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Header(#[from] InvalidHeaderValue),

    #[error("{0}")]
    Rejected(String),
}

/// Builds transaction contexts and response envelopes.
pub trait ResponseGenerator: Send + Sync {
    fn transaction_context(&self, headers: &HeaderMap) -> TransactionContext;

    fn success_response(
        &self,
        context: &TransactionContext,
        body: serde_json::Value,
        status: StatusCode,
    ) -> Result<Response, EnvelopeError>;

    fn error_response(&self, context: &TransactionContext, message: &str, status: StatusCode) -> Response;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessEnvelope<'a> {
    transaction_id: &'a str,
    status: String,
    status_code: u16,
    timestamp: DateTime<Utc>,
    data: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ErrorDetail<'a> {
    message: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope<'a> {
    transaction_id: &'a str,
    status: String,
    status_code: u16,
    timestamp: DateTime<Utc>,
    error: ErrorDetail<'a>,
}

/// Default envelope: `{transactionId, status, statusCode, timestamp, data|error}`
/// plus an `x-transaction-id` response header.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResponseGenerator;

impl ResponseGenerator for StandardResponseGenerator {
    fn transaction_context(&self, headers: &HeaderMap) -> TransactionContext {
        TransactionContext::from_headers(headers, Utc::now())
    }

    fn success_response(
        &self,
        context: &TransactionContext,
        body: serde_json::Value,
        status: StatusCode,
    ) -> Result<Response, EnvelopeError> {
        let header = HeaderValue::from_str(context.transaction_id())?;
        let envelope = SuccessEnvelope {
            transaction_id: context.transaction_id(),
            status: status_name(status),
            status_code: status.as_u16(),
            timestamp: Utc::now(),
            data: body,
        };

        let mut response = (status, Json(envelope)).into_response();
        response.headers_mut().insert(TRANSACTION_ID_HEADER, header);
        Ok(response)
    }

    fn error_response(&self, context: &TransactionContext, message: &str, status: StatusCode) -> Response {
        let envelope = ErrorEnvelope {
            transaction_id: context.transaction_id(),
            status: status_name(status),
            status_code: status.as_u16(),
            timestamp: Utc::now(),
            error: ErrorDetail { message },
        };

        let mut response = (status, Json(envelope)).into_response();
        if let Ok(header) = HeaderValue::from_str(context.transaction_id()) {
            response.headers_mut().insert(TRANSACTION_ID_HEADER, header);
        }
        response
    }
}

/// `StatusCode::BAD_REQUEST` -> `"BAD_REQUEST"`.
fn status_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_ascii_uppercase()
        .replace([' ', '-'], "_")
}
