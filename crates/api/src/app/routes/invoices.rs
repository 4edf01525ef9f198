//! `/api/invoice` endpoints.
//!
//! Handlers only do plumbing: resolve the customer (write routes), call one
//! service, then wrap the result in a success envelope. Collaborator failures
//! propagate as [`ApiError`]; failures while building the envelope become a
//! 400 error envelope.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Response,
    routing::{get, post, put},
};
use serde::Serialize;

use shopdesk_core::CustomerId;
use shopdesk_invoicing::{BuyProductRequest, RequestType};

use crate::app::envelope::{EnvelopeError, ResponseGenerator};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::TransactionContext;

pub fn router() -> Router {
    Router::new()
        .route("/buy/product", post(buy_product))
        .route("/getAllCustomerInvoice", get(all_customer_invoices))
        .route("/updateCustomerAndByproduct/:id", put(update_customer_purchase))
        .route("/getCustomerInvoiceId/:customer_id", get(customer_invoices_by_id))
        .route("/getCustomerInvoiceEmail/:customer_email", get(customer_invoices_by_email))
}

pub async fn buy_product(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<BuyProductRequest>,
) -> Result<Response, ApiError> {
    let customer = services.validator.validate(RequestType::Post, &body, None)?;
    let receipt = services
        .invoices
        .buy_product(customer, &body, RequestType::Post, None)?;

    let context = services.responses.transaction_context(&headers);
    Ok(respond(services.responses.as_ref(), &context, &receipt))
}

pub async fn all_customer_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let all = services.customers.all_customer_invoices()?;

    let context = services.responses.transaction_context(&headers);
    Ok(respond(services.responses.as_ref(), &context, &all))
}

pub async fn update_customer_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<BuyProductRequest>,
) -> Result<Response, ApiError> {
    let id: CustomerId = id.parse()?;

    let customer = services.validator.validate(RequestType::Put, &body, Some(id))?;
    let receipt = services
        .invoices
        .buy_product(customer, &body, RequestType::Put, Some(id))?;

    let context = services.responses.transaction_context(&headers);
    Ok(respond(services.responses.as_ref(), &context, &receipt))
}

pub async fn customer_invoices_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(customer_id): Path<String>,
) -> Result<Response, ApiError> {
    let auth = authorization(&headers)?;
    let found = services.customers.customer_invoices_by_id(&customer_id, auth)?;

    let context = services.responses.transaction_context(&headers);
    Ok(respond(services.responses.as_ref(), &context, &found))
}

pub async fn customer_invoices_by_email(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(customer_email): Path<String>,
) -> Result<Response, ApiError> {
    let auth = authorization(&headers)?;
    let found = services.customers.customer_invoices_by_email(&customer_email, auth)?;

    let context = services.responses.transaction_context(&headers);
    Ok(respond(services.responses.as_ref(), &context, &found))
}

/// Wrap `body` in a 200 envelope, or log and fall back to a 400 error
/// envelope carrying the failure message.
fn respond<T: Serialize>(
    responses: &dyn ResponseGenerator,
    context: &TransactionContext,
    body: &T,
) -> Response {
    let envelope = serde_json::to_value(body)
        .map_err(EnvelopeError::from)
        .and_then(|value| responses.success_response(context, value, StatusCode::OK));

    match envelope {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                transaction_id = %context.transaction_id(),
                error = %e,
                detail = ?e,
                "failed to build success envelope"
            );
            responses.error_response(context, &e.to_string(), StatusCode::BAD_REQUEST)
        }
    }
}

/// The raw `Authorization` header value, forwarded as-is.
fn authorization(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .ok_or(ApiError::MissingHeader("Authorization"))?
        .to_str()
        .map_err(|_| ApiError::MissingHeader("Authorization"))
}
