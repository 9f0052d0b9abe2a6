//! Handlers for payments.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::payment::{
    CreatePaymentRequest, PaymentResponse, RefundPaymentRequest, RefundResponse,
    validate_payment_id,
};
use crate::api::extractors::{ClientIdentity, CurrentUser, ValidatedJson};
use crate::application::services::policies;
use crate::domain::entities::PaymentProvider;
use crate::error::AppError;
use crate::state::AppState;

fn parse_provider(raw: &str) -> Result<PaymentProvider, AppError> {
    raw.parse()
        .map_err(|reason: String| AppError::invalid_field("provider", "unknown", reason))
}

/// Creates a payment with the requested gateway.
///
/// # Endpoint
///
/// `POST /api/payments`
///
/// The response carries what the client needs to finish the payment: the
/// Stripe client secret or the PayPal approval URL in `client_action`.
///
/// # Errors
///
/// Returns 400 for an unknown or unconfigured provider, 429 when the
/// `payment` budget is spent and 500 if the gateway call fails.
pub async fn create_payment_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    identity: ClientIdentity,
    ValidatedJson(payload): ValidatedJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    state
        .rate_limiter
        .enforce(policies::PAYMENT, identity.as_str())
        .await?;

    let (provider, request) = payload.into_payment_request(user.user_id);
    let intent = state.payment_service.create(provider, request).await?;

    Ok((StatusCode::CREATED, Json(intent.into())))
}

/// Captures an authorized payment of the caller.
///
/// # Endpoint
///
/// `POST /api/payments/{provider}/{id}/capture`
///
/// # Errors
///
/// Returns 400 for a malformed id or unknown provider and 403 when the
/// payment was created by another user.
pub async fn capture_payment_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    identity: ClientIdentity,
    Path((provider, payment_id)): Path<(String, String)>,
) -> Result<Json<PaymentResponse>, AppError> {
    let provider = parse_provider(&provider)?;
    validate_payment_id(&payment_id)?;

    state
        .rate_limiter
        .enforce(policies::PAYMENT, identity.as_str())
        .await?;

    let intent = state
        .payment_service
        .capture(user, provider, &payment_id)
        .await?;

    Ok(Json(intent.into()))
}

/// Refunds a payment, fully or for `amount_cents`.
///
/// # Endpoint
///
/// `POST /api/payments/{provider}/{id}/refund`
///
/// For PayPal `{id}` is the capture id returned by the capture call. A
/// partial refund names the payment currency next to `amount_cents`.
pub async fn refund_payment_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    identity: ClientIdentity,
    Path((provider, payment_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<RefundPaymentRequest>,
) -> Result<Json<RefundResponse>, AppError> {
    let provider = parse_provider(&provider)?;
    validate_payment_id(&payment_id)?;

    state
        .rate_limiter
        .enforce(policies::PAYMENT, identity.as_str())
        .await?;

    let refund = state
        .payment_service
        .refund(user, provider, &payment_id, payload.try_into()?)
        .await?;

    Ok(Json(refund.into()))
}
