//! Dispatch of payment operations to the configured gateways.

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::{
    AuthenticatedUser, PaymentIntent, PaymentProvider, PaymentRequest, Refund, RefundRequest,
};
use crate::domain::gateways::PaymentProcessor;
use crate::error::AppError;

/// Routes payment calls to a gateway by provider.
///
/// Only providers with credentials are registered; naming any other provider
/// is a client error. Gateway failures surface as [`AppError::Internal`].
///
/// Capture and refund are limited to the user recorded on the payment and to
/// admins; the owner is looked up at the gateway before acting.
pub struct PaymentService {
    processors: HashMap<PaymentProvider, Arc<dyn PaymentProcessor>>,
}

impl PaymentService {
    pub fn new(processors: Vec<Arc<dyn PaymentProcessor>>) -> Self {
        Self {
            processors: processors.into_iter().map(|p| (p.provider(), p)).collect(),
        }
    }

    /// Providers that can take payments, in a stable order.
    pub fn available_providers(&self) -> Vec<PaymentProvider> {
        let mut providers: Vec<_> = self.processors.keys().copied().collect();
        providers.sort_by_key(|p| p.as_str());
        providers
    }

    fn processor(&self, provider: PaymentProvider) -> Result<&Arc<dyn PaymentProcessor>, AppError> {
        self.processors.get(&provider).ok_or_else(|| {
            AppError::invalid_field(
                "provider",
                "unavailable",
                format!("Payment provider '{provider}' is not available"),
            )
        })
    }

    pub async fn create(
        &self,
        provider: PaymentProvider,
        request: PaymentRequest,
    ) -> Result<PaymentIntent, AppError> {
        let processor = self.processor(provider)?;
        let intent = processor.create_payment(&request).await?;

        info!(
            target: "audit",
            provider = %provider,
            user_id = request.user_id,
            property_id = ?request.property_id,
            payment_id = %intent.id,
            amount_cents = request.amount_cents,
            currency = %request.currency,
            "Payment created"
        );

        Ok(intent)
    }

    pub async fn capture(
        &self,
        caller: AuthenticatedUser,
        provider: PaymentProvider,
        payment_id: &str,
    ) -> Result<PaymentIntent, AppError> {
        let processor = self.processor(provider)?;
        if !caller.is_admin() {
            let owner = processor.payment_owner(payment_id).await?;
            ensure_payment_owner(caller, provider, payment_id, owner)?;
        }

        let intent = processor.capture(payment_id).await?;

        info!(
            target: "audit",
            provider = %provider,
            user_id = caller.user_id,
            payment_id,
            capture_id = ?intent.capture_id,
            "Payment captured"
        );

        Ok(intent)
    }

    pub async fn refund(
        &self,
        caller: AuthenticatedUser,
        provider: PaymentProvider,
        payment_id: &str,
        request: RefundRequest,
    ) -> Result<Refund, AppError> {
        if let Some(amount) = request.amount_cents
            && amount <= 0
        {
            return Err(AppError::invalid_field(
                "amount_cents",
                "range",
                "amount_cents must be positive",
            ));
        }

        let processor = self.processor(provider)?;
        if !caller.is_admin() {
            let owner = processor.refund_owner(payment_id).await?;
            ensure_payment_owner(caller, provider, payment_id, owner)?;
        }

        let refund = processor.refund(payment_id, &request).await?;

        info!(
            target: "audit",
            provider = %provider,
            user_id = caller.user_id,
            payment_id,
            refund_id = %refund.id,
            amount_cents = ?refund.amount_cents,
            "Payment refunded"
        );

        Ok(refund)
    }
}

fn ensure_payment_owner(
    caller: AuthenticatedUser,
    provider: PaymentProvider,
    payment_id: &str,
    owner: Option<i64>,
) -> Result<(), AppError> {
    if owner.is_some_and(|owner| caller.can_manage(owner)) {
        return Ok(());
    }

    warn!(
        target: "security",
        user_id = caller.user_id,
        provider = %provider,
        payment_id,
        owner = ?owner,
        "Forbidden access to payment of another user"
    );

    Err(AppError::forbidden(
        "You do not have access to this payment",
        json!({ "provider": provider.as_str(), "id": payment_id }),
    ))
}
