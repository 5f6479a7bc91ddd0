//! Payments service.

use async_trait::async_trait;
use bakehouse::orders::PaymentIntent;
use mockall::automock;
use tracing::{info, instrument};

use crate::{
    http::{ApiClient, ApiError},
    payments::models::{AuthorizationUrl, InitiateResponse, PaymentVerification},
};

/// Payments backed by `/api/payments`.
#[derive(Debug, Clone)]
pub struct HttpPaymentsService {
    client: ApiClient,
}

impl HttpPaymentsService {
    /// Create the service over a shared client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentsService for HttpPaymentsService {
    #[instrument(skip(self, intent), fields(order_id = %intent.order_id), err)]
    async fn initiate(&self, intent: &PaymentIntent) -> Result<AuthorizationUrl, ApiError> {
        let response: InitiateResponse = self
            .client
            .post(&["api", "payments", "initiate"], intent)
            .await?;

        let url = response
            .authorization_url()
            .ok_or(ApiError::MissingField("payment.authorization_url"))?;

        info!("payment initiated");

        Ok(url)
    }

    #[instrument(skip(self), err)]
    async fn complete_order(&self, reference: &str) -> Result<PaymentVerification, ApiError> {
        let verification: PaymentVerification = self
            .client
            .get(&["api", "payments", "complete-order", reference], &[])
            .await?;

        info!(status = ?verification.status(), "payment checked");

        Ok(verification)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Starts a provider payment for an existing order.
    async fn initiate(&self, intent: &PaymentIntent) -> Result<AuthorizationUrl, ApiError>;

    /// Verifies the payment identified by `reference` and finalizes its order.
    async fn complete_order(&self, reference: &str) -> Result<PaymentVerification, ApiError>;
}
