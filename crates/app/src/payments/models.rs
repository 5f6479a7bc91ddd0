//! Payment Models

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status the provider reports for a settled payment.
pub const SUCCESS_STATUS: &str = "success";

/// Provider-hosted page the customer is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationUrl(String);

impl AuthorizationUrl {
    /// Wrap a URL returned by the backend.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Borrow the URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorizationUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InitiateResponse {
    payment: Option<InitiatedPayment>,
}

#[derive(Debug, Deserialize)]
struct InitiatedPayment {
    authorization_url: Option<String>,
}

impl InitiateResponse {
    pub(crate) fn authorization_url(self) -> Option<AuthorizationUrl> {
        self.payment
            .and_then(|payment| payment.authorization_url)
            .filter(|url| !url.trim().is_empty())
            .map(AuthorizationUrl)
    }
}

/// `GET /api/payments/complete-order/:reference` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentVerification {
    /// Human-readable outcome from the backend
    #[serde(default)]
    pub message: Option<String>,

    /// Payment as reported by the provider
    #[serde(default)]
    pub payment: Option<PaymentDetails>,

    /// The finalized order
    #[serde(default)]
    pub order: Option<VerifiedOrder>,
}

impl PaymentVerification {
    /// Reported payment status, if any.
    pub fn status(&self) -> Option<&str> {
        self.payment.as_ref().map(|payment| payment.status.as_str())
    }

    /// Whether the payment settled. Only an exact `"success"` counts.
    pub fn is_successful(&self) -> bool {
        self.status() == Some(SUCCESS_STATUS)
    }
}

/// Provider payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Provider status
    #[serde(default)]
    pub status: String,

    /// Provider reference
    #[serde(default)]
    pub reference: Option<String>,

    /// Amount charged, as the provider reports it
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,

    /// ISO currency code
    #[serde(default)]
    pub currency: Option<String>,

    /// Paying customer
    #[serde(default)]
    pub customer: Option<PaymentCustomer>,
}

/// Paying customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCustomer {
    /// Customer email
    #[serde(default)]
    pub email: Option<String>,
}

/// Order echoed back after verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedOrder {
    /// Backend id
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    /// Lines as stored by the backend
    #[serde(default)]
    pub items: Vec<VerifiedItem>,
}

/// One finalized order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedItem {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Quantity
    #[serde(default, alias = "quantity")]
    pub qty: u32,

    /// Unit price in major units
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
}
