//! Checkout Errors

use bakehouse::{checkout::ValidationError, orders::OrderId};
use thiserror::Error;

use crate::{
    http::ApiError,
    sequencer::state::{Stage, TransitionError},
};

const ORDER_CREATION_FAILED: &str = "We couldn't place your order. Please try again.";

const PAYMENT_INITIATION_FAILED: &str =
    "Your order was received but we couldn't start the payment. Please try the payment again.";

const VERIFICATION_FAILED: &str =
    "We couldn't confirm your payment. Please reload this page to try again.";

const PAYMENT_NOT_SUCCESSFUL: &str =
    "Your payment was not successful. Please return to checkout and try again.";

const CHECKOUT_BUSY: &str = "Your order is already being processed.";

/// Why a checkout attempt stopped.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The form or cart failed local checks; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The backend did not record the order.
    #[error("failed to create order: {0}")]
    OrderCreation(#[source] ApiError),

    /// The order exists but no payment could be started for it.
    #[error("failed to initiate payment for order {order_id}: {source}")]
    PaymentInitiation {
        /// Order left awaiting payment
        order_id: OrderId,
        /// Underlying failure
        source: ApiError,
    },

    /// The verification request itself failed.
    #[error("failed to verify payment {reference}: {source}")]
    Verification {
        /// Provider reference
        reference: String,
        /// Underlying failure
        source: ApiError,
    },

    /// Verification succeeded but the payment did not.
    #[error("payment {reference} was not successful (status: {status})")]
    PaymentNotSuccessful {
        /// Provider reference
        reference: String,
        /// Reported status; empty when none was reported
        status: String,
        /// Backend message, when present
        message: Option<String>,
    },

    /// The action is not allowed in the current state.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl CheckoutError {
    /// Step the error belongs to; `None` for rejected transitions.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CheckoutError::Invalid(_) => Some(Stage::Validation),
            CheckoutError::OrderCreation(_) => Some(Stage::OrderCreation),
            CheckoutError::PaymentInitiation { .. } => Some(Stage::PaymentInitiation),
            CheckoutError::Verification { .. } | CheckoutError::PaymentNotSuccessful { .. } => {
                Some(Stage::PaymentVerification)
            }
            CheckoutError::Transition(_) => None,
        }
    }

    /// Message for the customer.
    ///
    /// Backend messages are passed through verbatim; transport failures and
    /// unstructured error bodies get a generic message for the step.
    pub fn user_message(&self) -> String {
        let (source, fallback) = match self {
            CheckoutError::Invalid(error) => return error.to_string(),
            CheckoutError::PaymentNotSuccessful { message, .. } => {
                return message
                    .clone()
                    .unwrap_or_else(|| PAYMENT_NOT_SUCCESSFUL.to_string());
            }
            CheckoutError::Transition(_) => return CHECKOUT_BUSY.to_string(),
            CheckoutError::OrderCreation(source) => (source, ORDER_CREATION_FAILED),
            CheckoutError::PaymentInitiation { source, .. } => (source, PAYMENT_INITIATION_FAILED),
            CheckoutError::Verification { source, .. } => (source, VERIFICATION_FAILED),
        };

        source.backend_message().unwrap_or(fallback).to_string()
    }
}
