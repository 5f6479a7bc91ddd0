//! Checkout state machine
//!
//! Pure transition table; the sequencer feeds it events as each step
//! completes. Illegal transitions are errors rather than no-ops, which is what
//! stops a step being re-triggered while another is outstanding.

use std::fmt;

use bakehouse::orders::{OrderId, PaymentIntent};
use thiserror::Error;

use crate::payments::models::{AuthorizationUrl, PaymentVerification};

/// Step of the checkout a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Local checks on the form and cart
    Validation,

    /// `POST /api/orders`
    OrderCreation,

    /// `POST /api/payments/initiate`
    PaymentInitiation,

    /// `GET /api/payments/complete-order/:reference`
    PaymentVerification,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Validation => "validation",
            Stage::OrderCreation => "order creation",
            Stage::PaymentInitiation => "payment initiation",
            Stage::PaymentVerification => "payment verification",
        })
    }
}

/// Why the last attempt stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Step that failed
    pub stage: Stage,

    /// Message shown to the customer
    pub message: String,

    /// Payment that can still be started for an order the backend already
    /// recorded
    pub pending: Option<PaymentIntent>,
}

/// Confirmed payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    /// Provider reference the customer returned with
    pub reference: String,

    /// Backend verification result
    pub verification: PaymentVerification,
}

/// Where to send the customer to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Order being paid for
    pub order_id: OrderId,

    /// Provider-hosted payment page
    pub authorization_url: AuthorizationUrl,
}

/// Sequencer state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheckoutState {
    /// Nothing in flight
    #[default]
    Idle,

    /// Checking the form and cart
    Validating,

    /// Waiting for the backend to record the order
    CreatingOrder,

    /// Waiting for an authorization URL
    InitiatingPayment {
        /// Order being paid for
        order_id: OrderId,
    },

    /// Handed off to the payment provider
    RedirectingToPayment {
        /// Order being paid for
        order_id: OrderId,
        /// Provider-hosted payment page
        authorization_url: AuthorizationUrl,
    },

    /// Back from the provider, waiting for verification
    VerifyingPayment {
        /// Provider reference
        reference: String,
    },

    /// Payment confirmed
    Succeeded(PaymentReceipt),

    /// The last step failed
    Failed(Failure),
}

/// Something that happened to the checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEvent {
    /// The customer pressed "place order".
    Submit,

    /// Local checks passed.
    Validated,

    /// Local checks failed.
    ValidationFailed,

    /// The backend recorded the order.
    OrderCreated(OrderId),

    /// Retry payment for an order that already exists.
    ResumePayment(OrderId),

    /// The backend returned an authorization URL.
    PaymentInitiated(AuthorizationUrl),

    /// The customer came back from the provider with a reference.
    ReturnedFromProvider(String),

    /// The backend confirmed the payment.
    PaymentVerified(PaymentReceipt),

    /// A network step failed.
    Failed(Failure),

    /// Start over.
    Reset,
}

impl CheckoutEvent {
    /// Event name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutEvent::Submit => "submit",
            CheckoutEvent::Validated => "validated",
            CheckoutEvent::ValidationFailed => "validation_failed",
            CheckoutEvent::OrderCreated(_) => "order_created",
            CheckoutEvent::ResumePayment(_) => "resume_payment",
            CheckoutEvent::PaymentInitiated(_) => "payment_initiated",
            CheckoutEvent::ReturnedFromProvider(_) => "returned_from_provider",
            CheckoutEvent::PaymentVerified(_) => "payment_verified",
            CheckoutEvent::Failed(_) => "failed",
            CheckoutEvent::Reset => "reset",
        }
    }
}

/// An event that is not allowed in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot handle `{event}` while {state}")]
pub struct TransitionError {
    /// State name
    pub state: &'static str,

    /// Event name
    pub event: &'static str,
}

impl CheckoutState {
    /// State name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Validating => "validating",
            CheckoutState::CreatingOrder => "creating_order",
            CheckoutState::InitiatingPayment { .. } => "initiating_payment",
            CheckoutState::RedirectingToPayment { .. } => "redirecting_to_payment",
            CheckoutState::VerifyingPayment { .. } => "verifying_payment",
            CheckoutState::Succeeded(_) => "succeeded",
            CheckoutState::Failed(_) => "failed",
        }
    }

    /// A step is outstanding; the checkout controls should be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            CheckoutState::Validating
                | CheckoutState::CreatingOrder
                | CheckoutState::InitiatingPayment { .. }
                | CheckoutState::VerifyingPayment { .. }
        )
    }

    /// Payment that can be resumed after a failed initiation.
    pub fn pending_payment(&self) -> Option<&PaymentIntent> {
        match self {
            CheckoutState::Failed(failure) => failure.pending.as_ref(),
            _ => None,
        }
    }

    /// Apply `event`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if `event` is not allowed in this state.
    pub fn next(&self, event: CheckoutEvent) -> Result<CheckoutState, TransitionError> {
        let next = match (self, event) {
            (CheckoutState::Idle | CheckoutState::Failed(_), CheckoutEvent::Submit) => {
                CheckoutState::Validating
            }
            (CheckoutState::Validating, CheckoutEvent::Validated) => CheckoutState::CreatingOrder,
            (CheckoutState::Validating, CheckoutEvent::ValidationFailed) => CheckoutState::Idle,
            (CheckoutState::CreatingOrder, CheckoutEvent::OrderCreated(order_id)) => {
                CheckoutState::InitiatingPayment { order_id }
            }
            (
                CheckoutState::Idle | CheckoutState::Failed(_),
                CheckoutEvent::ResumePayment(order_id),
            ) => CheckoutState::InitiatingPayment { order_id },
            (
                CheckoutState::InitiatingPayment { order_id },
                CheckoutEvent::PaymentInitiated(authorization_url),
            ) => CheckoutState::RedirectingToPayment {
                order_id: order_id.clone(),
                authorization_url,
            },
            (state, CheckoutEvent::ReturnedFromProvider(reference)) if !state.is_busy() => {
                CheckoutState::VerifyingPayment { reference }
            }
            (CheckoutState::VerifyingPayment { .. }, CheckoutEvent::PaymentVerified(receipt)) => {
                CheckoutState::Succeeded(receipt)
            }
            (state, CheckoutEvent::Failed(failure))
                if state.is_busy() && !matches!(state, CheckoutState::Validating) =>
            {
                CheckoutState::Failed(failure)
            }
            (state, CheckoutEvent::Reset) if !state.is_busy() => CheckoutState::Idle,
            (state, event) => {
                return Err(TransitionError {
                    state: state.name(),
                    event: event.name(),
                });
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn failure(stage: Stage) -> Failure {
        Failure {
            stage,
            message: "boom".to_string(),
            pending: None,
        }
    }

    fn receipt() -> PaymentReceipt {
        PaymentReceipt {
            reference: "ref-1".to_string(),
            verification: PaymentVerification {
                message: None,
                payment: None,
                order: None,
            },
        }
    }

    #[test]
    fn happy_path() -> TestResult {
        let order_id = OrderId::new("o-1");
        let url = AuthorizationUrl::new("https://pay.example.com/x");

        let state = CheckoutState::Idle
            .next(CheckoutEvent::Submit)?
            .next(CheckoutEvent::Validated)?
            .next(CheckoutEvent::OrderCreated(order_id.clone()))?
            .next(CheckoutEvent::PaymentInitiated(url.clone()))?;

        assert_eq!(
            state,
            CheckoutState::RedirectingToPayment {
                order_id,
                authorization_url: url
            }
        );

        let state = state
            .next(CheckoutEvent::ReturnedFromProvider("ref-1".to_string()))?
            .next(CheckoutEvent::PaymentVerified(receipt()))?;

        assert_eq!(state, CheckoutState::Succeeded(receipt()));

        Ok(())
    }

    #[test]
    fn validation_failure_returns_to_idle() -> TestResult {
        let state = CheckoutState::Idle
            .next(CheckoutEvent::Submit)?
            .next(CheckoutEvent::ValidationFailed)?;

        assert_eq!(state, CheckoutState::Idle);

        Ok(())
    }

    #[test]
    fn busy_states_reject_resubmission() {
        let busy = [
            CheckoutState::Validating,
            CheckoutState::CreatingOrder,
            CheckoutState::InitiatingPayment {
                order_id: OrderId::new("o-1"),
            },
            CheckoutState::VerifyingPayment {
                reference: "ref-1".to_string(),
            },
        ];

        for state in busy {
            assert!(state.is_busy(), "{} should be busy", state.name());

            for event in [
                CheckoutEvent::Submit,
                CheckoutEvent::ResumePayment(OrderId::new("o-2")),
                CheckoutEvent::ReturnedFromProvider("ref-2".to_string()),
                CheckoutEvent::Reset,
            ] {
                let name = event.name();

                assert_eq!(
                    state.next(event),
                    Err(TransitionError {
                        state: state.name(),
                        event: name,
                    })
                );
            }
        }
    }

    #[test]
    fn network_steps_can_fail() -> TestResult {
        for state in [
            CheckoutState::CreatingOrder,
            CheckoutState::InitiatingPayment {
                order_id: OrderId::new("o-1"),
            },
            CheckoutState::VerifyingPayment {
                reference: "ref-1".to_string(),
            },
        ] {
            let next = state.next(CheckoutEvent::Failed(failure(Stage::OrderCreation)))?;

            assert!(matches!(next, CheckoutState::Failed(_)), "got {next:?}");
        }

        Ok(())
    }

    #[test]
    fn idle_and_redirect_cannot_fail() {
        for state in [
            CheckoutState::Idle,
            CheckoutState::Validating,
            CheckoutState::RedirectingToPayment {
                order_id: OrderId::new("o-1"),
                authorization_url: AuthorizationUrl::new("https://pay.example.com/x"),
            },
        ] {
            let result = state.next(CheckoutEvent::Failed(failure(Stage::OrderCreation)));

            assert!(result.is_err(), "{} accepted a failure", state.name());
        }
    }

    #[test]
    fn failed_state_allows_retry_and_resume() -> TestResult {
        let intent = PaymentIntent {
            email: "ada@example.com".to_string(),
            total_price: Decimal::from(172),
            order_id: OrderId::new("o-1"),
        };
        let failed = CheckoutState::Failed(Failure {
            stage: Stage::PaymentInitiation,
            message: "boom".to_string(),
            pending: Some(intent.clone()),
        });

        assert_eq!(failed.pending_payment(), Some(&intent));
        assert_eq!(failed.next(CheckoutEvent::Submit)?, CheckoutState::Validating);
        assert_eq!(
            failed.next(CheckoutEvent::ResumePayment(intent.order_id.clone()))?,
            CheckoutState::InitiatingPayment {
                order_id: intent.order_id
            }
        );
        assert_eq!(failed.next(CheckoutEvent::Reset)?, CheckoutState::Idle);

        Ok(())
    }

    #[test]
    fn verification_can_be_reloaded() -> TestResult {
        let failed = CheckoutState::Failed(failure(Stage::PaymentVerification));

        assert_eq!(
            failed.next(CheckoutEvent::ReturnedFromProvider("ref-1".to_string()))?,
            CheckoutState::VerifyingPayment {
                reference: "ref-1".to_string()
            }
        );

        Ok(())
    }

    #[test]
    fn redirect_is_final_until_reset() {
        let state = CheckoutState::RedirectingToPayment {
            order_id: OrderId::new("o-1"),
            authorization_url: AuthorizationUrl::new("https://pay.example.com/x"),
        };

        assert!(state.next(CheckoutEvent::Submit).is_err(), "resubmitted after redirect");
        assert!(
            state
                .next(CheckoutEvent::ResumePayment(OrderId::new("o-1")))
                .is_err(),
            "resumed after redirect"
        );
    }
}
