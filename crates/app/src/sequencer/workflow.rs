//! Order submission sequencer.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use bakehouse::{
    cart::CartStore,
    checkout::{self, CheckoutDetails},
    orders::{OrderRequest, PaymentIntent},
    pricing::PriceList,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    http::ApiError,
    orders::OrdersService,
    payments::PaymentsService,
    sequencer::{
        errors::CheckoutError,
        state::{CheckoutEvent, CheckoutState, Failure, PaymentReceipt, Redirect},
    },
};

/// Default limit on each network step.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives one checkout from form submission to verified payment.
///
/// Steps run strictly in order and a failure stops the attempt; nothing is
/// retried automatically. The cart is cleared only once the backend holds
/// the order and a payment page exists, and again after verified success.
pub struct CheckoutSequencer {
    orders: Arc<dyn OrdersService>,
    payments: Arc<dyn PaymentsService>,
    prices: PriceList,
    step_timeout: Duration,
    state: CheckoutState,
}

impl fmt::Debug for CheckoutSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutSequencer")
            .field("step_timeout", &self.step_timeout)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CheckoutSequencer {
    /// Create an idle sequencer.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        payments: Arc<dyn PaymentsService>,
        prices: PriceList,
    ) -> Self {
        Self {
            orders,
            payments,
            prices,
            step_timeout: DEFAULT_STEP_TIMEOUT,
            state: CheckoutState::Idle,
        }
    }

    /// Limit each network step to `timeout`.
    #[must_use]
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    /// Current state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Payment that can be resumed after a failed initiation.
    pub fn pending_payment(&self) -> Option<&PaymentIntent> {
        self.state.pending_payment()
    }

    /// Return to idle.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transition`] while a step is outstanding.
    pub fn reset(&mut self) -> Result<(), CheckoutError> {
        self.transition(CheckoutEvent::Reset)
    }

    /// Validate, create the order and start payment.
    ///
    /// On success the cart is cleared and the returned [`Redirect`] names the
    /// provider page to send the customer to.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Invalid`] without any network call if local
    /// checks fail, or the error of whichever network step failed. The cart
    /// is left untouched on every error.
    #[instrument(skip_all, fields(lines = cart.len()))]
    pub async fn submit(
        &mut self,
        cart: &mut CartStore,
        details: &CheckoutDetails,
    ) -> Result<Redirect, CheckoutError> {
        self.transition(CheckoutEvent::Submit)?;

        if let Err(error) = checkout::validate(details, cart) {
            warn!(%error, "checkout rejected locally");
            self.transition(CheckoutEvent::ValidationFailed)?;

            return Err(error.into());
        }

        self.transition(CheckoutEvent::Validated)?;

        let order = OrderRequest::from_cart(details, cart, &self.prices);

        let created = within(self.step_timeout, self.orders.create_order(&order)).await;

        let order_id = match created {
            Ok(order_id) => order_id,
            Err(source) => return Err(self.fail(CheckoutError::OrderCreation(source), None)),
        };

        self.transition(CheckoutEvent::OrderCreated(order_id.clone()))?;

        self.start_payment(cart, PaymentIntent::for_order(&order, order_id))
            .await
    }

    /// Start payment again for an order the backend already holds.
    ///
    /// No new order is created.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transition`] while a step is outstanding, or
    /// [`CheckoutError::PaymentInitiation`] if payment cannot be started.
    #[instrument(skip_all, fields(order_id = %intent.order_id))]
    pub async fn resume_payment(
        &mut self,
        cart: &mut CartStore,
        intent: PaymentIntent,
    ) -> Result<Redirect, CheckoutError> {
        self.transition(CheckoutEvent::ResumePayment(intent.order_id.clone()))?;

        self.start_payment(cart, intent).await
    }

    /// Verify the payment the customer returned from and finalize the order.
    ///
    /// The cart is cleared on confirmed success.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Verification`] if the backend cannot be asked,
    /// or [`CheckoutError::PaymentNotSuccessful`] for any status other than
    /// `"success"`.
    #[instrument(skip(self, cart))]
    pub async fn verify(
        &mut self,
        cart: &mut CartStore,
        reference: &str,
    ) -> Result<PaymentReceipt, CheckoutError> {
        self.transition(CheckoutEvent::ReturnedFromProvider(reference.to_string()))?;

        let checked = within(self.step_timeout, self.payments.complete_order(reference)).await;

        let verification = match checked {
            Ok(verification) => verification,
            Err(source) => {
                let error = CheckoutError::Verification {
                    reference: reference.to_string(),
                    source,
                };

                return Err(self.fail(error, None));
            }
        };

        if !verification.is_successful() {
            let error = CheckoutError::PaymentNotSuccessful {
                reference: reference.to_string(),
                status: verification.status().unwrap_or_default().to_string(),
                message: verification.message.clone(),
            };

            return Err(self.fail(error, None));
        }

        let receipt = PaymentReceipt {
            reference: reference.to_string(),
            verification,
        };

        self.transition(CheckoutEvent::PaymentVerified(receipt.clone()))?;
        cart.clear();

        info!("payment verified");

        Ok(receipt)
    }

    async fn start_payment(
        &mut self,
        cart: &mut CartStore,
        intent: PaymentIntent,
    ) -> Result<Redirect, CheckoutError> {
        let initiated = within(self.step_timeout, self.payments.initiate(&intent)).await;

        let authorization_url = match initiated {
            Ok(url) => url,
            Err(source) => {
                let error = CheckoutError::PaymentInitiation {
                    order_id: intent.order_id.clone(),
                    source,
                };

                return Err(self.fail(error, Some(intent)));
            }
        };

        self.transition(CheckoutEvent::PaymentInitiated(authorization_url.clone()))?;
        cart.clear();

        info!(order_id = %intent.order_id, "redirecting to payment");

        Ok(Redirect {
            order_id: intent.order_id,
            authorization_url,
        })
    }

    fn transition(&mut self, event: CheckoutEvent) -> Result<(), CheckoutError> {
        let event_name = event.name();
        let next = self.state.next(event)?;

        debug!(
            from = self.state.name(),
            to = next.name(),
            event = event_name,
            "checkout transition"
        );

        self.state = next;

        Ok(())
    }

    fn fail(&mut self, error: CheckoutError, pending: Option<PaymentIntent>) -> CheckoutError {
        let Some(stage) = error.stage() else {
            return error;
        };

        warn!(%stage, %error, "checkout step failed");

        let failure = Failure {
            stage,
            message: error.user_message(),
            pending,
        };

        match self.transition(CheckoutEvent::Failed(failure)) {
            Ok(()) => error,
            Err(transition) => transition,
        }
    }
}

async fn within<T>(
    limit: Duration,
    step: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(limit, step)
        .await
        .unwrap_or_else(|_elapsed| Err(ApiError::Timeout))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bakehouse::{
        cakes::CakeOptions,
        checkout::{CustomerDetails, DeliveryMethod, ValidationError},
        money::major,
        orders::OrderId,
        products::Product,
    };
    use rust_decimal::Decimal;
    use rusty_money::iso::NGN;
    use testresult::TestResult;

    use crate::{
        orders::MockOrdersService,
        payments::{
            MockPaymentsService,
            models::{AuthorizationUrl, PaymentDetails, PaymentVerification},
        },
        sequencer::state::Stage,
    };

    use super::*;

    const PAY_URL: &str = "https://checkout.paystack.com/abc123";

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            customer: CustomerDetails {
                name: "Ada Obi".to_string(),
                email: "ada@example.com".to_string(),
                phone: "0803 123 4567".to_string(),
                address: "12 Allen Avenue, Ikeja".to_string(),
            },
            delivery_method: Some(DeliveryMethod::Delivery),
            delivery_at: None,
        }
    }

    fn filled_cart() -> Result<CartStore, bakehouse::cart::CartError> {
        let prices = PriceList::standard(NGN);
        let mut cart = CartStore::new(NGN);

        cart.add_product(&Product::new("p1", "Bread", major(120, NGN)))?;
        cart.add_custom_cake(prices.quote(
            CakeOptions::default()
                .flavor("Chocolate")
                .topping("Sprinkles"),
        ));

        Ok(cart)
    }

    fn sequencer(orders: MockOrdersService, payments: MockPaymentsService) -> CheckoutSequencer {
        CheckoutSequencer::new(Arc::new(orders), Arc::new(payments), PriceList::standard(NGN))
    }

    fn verification(status: &str, message: Option<&str>) -> PaymentVerification {
        PaymentVerification {
            message: message.map(str::to_string),
            payment: Some(PaymentDetails {
                status: status.to_string(),
                reference: Some("ref-1".to_string()),
                amount: Some(Decimal::from(172)),
                currency: Some("NGN".to_string()),
                customer: None,
            }),
            order: None,
        }
    }

    #[tokio::test]
    async fn submit_creates_order_and_redirects() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut payments = MockPaymentsService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|order| {
                order.total_price == Decimal::from(172)
                    && order.items.len() == 2
                    && order.delivery_method == DeliveryMethod::Delivery
            })
            .return_once(|_| Ok(OrderId::new("o-1")));

        payments
            .expect_initiate()
            .once()
            .withf(|intent| {
                intent.order_id == OrderId::new("o-1")
                    && intent.email == "ada@example.com"
                    && intent.total_price == Decimal::from(172)
            })
            .return_once(|_| Ok(AuthorizationUrl::new(PAY_URL)));

        let mut sequencer = sequencer(orders, payments);
        let mut cart = filled_cart()?;

        let redirect = sequencer.submit(&mut cart, &details()).await?;

        assert_eq!(redirect.order_id, OrderId::new("o-1"));
        assert_eq!(redirect.authorization_url.as_str(), PAY_URL);
        assert!(cart.is_empty(), "cart cleared once payment page exists");
        assert_eq!(
            sequencer.state(),
            &CheckoutState::RedirectingToPayment {
                order_id: OrderId::new("o-1"),
                authorization_url: AuthorizationUrl::new(PAY_URL),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn invalid_email_makes_no_network_calls() -> TestResult {
        let mut sequencer = sequencer(MockOrdersService::new(), MockPaymentsService::new());
        let mut cart = filled_cart()?;
        let mut details = details();
        details.customer.email = "not-an-email".to_string();

        let result = sequencer.submit(&mut cart, &details).await;

        assert!(
            matches!(
                result,
                Err(CheckoutError::Invalid(ValidationError::InvalidEmail))
            ),
            "expected InvalidEmail, got {result:?}"
        );
        assert_eq!(sequencer.state(), &CheckoutState::Idle);
        assert_eq!(cart.count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_locally() -> TestResult {
        let mut sequencer = sequencer(MockOrdersService::new(), MockPaymentsService::new());
        let mut cart = CartStore::new(NGN);

        let result = sequencer.submit(&mut cart, &details()).await;

        assert!(
            matches!(result, Err(CheckoutError::Invalid(ValidationError::EmptyCart))),
            "expected EmptyCart, got {result:?}"
        );
        assert_eq!(sequencer.state(), &CheckoutState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn order_creation_failure_keeps_cart() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(|_| {
            Err(ApiError::Backend {
                status: 422,
                message: Some("Nuts are unavailable this week".to_string()),
            })
        });

        let mut sequencer = sequencer(orders, MockPaymentsService::new());
        let mut cart = filled_cart()?;

        let result = sequencer.submit(&mut cart, &details()).await;

        let Err(error) = result else {
            panic!("expected an error");
        };

        assert!(
            matches!(error, CheckoutError::OrderCreation(_)),
            "expected OrderCreation, got {error:?}"
        );
        assert_eq!(error.user_message(), "Nuts are unavailable this week");
        assert_eq!(cart.count(), 2);

        let CheckoutState::Failed(failure) = sequencer.state() else {
            panic!("expected Failed, got {:?}", sequencer.state());
        };

        assert_eq!(failure.stage, Stage::OrderCreation);
        assert_eq!(failure.message, "Nuts are unavailable this week");
        assert_eq!(failure.pending, None);

        Ok(())
    }

    #[tokio::test]
    async fn payment_initiation_failure_keeps_cart_and_order() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut payments = MockPaymentsService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Ok(OrderId::new("o-1")));

        payments.expect_initiate().once().return_once(|_| {
            Err(ApiError::Backend {
                status: 502,
                message: Some("Payment provider unavailable".to_string()),
            })
        });

        let mut sequencer = sequencer(orders, payments);
        let mut cart = filled_cart()?;

        let result = sequencer.submit(&mut cart, &details()).await;

        let Err(error) = result else {
            panic!("expected an error");
        };

        assert!(
            matches!(error, CheckoutError::PaymentInitiation { .. }),
            "expected PaymentInitiation, got {error:?}"
        );
        assert_eq!(error.user_message(), "Payment provider unavailable");
        assert_eq!(cart.count(), 2, "cart survives a failed payment start");
        assert_eq!(
            sequencer.pending_payment().map(|intent| &intent.order_id),
            Some(&OrderId::new("o-1"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn resume_payment_reuses_existing_order() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut payments = MockPaymentsService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Ok(OrderId::new("o-1")));

        let mut attempts = 0;
        payments.expect_initiate().times(2).returning(move |_| {
            attempts += 1;

            if attempts == 1 {
                Err(ApiError::Timeout)
            } else {
                Ok(AuthorizationUrl::new(PAY_URL))
            }
        });

        let mut sequencer = sequencer(orders, payments);
        let mut cart = filled_cart()?;

        let first = sequencer.submit(&mut cart, &details()).await;
        assert!(first.is_err(), "first payment start fails");

        let intent = sequencer
            .pending_payment()
            .cloned()
            .ok_or("no pending payment")?;

        let redirect = sequencer.resume_payment(&mut cart, intent).await?;

        assert_eq!(redirect.order_id, OrderId::new("o-1"));
        assert!(cart.is_empty(), "cart cleared once payment page exists");

        Ok(())
    }

    #[tokio::test]
    async fn missing_order_id_fails_with_generic_message() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Err(ApiError::MissingField("_id")));

        let mut sequencer = sequencer(orders, MockPaymentsService::new());
        let mut cart = filled_cart()?;

        let result = sequencer.submit(&mut cart, &details()).await;

        let Err(error) = result else {
            panic!("expected an error");
        };

        assert_eq!(
            error.user_message(),
            "We couldn't place your order. Please try again."
        );

        Ok(())
    }

    struct StalledOrders;

    #[async_trait]
    impl OrdersService for StalledOrders {
        async fn create_order(&self, _order: &OrderRequest) -> Result<OrderId, ApiError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn hung_step_times_out() -> TestResult {
        let mut sequencer = CheckoutSequencer::new(
            Arc::new(StalledOrders),
            Arc::new(MockPaymentsService::new()),
            PriceList::standard(NGN),
        )
        .with_step_timeout(Duration::from_millis(20));

        let mut cart = filled_cart()?;

        let result = sequencer.submit(&mut cart, &details()).await;

        assert!(
            matches!(result, Err(CheckoutError::OrderCreation(ApiError::Timeout))),
            "expected a timeout, got {result:?}"
        );
        assert!(
            matches!(sequencer.state(), CheckoutState::Failed(_)),
            "expected Failed, got {:?}",
            sequencer.state()
        );
        assert_eq!(cart.count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn verify_success_clears_cart() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_complete_order()
            .once()
            .withf(|reference| reference == "ref-1")
            .return_once(|_| Ok(verification("success", Some("Payment verified"))));

        let mut sequencer = sequencer(MockOrdersService::new(), payments);
        let mut cart = filled_cart()?;

        let receipt = sequencer.verify(&mut cart, "ref-1").await?;

        assert_eq!(receipt.reference, "ref-1");
        assert_eq!(
            receipt
                .verification
                .payment
                .as_ref()
                .and_then(|payment| payment.amount),
            Some(Decimal::from(172))
        );
        assert!(cart.is_empty(), "cart cleared on verified payment");
        assert!(
            matches!(sequencer.state(), CheckoutState::Succeeded(_)),
            "expected Succeeded, got {:?}",
            sequencer.state()
        );

        Ok(())
    }

    #[tokio::test]
    async fn verify_failed_status_is_not_success() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_complete_order()
            .once()
            .return_once(|_| Ok(verification("failed", None)));

        let mut sequencer = sequencer(MockOrdersService::new(), payments);
        let mut cart = filled_cart()?;

        let result = sequencer.verify(&mut cart, "ref-1").await;

        let Err(error) = result else {
            panic!("expected an error");
        };

        assert!(
            matches!(
                &error,
                CheckoutError::PaymentNotSuccessful { status, .. } if status == "failed"
            ),
            "expected PaymentNotSuccessful, got {error:?}"
        );
        assert_eq!(
            error.user_message(),
            "Your payment was not successful. Please return to checkout and try again."
        );
        assert_eq!(cart.count(), 2, "cart kept when payment fails");

        let CheckoutState::Failed(failure) = sequencer.state() else {
            panic!("expected Failed, got {:?}", sequencer.state());
        };

        assert_eq!(failure.stage, Stage::PaymentVerification);

        Ok(())
    }

    #[tokio::test]
    async fn verify_transport_failure_can_be_reloaded() -> TestResult {
        let mut payments = MockPaymentsService::new();
        let mut calls = 0;

        payments.expect_complete_order().times(2).returning(move |_| {
            calls += 1;

            if calls == 1 {
                Err(ApiError::Timeout)
            } else {
                Ok(verification("success", None))
            }
        });

        let mut sequencer = sequencer(MockOrdersService::new(), payments);
        let mut cart = CartStore::new(NGN);

        let first = sequencer.verify(&mut cart, "ref-1").await;

        assert!(
            matches!(first, Err(CheckoutError::Verification { .. })),
            "expected Verification, got {first:?}"
        );

        sequencer.verify(&mut cart, "ref-1").await?;

        Ok(())
    }

    #[tokio::test]
    async fn cannot_resubmit_after_redirect() -> TestResult {
        let mut orders = MockOrdersService::new();
        let mut payments = MockPaymentsService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_| Ok(OrderId::new("o-1")));
        payments
            .expect_initiate()
            .once()
            .return_once(|_| Ok(AuthorizationUrl::new(PAY_URL)));

        let mut sequencer = sequencer(orders, payments);
        let mut cart = filled_cart()?;

        sequencer.submit(&mut cart, &details()).await?;

        let mut cart = filled_cart()?;
        let again = sequencer.submit(&mut cart, &details()).await;

        assert!(
            matches!(again, Err(CheckoutError::Transition(_))),
            "expected Transition, got {again:?}"
        );
        assert_eq!(cart.count(), 2);

        sequencer.reset()?;
        assert_eq!(sequencer.state(), &CheckoutState::Idle);

        Ok(())
    }
}
