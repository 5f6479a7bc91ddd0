//! Order submission sequencer
//!
//! Validation, order creation, payment initiation and payment verification,
//! run as one state machine so that no step can be started twice.

pub mod errors;
pub mod state;
mod workflow;

pub use errors::CheckoutError;
pub use state::{
    CheckoutEvent, CheckoutState, Failure, PaymentReceipt, Redirect, Stage, TransitionError,
};
pub use workflow::{CheckoutSequencer, DEFAULT_STEP_TIMEOUT};
