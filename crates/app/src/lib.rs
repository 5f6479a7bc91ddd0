//! Bakehouse application: backend services, configuration and the order
//! submission sequencer.

pub mod catalog;
pub mod config;
pub mod context;
pub mod http;
pub mod observability;
pub mod orders;
pub mod payments;
pub mod sequencer;
