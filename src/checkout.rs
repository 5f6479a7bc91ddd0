//! Checkout details and local validation
//!
//! Everything here runs before any network call. A validation failure is
//! shown inline and the checkout stays where it was.

use std::{fmt, sync::LazyLock};

use jiff::civil::DateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartStore;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|_| unreachable!("valid pattern"))
});

static LOCAL_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?234|0)[7-9][01]\d{8}$").unwrap_or_else(|_| unreachable!("valid pattern"))
});

/// Customer contact fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number in local format
    pub phone: String,

    /// Delivery or contact address
    pub address: String,
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMethod {
    /// Courier to the customer's address
    Delivery,

    /// Collected from the shop
    Pickup,
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMethod::Delivery => f.write_str("Delivery"),
            DeliveryMethod::Pickup => f.write_str("Pickup"),
        }
    }
}

/// Everything the checkout form collects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    /// Contact fields
    pub customer: CustomerDetails,

    /// Not chosen until the customer picks one
    pub delivery_method: Option<DeliveryMethod>,

    /// Requested delivery or pickup date and time
    pub delivery_at: Option<DateTime>,
}

/// A required form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Customer name
    Name,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Address
    Address,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone number",
            Field::Address => "address",
        })
    }
}

/// Local validation failures. The messages are user-facing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is blank.
    #[error("Please enter your {0}.")]
    Missing(Field),

    /// The email does not look like an address.
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    /// The phone number is not in local format.
    #[error("Please enter a valid phone number, e.g. 08012345678.")]
    InvalidPhone,

    /// No delivery method chosen.
    #[error("Please choose delivery or pickup.")]
    NoDeliveryMethod,

    /// Nothing to order.
    #[error("Your cart is empty.")]
    EmptyCart,
}

/// Check the form and cart before anything is sent.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, checking fields in form order.
pub fn validate(details: &CheckoutDetails, cart: &CartStore) -> Result<(), ValidationError> {
    let customer = &details.customer;

    for (field, value) in [
        (Field::Name, &customer.name),
        (Field::Email, &customer.email),
        (Field::Phone, &customer.phone),
        (Field::Address, &customer.address),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::Missing(field));
        }
    }

    if !is_valid_email(&customer.email) {
        return Err(ValidationError::InvalidEmail);
    }

    if !is_valid_phone(&customer.phone) {
        return Err(ValidationError::InvalidPhone);
    }

    if details.delivery_method.is_none() {
        return Err(ValidationError::NoDeliveryMethod);
    }

    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    Ok(())
}

/// Basic `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// Local mobile format, ignoring spaces and dashes.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    LOCAL_PHONE.is_match(&digits)
}
