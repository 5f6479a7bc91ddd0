//! Money
//!
//! Prices are held as [`rusty_money::Money`] in minor units. The REST backend
//! speaks major units (`120` meaning 120.00), so conversion happens here and
//! nowhere else.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// A price in a fixed ISO currency.
pub type Price = Money<'static, Currency>;

/// Minor units per major unit, from the currency's ISO exponent (100 for
/// NGN, 1 for JPY).
pub fn minor_units_per_major(currency: &Currency) -> i64 {
    10_i64.saturating_pow(currency.exponent)
}

/// Errors converting between wire amounts and [`Price`].
#[derive(Debug, Error, PartialEq)]
pub enum MoneyConversionError {
    /// Amount does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    OutOfRange(Decimal),

    /// Currency code is not a known ISO currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Price {
    Money::from_minor(0, currency)
}

/// Whole major units, e.g. `major(50, NGN)` is 50.00.
pub fn major(amount: i64, currency: &'static Currency) -> Price {
    Money::from_minor(
        amount.saturating_mul(minor_units_per_major(currency)),
        currency,
    )
}

/// Price as a decimal in major units.
pub fn to_decimal(price: &Price) -> Decimal {
    Decimal::new(price.to_minor_units(), price.currency().exponent)
}

/// Build a price from a decimal amount in major units, rounding half away
/// from zero to the nearest minor unit.
///
/// # Errors
///
/// Returns [`MoneyConversionError::OutOfRange`] if the amount overflows.
pub fn from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Price, MoneyConversionError> {
    let minor = amount
        .checked_mul(Decimal::from(minor_units_per_major(currency)))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(MoneyConversionError::OutOfRange(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Look up an ISO currency by its alphabetic code (case-insensitive).
///
/// # Errors
///
/// Returns [`MoneyConversionError::UnknownCurrency`] for unknown codes.
pub fn currency(code: &str) -> Result<&'static Currency, MoneyConversionError> {
    Currency::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| MoneyConversionError::UnknownCurrency(code.to_string()))
}
