//! Price list files
//!
//! Surcharge tables can be shipped as YAML instead of using
//! [`PriceList::standard`]:
//!
//! ```yaml
//! base: "50 NGN"
//! flavors:
//!   Chocolate: "0 NGN"
//!   Red Velvet: "10 NGN"
//! sizes:
//!   8-inch: "30 NGN"
//! toppings:
//!   Sprinkles: "2 NGN"
//! ```

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    money::{self, MoneyConversionError, Price},
    pricing::{CakeOption, PriceList, PricingError},
};

/// Price list loading errors
#[derive(Debug, Error)]
pub enum PriceListError {
    /// IO error reading the file
    #[error("failed to read price list: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse price list YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price string is not `AMOUNT CURRENCY`
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Unknown currency, or an amount out of range
    #[error(transparent)]
    Money(#[from] MoneyConversionError),

    /// Negative or mixed-currency surcharge
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Price list as written in YAML
#[derive(Debug, Deserialize)]
struct PriceListFile {
    base: String,

    #[serde(default)]
    flavors: FxHashMap<String, String>,

    #[serde(default)]
    sizes: FxHashMap<String, String>,

    #[serde(default)]
    layers: FxHashMap<String, String>,

    #[serde(default)]
    icings: FxHashMap<String, String>,

    #[serde(default)]
    toppings: FxHashMap<String, String>,
}

impl PriceListFile {
    fn table(&self, option: CakeOption) -> &FxHashMap<String, String> {
        match option {
            CakeOption::Flavor => &self.flavors,
            CakeOption::Size => &self.sizes,
            CakeOption::Layers => &self.layers,
            CakeOption::Icing => &self.icings,
            CakeOption::Topping => &self.toppings,
        }
    }
}

/// Load a price list from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if a price is
/// malformed or negative, or if prices use more than one currency.
pub fn load(path: impl AsRef<Path>) -> Result<PriceList, PriceListError> {
    let contents = fs::read_to_string(path)?;

    from_yaml(&contents)
}

/// Parse a price list from YAML text.
///
/// # Errors
///
/// See [`load`].
pub fn from_yaml(yaml: &str) -> Result<PriceList, PriceListError> {
    let file: PriceListFile = serde_norway::from_str(yaml)?;
    let mut prices = PriceList::new(parse_price(&file.base)?)?;

    for option in CakeOption::ALL {
        for (key, price) in file.table(option) {
            let price = parse_price(price)?;
            prices.table_mut(option).insert(key.clone(), price)?;
        }
    }

    Ok(prices)
}

/// Parse a price string such as `"2.50 NGN"`.
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`,
/// the amount is not a decimal number, or the currency code is unknown.
pub fn parse_price(s: &str) -> Result<Price, PriceListError> {
    let (amount, currency) = split_price(s)?;

    Ok(money::from_decimal(amount, currency)?)
}

fn split_price(s: &str) -> Result<(Decimal, &'static Currency), PriceListError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(PriceListError::InvalidPrice(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceListError::InvalidPrice(s.to_string()))?;

    Ok((amount, money::currency(code)?))
}
