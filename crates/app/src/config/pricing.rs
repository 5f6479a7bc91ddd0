//! Pricing Config

use std::path::PathBuf;

use bakehouse::{
    money::{self, MoneyConversionError},
    price_list::{self, PriceListError},
    pricing::PriceList,
};
use clap::Args;
use rusty_money::iso::Currency;
use thiserror::Error;

/// Errors turning configuration into a price list.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `BAKEHOUSE_CURRENCY` is not an ISO 4217 code.
    #[error(transparent)]
    Currency(#[from] MoneyConversionError),

    /// The price list file could not be loaded.
    #[error(transparent)]
    PriceList(#[from] PriceListError),

    /// The price list file uses a different currency.
    #[error("price list is in {found}, expected {expected}")]
    CurrencyMismatch {
        /// Configured currency
        expected: String,
        /// Price list currency
        found: String,
    },
}

/// Currency and price list settings.
#[derive(Debug, Clone, Args)]
pub struct PricingConfig {
    /// ISO 4217 code of the storefront currency
    #[arg(long, env = "BAKEHOUSE_CURRENCY", default_value = "NGN")]
    pub currency: String,

    /// YAML price list; the standard list is used when omitted
    #[arg(long, env = "BAKEHOUSE_PRICE_LIST")]
    pub price_list: Option<PathBuf>,
}

impl PricingConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Currency`] for an unknown code.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        Ok(money::currency(&self.currency)?)
    }

    /// Load the price list file, or build the standard one.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency is unknown, the file cannot be loaded,
    /// or the file is priced in another currency.
    pub fn price_list(&self) -> Result<PriceList, ConfigError> {
        let currency = self.currency()?;

        let Some(path) = &self.price_list else {
            return Ok(PriceList::standard(currency));
        };

        let prices = price_list::load(path)?;

        if prices.currency() != currency {
            return Err(ConfigError::CurrencyMismatch {
                expected: currency.iso_alpha_code.to_string(),
                found: prices.currency().iso_alpha_code.to_string(),
            });
        }

        Ok(prices)
    }
}
