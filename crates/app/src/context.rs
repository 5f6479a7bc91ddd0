//! App Context

use std::{sync::Arc, time::Duration};

use bakehouse::{cart::CartStore, pricing::PriceList};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::{CatalogService, HttpCatalogService},
    config::{AppConfig, ConfigError},
    http::{ApiClient, ApiError},
    orders::{HttpOrdersService, OrdersService},
    payments::{HttpPaymentsService, PaymentsService},
    sequencer::CheckoutSequencer,
};

/// Errors building the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// Currency or price list configuration is unusable.
    #[error("invalid pricing configuration: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("failed to build API client: {0}")]
    Api(#[from] ApiError),
}

/// Root composition: backend services plus the price list they share.
#[derive(Clone)]
pub struct AppContext {
    /// Product catalog
    pub catalog: Arc<dyn CatalogService>,

    /// Order creation
    pub orders: Arc<dyn OrdersService>,

    /// Payment initiation and verification
    pub payments: Arc<dyn PaymentsService>,

    /// Custom cake price list
    pub prices: PriceList,

    /// Limit on each network step
    pub step_timeout: Duration,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency or price list is invalid, or the API
    /// URL cannot be used.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let prices = config.pricing.price_list()?;
        let client = ApiClient::new(&config.api)?;

        Ok(Self {
            catalog: Arc::new(HttpCatalogService::new(client.clone(), prices.currency())),
            orders: Arc::new(HttpOrdersService::new(client.clone())),
            payments: Arc::new(HttpPaymentsService::new(client)),
            prices,
            step_timeout: config.api.timeout(),
        })
    }

    /// Storefront currency.
    pub fn currency(&self) -> &'static Currency {
        self.prices.currency()
    }

    /// An empty cart in the storefront currency.
    pub fn cart(&self) -> CartStore {
        CartStore::new(self.currency())
    }

    /// A fresh sequencer over this context's services.
    pub fn sequencer(&self) -> CheckoutSequencer {
        CheckoutSequencer::new(
            Arc::clone(&self.orders),
            Arc::clone(&self.payments),
            self.prices.clone(),
        )
        .with_step_timeout(self.step_timeout)
    }
}
