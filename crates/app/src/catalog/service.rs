//! Catalog service.

use async_trait::async_trait;
use bakehouse::products::Product;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::{info, instrument};

use crate::{
    catalog::models::{ProductFilter, ProductsResponse},
    http::{ApiClient, ApiError},
};

/// Catalog backed by `GET /api/products`.
#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    client: ApiClient,
    currency: &'static Currency,
}

impl HttpCatalogService {
    /// Products are priced in `currency`.
    #[must_use]
    pub fn new(client: ApiClient, currency: &'static Currency) -> Self {
        Self { client, currency }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    #[instrument(skip(self), err)]
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let response: ProductsResponse = self
            .client
            .get(&["api", "products"], &filter.query_pairs())
            .await?;

        let products = response
            .into_records()
            .into_iter()
            .map(|record| record.into_product(self.currency))
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = products.len(), "listed products");

        Ok(products)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves products matching the filter. The catalog is read-only.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError>;
}
