//! Orders service.

use async_trait::async_trait;
use bakehouse::orders::{OrderId, OrderRequest};
use mockall::automock;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::http::{ApiClient, ApiError};

/// Orders backed by `POST /api/orders`.
#[derive(Debug, Clone)]
pub struct HttpOrdersService {
    client: ApiClient,
}

impl HttpOrdersService {
    /// Create the service over a shared client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedOrder {
    #[serde(rename = "_id")]
    id: Option<String>,
}

impl CreatedOrder {
    fn into_order_id(self) -> Result<OrderId, ApiError> {
        self.id
            .filter(|id| !id.trim().is_empty())
            .map(OrderId::new)
            .ok_or(ApiError::MissingField("_id"))
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    #[instrument(
        skip(self, order),
        fields(items = order.items.len(), total = %order.total_price),
        err
    )]
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderId, ApiError> {
        let created: CreatedOrder = self.client.post(&["api", "orders"], order).await?;
        let order_id = created.into_order_id()?;

        info!(%order_id, "order created");

        Ok(order_id)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Records an order and returns the backend id.
    ///
    /// A 2xx response without an id is an error: the sequencer cannot take
    /// payment for an order it cannot name.
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderId, ApiError>;
}
