//! Order payloads
//!
//! Wire shapes for `POST /api/orders` and `POST /api/payments/initiate`,
//! built from a cart at the moment of submission.

use std::fmt;

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cakes::CakeOptions,
    cart::{CartStore, LineItem},
    checkout::{CheckoutDetails, DeliveryMethod},
    money::to_decimal,
    pricing::PriceList,
    products::ProductId,
};

/// Backend order identifier (`_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap a backend id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Custom cake snapshot embedded in an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDetails {
    /// Sponge flavor
    pub flavor: String,
    /// Diameter
    pub size: String,
    /// Layer count
    pub layers: String,
    /// Icing
    pub icing: String,
    /// Toppings, sorted
    pub toppings: Vec<String>,
    /// Note for the baker
    pub note: String,
}

impl From<&CakeOptions> for CustomDetails {
    fn from(options: &CakeOptions) -> Self {
        Self {
            flavor: options.flavor.clone(),
            size: options.size.clone(),
            layers: options.layers.clone(),
            icing: options.icing.clone(),
            toppings: options.toppings.iter().cloned().collect(),
            note: options.note.clone(),
        }
    }
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Catalog reference; absent for custom cakes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,

    /// Display name
    pub name: String,

    /// Quantity
    pub qty: u32,

    /// Unit price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Whether this is a custom cake
    pub is_custom: bool,

    /// Custom cake snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_details: Option<CustomDetails>,
}

/// Order submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Customer name
    pub customer_name: String,

    /// Customer email
    pub email: String,

    /// Customer phone
    pub phone: String,

    /// Delivery or contact address
    pub address: String,

    /// Delivery or pickup
    pub delivery_method: DeliveryMethod,

    /// Requested date and time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime>,

    /// Order lines, in cart order
    pub items: Vec<OrderItem>,

    /// Sum of `price * qty` over `items`, in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl OrderRequest {
    /// Snapshot the cart into an order payload.
    ///
    /// Custom cake prices are re-derived from `prices` rather than taken from
    /// the cart, so a stale price computed earlier can never be submitted.
    /// The caller is expected to have validated `details`; a missing delivery
    /// method falls back to [`DeliveryMethod::Delivery`].
    pub fn from_cart(details: &CheckoutDetails, cart: &CartStore, prices: &PriceList) -> Self {
        let items: Vec<OrderItem> = cart
            .lines()
            .iter()
            .map(|line| order_item(line, prices))
            .collect();

        let total_price = items
            .iter()
            .map(|item| item.price * Decimal::from(item.qty))
            .sum();

        let customer = &details.customer;

        Self {
            customer_name: customer.name.trim().to_string(),
            email: customer.email.trim().to_string(),
            phone: customer.phone.trim().to_string(),
            address: customer.address.trim().to_string(),
            delivery_method: details.delivery_method.unwrap_or(DeliveryMethod::Delivery),
            delivery_date: details.delivery_at,
            items,
            total_price,
        }
    }
}

fn order_item(line: &LineItem, prices: &PriceList) -> OrderItem {
    match line {
        LineItem::Product { product, quantity } => OrderItem {
            product_id: Some(product.id.clone()),
            name: product.name.clone(),
            qty: *quantity,
            price: to_decimal(&product.price),
            is_custom: false,
            custom_details: None,
        },
        LineItem::CustomCake { cake, quantity } => {
            let price = prices.custom_cake_price(&cake.options);

            OrderItem {
                product_id: None,
                name: cake.options.label(),
                qty: *quantity,
                price: to_decimal(&price),
                is_custom: true,
                custom_details: Some(CustomDetails::from(&cake.options)),
            }
        }
    }
}

/// Payload for `POST /api/payments/initiate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Customer email
    pub email: String,

    /// Amount to charge, in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,

    /// The order being paid for
    pub order_id: OrderId,
}

impl PaymentIntent {
    /// Intent for a freshly created order.
    pub fn for_order(order: &OrderRequest, order_id: OrderId) -> Self {
        Self {
            email: order.email.clone(),
            total_price: order.total_price,
            order_id,
        }
    }
}
