//! Products

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::Price;

/// Backend catalog identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a backend id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Catalog product, owned by the backend and never mutated by the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Price,

    /// Image URL, when the catalog has one
    pub image: Option<String>,

    /// Visible in the storefront
    pub published: bool,

    /// Shown on the landing page
    pub featured: bool,

    /// Catalog category
    pub category: Option<String>,

    /// Units in stock
    pub stock: u32,
}

impl Product {
    /// Create a published, non-featured product with no category or image.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            published: true,
            featured: false,
            category: None,
            stock: 0,
        }
    }

    /// Whether any stock is left.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
