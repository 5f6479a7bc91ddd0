//! Catalog Models

use bakehouse::{
    money::{self, MoneyConversionError},
    products::{Product, ProductId},
};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::Deserialize;

/// Query for `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Only products in this category
    pub category: Option<String>,

    /// Only featured (or only non-featured) products
    pub featured: Option<bool>,

    /// Only published (or only unpublished) products
    pub published: Option<bool>,
}

impl ProductFilter {
    /// Query string pairs, omitting unset filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }

        if let Some(featured) = self.featured {
            pairs.push(("featured", featured.to_string()));
        }

        if let Some(published) = self.published {
            pairs.push(("published", published.to_string()));
        }

        pairs
    }
}

/// Product as the backend sends it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Backend id
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Visible in the storefront
    #[serde(default = "published_by_default", alias = "isPublished")]
    pub published: bool,

    /// Shown on the landing page
    #[serde(default, alias = "isFeatured")]
    pub featured: bool,

    /// Catalog category
    #[serde(default)]
    pub category: Option<String>,

    /// Units in stock
    #[serde(default, alias = "countInStock")]
    pub stock: u32,
}

fn published_by_default() -> bool {
    true
}

impl ProductRecord {
    /// Convert to a domain product priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if the price does not fit in minor units.
    pub fn into_product(self, currency: &'static Currency) -> Result<Product, MoneyConversionError> {
        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            price: money::from_decimal(self.price, currency)?,
            image: self.image,
            published: self.published,
            featured: self.featured,
            category: self.category,
            stock: self.stock,
        })
    }
}

/// `GET /api/products` body: either a bare list or `{ "products": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductsResponse {
    List(Vec<ProductRecord>),
    Wrapped { products: Vec<ProductRecord> },
}

impl ProductsResponse {
    pub(crate) fn into_records(self) -> Vec<ProductRecord> {
        match self {
            ProductsResponse::List(records) | ProductsResponse::Wrapped { products: records } => {
                records
            }
        }
    }
}
