//! Cart
//!
//! The cart store is a plain owned value. Whoever composes the application
//! owns it and lends out `&mut` access for mutations, so there is exactly one
//! writer and no locking.

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cakes::{CustomCake, CustomCakeId, NewCustomCake},
    money::Price,
    pricing::cart_total,
    products::{Product, ProductId},
};

/// Largest quantity a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Errors raised at the cart boundary.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product was priced in a different currency than the cart.
    #[error("{name} is priced in {found}, but the cart is in {expected}")]
    CurrencyMismatch {
        /// Product name
        name: String,
        /// Cart currency
        expected: &'static str,
        /// Product currency
        found: &'static str,
    },

    /// A quantity outside `0..=MAX_LINE_QUANTITY` was supplied.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// No line matches the given key.
    #[error("no such line in cart")]
    LineNotFound,
}

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItem {
    /// A catalog product.
    Product {
        /// The product
        product: Product,
        /// Always at least 1
        quantity: u32,
    },

    /// A custom cake configuration.
    CustomCake {
        /// The cake
        cake: CustomCake,
        /// Always at least 1
        quantity: u32,
    },
}

impl LineItem {
    /// Identity of this line.
    pub fn key(&self) -> LineKey {
        match self {
            LineItem::Product { product, .. } => LineKey::Product(product.id.clone()),
            LineItem::CustomCake { cake, .. } => LineKey::CustomCake(cake.id),
        }
    }

    /// Catalog price or the cake's embedded price.
    pub fn unit_price(&self) -> Price {
        match self {
            LineItem::Product { product, .. } => product.price,
            LineItem::CustomCake { cake, .. } => cake.price,
        }
    }

    /// Quantity of this line.
    pub fn quantity(&self) -> u32 {
        match self {
            LineItem::Product { quantity, .. } | LineItem::CustomCake { quantity, .. } => {
                *quantity
            }
        }
    }

    /// Display name.
    pub fn name(&self) -> String {
        match self {
            LineItem::Product { product, .. } => product.name.clone(),
            LineItem::CustomCake { cake, .. } => cake.options.label(),
        }
    }

    fn quantity_mut(&mut self) -> &mut u32 {
        match self {
            LineItem::Product { quantity, .. } | LineItem::CustomCake { quantity, .. } => quantity,
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        match (self, key) {
            (LineItem::Product { product, .. }, LineKey::Product(id)) => product.id == *id,
            (LineItem::CustomCake { cake, .. }, LineKey::CustomCake(id)) => cake.id == *id,
            _ => false,
        }
    }
}

/// Identifies a line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LineKey {
    /// One line per product id.
    Product(ProductId),
    /// One line per generated cake id.
    CustomCake(CustomCakeId),
}

/// In-memory cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    lines: Vec<LineItem>,
    currency: &'static Currency,
}

impl CartStore {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add one unit of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in a
    /// different currency than the cart.
    pub fn add_product(&mut self, product: &Product) -> Result<(), CartError> {
        if product.price.currency() != self.currency {
            return Err(CartError::CurrencyMismatch {
                name: product.name.clone(),
                expected: self.currency.iso_alpha_code,
                found: product.price.currency().iso_alpha_code,
            });
        }

        let key = LineKey::Product(product.id.clone());

        if !self.increment(&key) {
            self.lines.push(LineItem::Product {
                product: product.clone(),
                quantity: 1,
            });
        }

        Ok(())
    }

    /// Remove one unit of `product`; the line goes away at zero.
    pub fn remove_product(&mut self, product: &Product) {
        self.decrement(&LineKey::Product(product.id.clone()));
    }

    /// Add a custom cake, returning its id.
    ///
    /// Cakes without an id get a fresh one and a new line. Cakes the cart
    /// already holds have their quantity bumped instead.
    pub fn add_custom_cake(&mut self, cake: impl Into<NewCustomCake>) -> CustomCakeId {
        let cake = cake.into();
        let id = cake.id.unwrap_or_default();

        if !self.increment(&LineKey::CustomCake(id)) {
            self.lines.push(LineItem::CustomCake {
                cake: CustomCake {
                    id,
                    options: cake.options,
                    price: cake.price,
                },
                quantity: 1,
            });
        }

        id
    }

    /// Remove one unit of the custom cake `id`; the line goes away at zero.
    pub fn remove_custom_cake(&mut self, id: CustomCakeId) {
        self.decrement(&LineKey::CustomCake(id));
    }

    /// Set the quantity of an existing line from user input. Zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for negative quantities or
    /// quantities above [`MAX_LINE_QUANTITY`], and [`CartError::LineNotFound`]
    /// if no line matches `key`.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> Result<(), CartError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q <= MAX_LINE_QUANTITY)
            .ok_or(CartError::InvalidQuantity(quantity))?;

        let index = self.position(key).ok_or(CartError::LineNotFound)?;

        if quantity == 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            *line.quantity_mut() = quantity;
        }

        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit price * quantity` over all lines.
    pub fn total(&self) -> Price {
        cart_total(&self.lines, self.currency)
    }

    /// Sum of quantities over all lines.
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .map(LineItem::quantity)
            .fold(0, u32::saturating_add)
    }

    /// Quantity held for `key`, zero when absent.
    pub fn quantity_of(&self, key: &LineKey) -> u32 {
        self.lines
            .iter()
            .find(|line| line.matches(key))
            .map_or(0, LineItem::quantity)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.lines.iter().position(|line| line.matches(key))
    }

    fn increment(&mut self, key: &LineKey) -> bool {
        match self.lines.iter_mut().find(|line| line.matches(key)) {
            Some(line) => {
                let quantity = line.quantity_mut();
                *quantity = quantity.saturating_add(1).min(MAX_LINE_QUANTITY);
                true
            }
            None => false,
        }
    }

    fn decrement(&mut self, key: &LineKey) {
        let Some(index) = self.position(key) else {
            return;
        };

        let emptied = self.lines.get_mut(index).is_some_and(|line| {
            let quantity = line.quantity_mut();
            *quantity = quantity.saturating_sub(1);
            *quantity == 0
        });

        if emptied {
            self.lines.remove(index);
        }
    }
}
