//! Custom cakes
//!
//! A custom cake is assembled option by option in the storefront and has no
//! backend identity until it is submitted as part of an order. Each one the
//! cart accepts gets its own [`CustomCakeId`], so two cakes with identical
//! options are still two separate line items.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{money::Price, uuids::TypedUuid};

/// Flavor used when none is chosen.
pub const DEFAULT_FLAVOR: &str = "Vanilla";

/// Size used when none is chosen.
pub const DEFAULT_SIZE: &str = "6-inch";

/// Layer count used when none is chosen.
pub const DEFAULT_LAYERS: &str = "Single";

/// Icing used when none is chosen.
pub const DEFAULT_ICING: &str = "Buttercream";

/// Custom cake id, generated by the cart.
pub type CustomCakeId = TypedUuid<CustomCake>;

/// The options a customer picks for a custom cake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CakeOptions {
    /// Sponge flavor, e.g. `Chocolate`
    pub flavor: String,

    /// Diameter, e.g. `8-inch`
    pub size: String,

    /// Layer count, e.g. `Double`
    pub layers: String,

    /// Icing, e.g. `Fondant`
    pub icing: String,

    /// Toppings; order is irrelevant and duplicates collapse
    pub toppings: BTreeSet<String>,

    /// Free-text note for the baker
    pub note: String,
}

impl Default for CakeOptions {
    fn default() -> Self {
        Self {
            flavor: DEFAULT_FLAVOR.to_string(),
            size: DEFAULT_SIZE.to_string(),
            layers: DEFAULT_LAYERS.to_string(),
            icing: DEFAULT_ICING.to_string(),
            toppings: BTreeSet::new(),
            note: String::new(),
        }
    }
}

impl CakeOptions {
    /// Set the flavor.
    #[must_use]
    pub fn flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    /// Set the size.
    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Set the layer count.
    #[must_use]
    pub fn layers(mut self, layers: impl Into<String>) -> Self {
        self.layers = layers.into();
        self
    }

    /// Set the icing.
    #[must_use]
    pub fn icing(mut self, icing: impl Into<String>) -> Self {
        self.icing = icing.into();
        self
    }

    /// Add a topping.
    #[must_use]
    pub fn topping(mut self, topping: impl Into<String>) -> Self {
        self.toppings.insert(topping.into());
        self
    }

    /// Set the note.
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Short human-readable label, e.g. `8-inch Chocolate cake`.
    pub fn label(&self) -> String {
        format!("{} {} cake", self.size, self.flavor)
    }
}

/// A custom cake on its way into the cart.
///
/// `id` is `None` for a freshly configured cake; the cart assigns one. A cake
/// that came back out of the cart keeps its id, and adding it again bumps the
/// quantity of the existing line.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomCake {
    /// Existing id, if this cake is already known to the cart
    pub id: Option<CustomCakeId>,

    /// Chosen options
    pub options: CakeOptions,

    /// Price computed when the cake was configured
    pub price: Price,
}

/// A custom cake held by the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomCake {
    /// Id assigned by the cart
    pub id: CustomCakeId,

    /// Chosen options
    pub options: CakeOptions,

    /// Price computed when the cake was configured
    pub price: Price,
}

impl From<CustomCake> for NewCustomCake {
    fn from(cake: CustomCake) -> Self {
        Self {
            id: Some(cake.id),
            options: cake.options,
            price: cake.price,
        }
    }
}
