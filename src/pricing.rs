//! Pricing
//!
//! Custom cake prices are a base price plus one surcharge per chosen option,
//! looked up in static tables. An option the tables do not know contributes
//! nothing: an unrecognised choice should never block a checkout.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cakes::{CakeOptions, NewCustomCake},
    cart::LineItem,
    money::{Price, major, zero},
};

/// Errors building a price list.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Surcharges only ever add to a price.
    #[error("surcharge for {0:?} is negative")]
    NegativeSurcharge(String),

    /// A surcharge was priced in a different currency than its table.
    #[error("surcharge for {key:?} is in {found}, expected {expected}")]
    CurrencyMismatch {
        /// Option key
        key: String,
        /// Currency of the price list
        expected: &'static str,
        /// Currency of the rejected surcharge
        found: &'static str,
    },
}

/// The option groups a cake is configured by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CakeOption {
    /// Sponge flavor
    Flavor,
    /// Diameter
    Size,
    /// Layer count
    Layers,
    /// Icing
    Icing,
    /// Toppings, any number of which may be chosen
    Topping,
}

impl CakeOption {
    /// Every option group, in configuration order.
    pub const ALL: [CakeOption; 5] = [
        CakeOption::Flavor,
        CakeOption::Size,
        CakeOption::Layers,
        CakeOption::Icing,
        CakeOption::Topping,
    ];
}

/// Option value -> additive price contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct SurchargeTable {
    currency: &'static Currency,
    entries: FxHashMap<String, Price>,
}

impl SurchargeTable {
    /// Create an empty table.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            entries: FxHashMap::default(),
        }
    }

    /// Insert or replace a surcharge.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NegativeSurcharge`] for negative prices and
    /// [`PricingError::CurrencyMismatch`] if `price` is in another currency.
    pub fn insert(&mut self, key: impl Into<String>, price: Price) -> Result<(), PricingError> {
        let key = key.into();

        if price.currency() != self.currency {
            return Err(PricingError::CurrencyMismatch {
                key,
                expected: self.currency.iso_alpha_code,
                found: price.currency().iso_alpha_code,
            });
        }

        if price.to_minor_units() < 0 {
            return Err(PricingError::NegativeSurcharge(key));
        }

        self.entries.insert(key, price);

        Ok(())
    }

    /// Surcharge for `key`; unknown keys cost nothing.
    pub fn get(&self, key: &str) -> Price {
        self.entries
            .get(key)
            .copied()
            .unwrap_or_else(|| zero(self.currency))
    }

    /// Whether `key` has an entry.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries sorted by price then name, for display.
    pub fn entries(&self) -> Vec<(&str, Price)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(key, price)| (key.as_str(), *price))
            .collect();

        entries.sort_by(|a, b| {
            a.1.to_minor_units()
                .cmp(&b.1.to_minor_units())
                .then_with(|| a.0.cmp(b.0))
        });

        entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with_major(currency: &'static Currency, entries: &[(&str, i64)]) -> Self {
        Self {
            currency,
            entries: entries
                .iter()
                .map(|(key, amount)| ((*key).to_string(), major(*amount, currency)))
                .collect(),
        }
    }
}

/// Everything needed to price a custom cake.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceList {
    currency: &'static Currency,
    base: Price,
    flavors: SurchargeTable,
    sizes: SurchargeTable,
    layers: SurchargeTable,
    icings: SurchargeTable,
    toppings: SurchargeTable,
}

impl PriceList {
    /// An empty price list: every cake costs exactly `base`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NegativeSurcharge`] if `base` is negative.
    pub fn new(base: Price) -> Result<Self, PricingError> {
        if base.to_minor_units() < 0 {
            return Err(PricingError::NegativeSurcharge("base".to_string()));
        }

        let currency = base.currency();

        Ok(Self {
            currency,
            base,
            flavors: SurchargeTable::new(currency),
            sizes: SurchargeTable::new(currency),
            layers: SurchargeTable::new(currency),
            icings: SurchargeTable::new(currency),
            toppings: SurchargeTable::new(currency),
        })
    }

    /// The bakery's standard menu, in whole units of `currency`.
    pub fn standard(currency: &'static Currency) -> Self {
        Self {
            currency,
            base: major(50, currency),
            flavors: SurchargeTable::with_major(
                currency,
                &[
                    ("Vanilla", 0),
                    ("Chocolate", 0),
                    ("Lemon", 5),
                    ("Carrot", 8),
                    ("Red Velvet", 10),
                ],
            ),
            sizes: SurchargeTable::with_major(
                currency,
                &[("6-inch", 0), ("8-inch", 30), ("10-inch", 60), ("12-inch", 90)],
            ),
            layers: SurchargeTable::with_major(
                currency,
                &[("Single", 0), ("Double", 25), ("Triple", 50)],
            ),
            icings: SurchargeTable::with_major(
                currency,
                &[
                    ("Buttercream", 0),
                    ("Whipped Cream", 5),
                    ("Cream Cheese", 10),
                    ("Ganache", 15),
                    ("Fondant", 20),
                ],
            ),
            toppings: SurchargeTable::with_major(
                currency,
                &[
                    ("Sprinkles", 2),
                    ("Chocolate Chips", 4),
                    ("Nuts", 5),
                    ("Fresh Fruit", 8),
                    ("Edible Flowers", 10),
                    ("Macarons", 12),
                ],
            ),
        }
    }

    /// Currency every price in the list is in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Price of a cake with no surcharges.
    pub fn base(&self) -> Price {
        self.base
    }

    /// Surcharge table for an option group.
    pub fn table(&self, option: CakeOption) -> &SurchargeTable {
        match option {
            CakeOption::Flavor => &self.flavors,
            CakeOption::Size => &self.sizes,
            CakeOption::Layers => &self.layers,
            CakeOption::Icing => &self.icings,
            CakeOption::Topping => &self.toppings,
        }
    }

    /// Mutable surcharge table for an option group.
    pub fn table_mut(&mut self, option: CakeOption) -> &mut SurchargeTable {
        match option {
            CakeOption::Flavor => &mut self.flavors,
            CakeOption::Size => &mut self.sizes,
            CakeOption::Layers => &mut self.layers,
            CakeOption::Icing => &mut self.icings,
            CakeOption::Topping => &mut self.toppings,
        }
    }

    /// Price of a cake configured with `options`.
    pub fn custom_cake_price(&self, options: &CakeOptions) -> Price {
        let surcharges = [
            self.flavors.get(&options.flavor),
            self.sizes.get(&options.size),
            self.layers.get(&options.layers),
            self.icings.get(&options.icing),
        ]
        .into_iter()
        .chain(options.toppings.iter().map(|t| self.toppings.get(t)));

        let minor = surcharges.fold(self.base.to_minor_units(), |acc, price| {
            acc.saturating_add(price.to_minor_units())
        });

        Money::from_minor(minor, self.currency)
    }

    /// Price `options` and wrap them up for the cart.
    pub fn quote(&self, options: CakeOptions) -> NewCustomCake {
        NewCustomCake {
            id: None,
            price: self.custom_cake_price(&options),
            options,
        }
    }
}

/// `unit price * quantity` for one line, in minor units.
pub fn line_total(line: &LineItem) -> i64 {
    line.unit_price()
        .to_minor_units()
        .saturating_mul(i64::from(line.quantity()))
}

/// Sum of all line totals. Does not depend on line order.
pub fn cart_total(lines: &[LineItem], currency: &'static Currency) -> Price {
    let minor = lines
        .iter()
        .map(line_total)
        .fold(0_i64, i64::saturating_add);

    Money::from_minor(minor, currency)
}
