//! Receipt
//!
//! Plain-text rendering of a cart, used by the command line storefront.

use std::io;

use rusty_money::Money;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{CartStore, LineItem},
    pricing::line_total,
};

/// Errors writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Output could not be written.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Write the cart as a table followed by item count and total.
///
/// # Errors
///
/// Returns [`ReceiptError::Io`] if writing to `out` fails.
pub fn write_cart(mut out: impl io::Write, cart: &CartStore) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Details", "Qty", "Unit Price", "Line Total"]);

    for line in cart.lines() {
        let line_total = Money::from_minor(line_total(line), cart.currency());

        builder.push_record([
            line.name(),
            details(line),
            line.quantity().to_string(),
            line.unit_price().to_string(),
            line_total.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;
    writeln!(out, "Items: {}", cart.count())?;
    writeln!(out, "Total: {}", cart.total())?;

    Ok(())
}

fn details(line: &LineItem) -> String {
    match line {
        LineItem::Product { product, .. } => product.category.clone().unwrap_or_default(),
        LineItem::CustomCake { cake, .. } => {
            let options = &cake.options;
            let mut parts = vec![options.layers.clone(), options.icing.clone()];

            parts.extend(options.toppings.iter().cloned());

            if !options.note.is_empty() {
                parts.push(format!("\"{}\"", options.note));
            }

            parts.join(", ")
        }
    }
}
