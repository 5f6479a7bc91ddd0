//! Bakehouse
//!
//! Storefront core for a bakery: the cart, custom cake pricing and the order
//! payloads a checkout submits. Nothing in this crate performs I/O apart from
//! reading price list files; the async collaborators live in `bakehouse-app`.

pub mod cakes;
pub mod cart;
pub mod checkout;
pub mod money;
pub mod orders;
pub mod prelude;
pub mod price_list;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod uuids;
