//! Bakehouse prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cakes::{CakeOptions, CustomCake, CustomCakeId, NewCustomCake},
    cart::{CartError, CartStore, LineItem, LineKey},
    checkout::{CheckoutDetails, CustomerDetails, DeliveryMethod, ValidationError, validate},
    money::Price,
    orders::{OrderId, OrderItem, OrderRequest, PaymentIntent},
    price_list::PriceListError,
    pricing::{CakeOption, PriceList, PricingError, SurchargeTable, cart_total},
    products::{Product, ProductId},
};
