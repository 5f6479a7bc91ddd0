//! End-to-end cart and pricing scenarios

use rusty_money::iso::NGN;
use testresult::TestResult;

use bakehouse::{
    cakes::CakeOptions,
    cart::{CartError, CartStore, LineKey},
    checkout::{CheckoutDetails, CustomerDetails, DeliveryMethod, validate},
    money::{major, to_decimal},
    orders::OrderRequest,
    pricing::{PriceList, cart_total},
    products::Product,
};

fn bread() -> Product {
    Product::new("bread", "Sourdough", major(120, NGN))
}

fn details() -> CheckoutDetails {
    CheckoutDetails {
        customer: CustomerDetails {
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+234 803 123 4567".to_string(),
            address: "12 Allen Avenue, Ikeja".to_string(),
        },
        delivery_method: Some(DeliveryMethod::Delivery),
        delivery_at: None,
    }
}

#[test]
fn adding_a_product_to_an_empty_cart() -> TestResult {
    let mut cart = CartStore::new(NGN);

    cart.add_product(&bread())?;

    assert_eq!(cart.count(), 1);
    assert_eq!(cart.total(), major(120, NGN));

    Ok(())
}

#[test]
fn adding_the_same_product_twice_merges_lines() -> TestResult {
    let mut cart = CartStore::new(NGN);

    cart.add_product(&bread())?;
    cart.add_product(&bread())?;

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.quantity_of(&LineKey::Product(bread().id)), 2);
    assert_eq!(cart.total(), major(240, NGN));

    Ok(())
}

#[test]
fn custom_cake_price_adds_surcharges() {
    let prices = PriceList::standard(NGN);
    let options = CakeOptions::default()
        .flavor("Chocolate")
        .size("8-inch")
        .layers("Single")
        .icing("Buttercream")
        .topping("Sprinkles");

    assert_eq!(prices.custom_cake_price(&options), major(82, NGN));
}

#[test]
fn quantity_tracks_adds_minus_removes() -> TestResult {
    let product = bread();
    let key = LineKey::Product(product.id.clone());
    let ops = [true, true, false, true, false, false, false, true, true, false];

    let mut cart = CartStore::new(NGN);
    let mut expected: u32 = 0;

    for add in ops {
        if add {
            cart.add_product(&product)?;
            expected += 1;
        } else {
            cart.remove_product(&product);
            expected = expected.saturating_sub(1);
        }

        assert_eq!(cart.quantity_of(&key), expected);
        assert_eq!(cart.is_empty(), expected == 0, "line absent at zero");
    }

    Ok(())
}

#[test]
fn cart_total_ignores_line_order() -> TestResult {
    let prices = PriceList::standard(NGN);
    let mut cart = CartStore::new(NGN);

    cart.add_product(&bread())?;
    cart.add_product(&Product::new("bun", "Bun", major(30, NGN)))?;
    cart.add_custom_cake(prices.quote(CakeOptions::default().icing("Fondant")));

    let mut lines = cart.lines().to_vec();
    let forward = cart_total(&lines, NGN);

    lines.reverse();
    assert_eq!(cart_total(&lines, NGN), forward);

    lines.rotate_left(1);
    assert_eq!(cart_total(&lines, NGN), forward);
    assert_eq!(cart.total(), forward);

    Ok(())
}

#[test]
fn re_adding_a_stored_cake_increments_it() {
    let prices = PriceList::standard(NGN);
    let mut cart = CartStore::new(NGN);

    let id = cart.add_custom_cake(prices.quote(CakeOptions::default().layers("Double")));
    let stored = cart.lines().first().cloned();

    if let Some(bakehouse::cart::LineItem::CustomCake { cake, .. }) = stored {
        cart.add_custom_cake(cake);
    }

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.quantity_of(&LineKey::CustomCake(id)), 2);
    assert_eq!(cart.total(), major(150, NGN));
}

#[test]
fn typed_quantities_are_bounded() -> TestResult {
    let mut cart = CartStore::new(NGN);
    let key = LineKey::Product(bread().id);

    cart.add_product(&bread())?;

    assert_eq!(
        cart.set_quantity(&key, -1),
        Err(CartError::InvalidQuantity(-1))
    );

    cart.set_quantity(&key, 5)?;
    assert_eq!(cart.total(), major(600, NGN));

    cart.set_quantity(&key, 0)?;
    assert!(cart.is_empty(), "zero removes the line");

    Ok(())
}

#[test]
fn order_payload_matches_cart_at_submission() -> TestResult {
    let prices = PriceList::standard(NGN);
    let mut cart = CartStore::new(NGN);

    cart.add_product(&bread())?;
    cart.add_product(&bread())?;
    cart.add_custom_cake(prices.quote(
        CakeOptions::default()
            .flavor("Red Velvet")
            .size("10-inch")
            .topping("Macarons")
            .topping("Fresh Fruit"),
    ));

    validate(&details(), &cart)?;

    let order = OrderRequest::from_cart(&details(), &cart, &prices);

    assert_eq!(order.items.len(), cart.len());
    assert_eq!(order.total_price, to_decimal(&cart.total()));
    assert_eq!(order.total_price, rust_decimal::Decimal::from(240 + 140));

    Ok(())
}

#[test]
fn zero_exponent_currency_sends_whole_units() -> TestResult {
    use rusty_money::iso::JPY;

    let prices = PriceList::standard(JPY);
    let mut cart = CartStore::new(JPY);

    cart.add_product(&Product::new("melon-pan", "Melon Pan", major(180, JPY)))?;
    cart.add_custom_cake(prices.quote(CakeOptions::default()));

    let order = OrderRequest::from_cart(&details(), &cart, &prices);

    assert_eq!(cart.total().to_minor_units(), 230);
    assert_eq!(order.total_price, rust_decimal::Decimal::from(230));

    Ok(())
}
