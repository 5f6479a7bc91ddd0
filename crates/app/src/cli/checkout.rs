use std::{fs, path::PathBuf};

use bakehouse::{
    cakes::CakeOptions,
    cart::{CartError, CartStore, LineKey},
    checkout::{CheckoutDetails, CustomerDetails, DeliveryMethod},
    pricing::PriceList,
    products::{Product, ProductId},
    receipt,
};
use bakehouse_app::{catalog::models::ProductFilter, context::AppContext};
use clap::Args;
use jiff::civil::DateTime;
use serde::Deserialize;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// YAML file describing the customer and cart
    #[arg(long)]
    order: PathBuf,
}

/// Order file layout:
///
/// ```yaml
/// customer:
///   name: Ada Obi
///   email: ada@example.com
///   phone: "08031234567"
///   address: 12 Allen Avenue, Ikeja
/// delivery_method: Delivery
/// delivery_at: 2026-11-02T10:00:00
/// products:
///   - id: 665f1c
///     quantity: 2
/// cakes:
///   - flavor: Red Velvet
///     size: 8-inch
///     toppings: [Macarons]
///     note: Happy birthday Tolu
/// ```
#[derive(Debug, Deserialize)]
struct OrderFile {
    customer: CustomerDetails,

    #[serde(default)]
    delivery_method: Option<DeliveryMethod>,

    #[serde(default)]
    delivery_at: Option<DateTime>,

    #[serde(default)]
    products: Vec<ProductLine>,

    #[serde(default)]
    cakes: Vec<CakeLine>,
}

#[derive(Debug, Deserialize)]
struct ProductLine {
    id: ProductId,

    #[serde(default = "one")]
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct CakeLine {
    #[serde(flatten)]
    options: CakeOptions,

    #[serde(default = "one")]
    quantity: i64,
}

fn one() -> i64 {
    1
}

impl OrderFile {
    fn details(&self) -> CheckoutDetails {
        CheckoutDetails {
            customer: self.customer.clone(),
            delivery_method: self.delivery_method,
            delivery_at: self.delivery_at,
        }
    }

    fn build_cart(
        &self,
        catalog: &[Product],
        prices: &PriceList,
        cart: &mut CartStore,
    ) -> Result<(), String> {
        for line in &self.products {
            let product = catalog
                .iter()
                .find(|product| product.id == line.id)
                .ok_or_else(|| format!("product {} is not in the catalog", line.id))?;

            let fail = |error: CartError| format!("failed to add {}: {error}", product.name);

            if line.quantity < 0 {
                return Err(fail(CartError::InvalidQuantity(line.quantity)));
            }

            // Repeated ids accumulate.
            let key = LineKey::Product(product.id.clone());
            let quantity = i64::from(cart.quantity_of(&key)).saturating_add(line.quantity);

            cart.add_product(product).map_err(fail)?;
            cart.set_quantity(&key, quantity).map_err(fail)?;
        }

        for line in &self.cakes {
            let id = cart.add_custom_cake(prices.quote(line.options.clone()));

            cart.set_quantity(&LineKey::CustomCake(id), line.quantity)
                .map_err(|error| format!("failed to add {}: {error}", line.options.label()))?;
        }

        Ok(())
    }
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let contents = fs::read_to_string(&args.order)
        .map_err(|error| format!("failed to read {}: {error}", args.order.display()))?;

    let order: OrderFile = serde_norway::from_str(&contents)
        .map_err(|error| format!("failed to parse {}: {error}", args.order.display()))?;

    let catalog = if order.products.is_empty() {
        Vec::new()
    } else {
        context
            .catalog
            .list_products(&ProductFilter {
                published: Some(true),
                ..ProductFilter::default()
            })
            .await
            .map_err(|error| format!("failed to load catalog: {error}"))?
    };

    let mut cart = context.cart();
    order.build_cart(&catalog, &context.prices, &mut cart)?;

    receipt::write_cart(std::io::stdout().lock(), &cart)
        .map_err(|error| error.to_string())?;

    let mut sequencer = context.sequencer();

    match sequencer.submit(&mut cart, &order.details()).await {
        Ok(redirect) => {
            println!("order_id: {}", redirect.order_id);
            println!("pay at: {}", redirect.authorization_url);

            Ok(())
        }
        Err(error) => {
            if let Some(intent) = sequencer.pending_payment() {
                println!(
                    "order {} was created; retry payment with: bakehouse resume-payment \
                     --order-id {} --email {} --amount {}",
                    intent.order_id, intent.order_id, intent.email, intent.total_price
                );
            }

            Err(error.user_message())
        }
    }
}
