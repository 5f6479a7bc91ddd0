use bakehouse_app::{catalog::models::ProductFilter, context::AppContext};
use clap::Args;
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Only products in this category
    #[arg(long)]
    category: Option<String>,

    /// Only featured (true) or non-featured (false) products
    #[arg(long)]
    featured: Option<bool>,

    /// Include unpublished products
    #[arg(long)]
    all: bool,
}

pub(crate) async fn run(context: &AppContext, args: ProductsArgs) -> Result<(), String> {
    let filter = ProductFilter {
        category: args.category,
        featured: args.featured,
        published: (!args.all).then_some(true),
    };

    let products = context
        .catalog
        .list_products(&filter)
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Category", "Price", "Stock"]);

    for product in &products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone().unwrap_or_default(),
            product.price.to_string(),
            product.stock.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("{table}");

    Ok(())
}
