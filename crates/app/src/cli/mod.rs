use bakehouse_app::{config::AppConfig, context::AppContext, observability};
use clap::{Parser, Subcommand};

mod checkout;
mod payment;
mod products;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "bakehouse", about = "Bakehouse storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog products
    Products(products::ProductsArgs),

    /// Price a custom cake
    Quote(quote::QuoteArgs),

    /// Place an order described in a YAML file and start payment
    Checkout(checkout::CheckoutArgs),

    /// Start payment again for an order that already exists
    ResumePayment(payment::ResumePaymentArgs),

    /// Verify a payment after returning from the provider
    Verify(payment::VerifyArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.config).map_err(|error| error.to_string())?;

        match self.command {
            Commands::Products(args) => products::run(&context, args).await,
            Commands::Quote(args) => {
                quote::run(&context, args);
                Ok(())
            }
            Commands::Checkout(args) => checkout::run(&context, args).await,
            Commands::ResumePayment(args) => payment::resume(&context, args).await,
            Commands::Verify(args) => payment::verify(&context, args).await,
        }
    }
}
