use bakehouse::orders::{OrderId, PaymentIntent};
use bakehouse_app::context::AppContext;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct ResumePaymentArgs {
    /// Backend id of the order awaiting payment
    #[arg(long)]
    order_id: String,

    /// Customer email the order was placed with
    #[arg(long)]
    email: String,

    /// Order total in major currency units
    #[arg(long)]
    amount: Decimal,
}

#[derive(Debug, Args)]
pub(crate) struct VerifyArgs {
    /// Reference the payment provider returned with
    reference: String,
}

pub(crate) async fn resume(context: &AppContext, args: ResumePaymentArgs) -> Result<(), String> {
    if args.amount <= Decimal::ZERO {
        return Err("amount must be positive".to_string());
    }

    let intent = PaymentIntent {
        email: args.email,
        total_price: args.amount,
        order_id: OrderId::new(args.order_id),
    };

    let mut cart = context.cart();
    let mut sequencer = context.sequencer();

    let redirect = sequencer
        .resume_payment(&mut cart, intent)
        .await
        .map_err(|error| error.user_message())?;

    println!("order_id: {}", redirect.order_id);
    println!("pay at: {}", redirect.authorization_url);

    Ok(())
}

pub(crate) async fn verify(context: &AppContext, args: VerifyArgs) -> Result<(), String> {
    let mut cart = context.cart();
    let mut sequencer = context.sequencer();

    let receipt = sequencer
        .verify(&mut cart, &args.reference)
        .await
        .map_err(|error| error.user_message())?;

    let verification = &receipt.verification;

    println!("reference: {}", receipt.reference);
    println!("status: {}", verification.status().unwrap_or("unknown"));

    let charged = verification
        .payment
        .as_ref()
        .and_then(|payment| payment.amount.zip(payment.currency.as_ref()));

    if let Some((amount, currency)) = charged {
        println!("amount: {amount} {currency}");
    }

    if let Some(message) = &verification.message {
        println!("{message}");
    }

    if let Some(order) = &verification.order {
        for item in &order.items {
            println!("  {} x {} @ {}", item.qty, item.name, item.price);
        }
    }

    Ok(())
}
