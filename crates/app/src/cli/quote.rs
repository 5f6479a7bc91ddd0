use bakehouse::{
    cakes::{CakeOptions, DEFAULT_FLAVOR, DEFAULT_ICING, DEFAULT_LAYERS, DEFAULT_SIZE},
    pricing::CakeOption,
};
use bakehouse_app::context::AppContext;
use clap::Args;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Sponge flavor
    #[arg(long, default_value = DEFAULT_FLAVOR)]
    flavor: String,

    /// Diameter
    #[arg(long, default_value = DEFAULT_SIZE)]
    size: String,

    /// Layer count
    #[arg(long, default_value = DEFAULT_LAYERS)]
    layers: String,

    /// Icing
    #[arg(long, default_value = DEFAULT_ICING)]
    icing: String,

    /// Topping; repeat for more than one
    #[arg(long = "topping")]
    toppings: Vec<String>,

    /// Print the surcharge breakdown
    #[arg(long)]
    breakdown: bool,
}

pub(crate) fn run(context: &AppContext, args: QuoteArgs) {
    let options = args.toppings.into_iter().fold(
        CakeOptions::default()
            .flavor(args.flavor)
            .size(args.size)
            .layers(args.layers)
            .icing(args.icing),
        CakeOptions::topping,
    );

    let prices = &context.prices;

    if args.breakdown {
        let mut builder = Builder::default();
        builder.push_record(["Option", "Choice", "Price"]);
        builder.push_record(["Base".to_string(), String::new(), prices.base().to_string()]);

        let chosen = [
            (CakeOption::Flavor, "Flavor", &options.flavor),
            (CakeOption::Size, "Size", &options.size),
            (CakeOption::Layers, "Layers", &options.layers),
            (CakeOption::Icing, "Icing", &options.icing),
        ];

        for (option, label, choice) in chosen {
            let price = prices.table(option).get(choice);
            builder.push_record([label.to_string(), choice.clone(), price.to_string()]);
        }

        for topping in &options.toppings {
            let price = prices.table(CakeOption::Topping).get(topping);
            builder.push_record(["Topping".to_string(), topping.clone(), price.to_string()]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..), Alignment::right());

        println!("{table}");
    }

    println!("{}: {}", options.label(), prices.custom_cake_price(&options));
}
