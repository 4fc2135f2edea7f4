use clap::{Args, ValueEnum};
use doruken_app::context::AppContext;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum NameFilter {
    /// Every customer
    #[default]
    All,
    /// Customers with unpaid orders
    Unpaid,
    /// Customers whose orders ship
    Shipping,
}

#[derive(Debug, Args)]
pub(crate) struct ListNamesArgs {
    /// Which names to list
    #[arg(long, value_enum, default_value_t = NameFilter::All)]
    filter: NameFilter,
}

pub(crate) async fn run(args: ListNamesArgs, context: &AppContext) -> Result<(), String> {
    let names = match args.filter {
        NameFilter::All => context.orders.list_all_names().await,
        NameFilter::Unpaid => context.orders.list_unpaid_names().await,
        NameFilter::Shipping => context.orders.list_shipping_names().await,
    }
    .map_err(|error| format!("failed to list names: {error}"))?;

    if names.is_empty() {
        println!("no matching orders");
        return Ok(());
    }

    for name in names {
        println!("{name}");
    }

    Ok(())
}
