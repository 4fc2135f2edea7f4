use clap::{Args, Subcommand};
use doruken_app::context::AppContext;

mod create;
mod list;
mod names;
mod pay;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Price and record a new order
    Create(create::CreateOrderArgs),
    /// Mark an order paid
    Pay(crate::cli::LookupArgs),
    /// List customer names
    Names(names::ListNamesArgs),
    /// List every order
    List,
}

pub(crate) async fn run(command: OrderCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Create(args) => create::run(args, context).await,
        OrderSubcommand::Pay(args) => pay::run(args, context).await,
        OrderSubcommand::Names(args) => names::run(args, context).await,
        OrderSubcommand::List => list::run(context).await,
    }
}
