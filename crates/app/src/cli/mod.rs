use clap::{Args, Parser, Subcommand};
use doruken::prelude::{OrderId, OrderLookup};
use doruken_app::{config::AppConfig, context::AppContext};

mod db;
mod invoice;
mod order;
mod stats;
mod table;

#[derive(Debug, Parser)]
#[command(name = "doruken-app", about = "Doruken invoice CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Order(order::OrderCommand),
    Invoice(invoice::InvoiceCommand),
    Stats(stats::StatsArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command, &self.config.database).await,
            Commands::Order(command) => order::run(command, &context(&self.config)?).await,
            Commands::Invoice(command) => invoice::run(command, &context(&self.config)?).await,
            Commands::Stats(args) => stats::run(args, &context(&self.config)?).await,
        }
    }
}

fn context(config: &AppConfig) -> Result<AppContext, String> {
    AppContext::from_config(config).map_err(|error| error.to_string())
}

/// Selects one order by id or by customer name.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub(crate) struct LookupArgs {
    /// Order id (the invoice number)
    #[arg(long)]
    id: Option<i64>,

    /// Customer name; must match exactly one order
    #[arg(long)]
    name: Option<String>,
}

impl LookupArgs {
    pub(crate) fn lookup(self) -> Result<OrderLookup, String> {
        match (self.id, self.name) {
            (Some(id), _) => Ok(OrderLookup::Id(OrderId::from_i64(id))),
            (None, Some(name)) => Ok(OrderLookup::Name(name)),
            (None, None) => Err("either --id or --name is required".to_string()),
        }
    }
}
