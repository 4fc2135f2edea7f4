//! Doruken Invoice CLI

use std::process;

use clap::Parser;
use doruken_app::observability;
use tracing::error;

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = observability::init(&cli.config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(message) = cli.run().await {
        error!(%message, "command failed");
        eprintln!("{message}");
        process::exit(1);
    }
}
