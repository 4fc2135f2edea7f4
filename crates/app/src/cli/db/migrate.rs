use doruken_app::{config::DatabaseConfig, database::Db};
use tracing::info;

pub(crate) async fn run(config: &DatabaseConfig) -> Result<(), String> {
    Db::new(config.connect_options())
        .migrate()
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    info!(database = %config.name, "migrations applied");
    println!("migrations applied");

    Ok(())
}
