//! Database connection management

use sqlx::{
    Connection, PgConnection,
    migrate::{MigrateError, Migrator},
    postgres::PgConnectOptions,
};
use tracing::{debug, warn};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens one connection per operation; nothing is pooled.
#[derive(Debug, Clone)]
pub struct Db {
    options: PgConnectOptions,
}

impl Db {
    #[must_use]
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }

    /// Open a dedicated connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        debug!(
            host = self.options.get_host(),
            database = self.options.get_database(),
            "opening database connection"
        );

        PgConnection::connect_with(&self.options).await
    }

    /// Close a connection. Close failures are logged, not returned.
    pub async fn release(&self, conn: PgConnection) {
        if let Err(error) = conn.close().await {
            warn!(%error, "failed to close database connection");
        }
    }

    /// Apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting or migrating fails.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        let mut conn = self.connect().await.map_err(MigrateError::Execute)?;

        let result = MIGRATOR.run(&mut conn).await;

        self.release(conn).await;

        result
    }
}
