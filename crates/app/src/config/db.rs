//! Database Config

use std::fmt::{Debug, Formatter, Result as FmtResult};

use clap::Args;
use sqlx::postgres::PgConnectOptions;

/// Database settings.
#[derive(Clone, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` host
    #[arg(long = "db-host", env = "POSTGRES_HOST", default_value = "localhost")]
    pub host: String,

    /// `PostgreSQL` port
    #[arg(long = "db-port", env = "POSTGRES_PORT", default_value_t = 5432)]
    pub port: u16,

    /// `PostgreSQL` user
    #[arg(long = "db-user", env = "POSTGRES_USER")]
    pub user: String,

    /// `PostgreSQL` password
    #[arg(long = "db-password", env = "POSTGRES_PASS", hide_env_values = true)]
    pub password: Option<String>,

    /// `PostgreSQL` database name
    #[arg(long = "db-name", env = "POSTGRES_DB")]
    pub name: String,
}

impl DatabaseConfig {
    /// Connection options for a single connection.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);

        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

impl Debug for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("name", &self.name)
            .finish()
    }
}
