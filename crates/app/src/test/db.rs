//! Per-test PostgreSQL databases inside one shared container.

use std::{
    env, thread,
    time::{SystemTime, UNIX_EPOCH},
};

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, postgres::PgConnectOptions};
use testcontainers_modules::{
    postgres::Postgres as PostgresImage,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};
use tokio::sync::{OnceCell, mpsc};

use crate::database::{Db, MIGRATOR};

const TEST_USER: &str = "doruken_test";
const TEST_PASSWORD: &str = "doruken_test_password";

/// Started on first use and shared by every test in the binary.
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases waiting to be dropped.
static DROP_QUEUE: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

/// Accepts generated names only: a letter or underscore first, then letters, digits and
/// underscores, at most 63 bytes.
fn validate_database_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        Some(_) => return Err(format!("`{name}` must start with a letter or underscore")),
        None => return Err("database name is empty".to_string()),
    }

    if name.len() > 63 {
        return Err(format!("`{name}` is longer than 63 bytes"));
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("`{name}` contains characters other than [A-Za-z0-9_]"));
    }

    Ok(())
}

fn server_url(database: &str, port: u16) -> String {
    let host = env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{TEST_USER}:{TEST_PASSWORD}@{host}:{port}/{database}")
}

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(TEST_USER)
        .with_password(TEST_PASSWORD)
        .with_db_name("doruken_test")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn container_port() -> u16 {
    POSTGRES_CONTAINER
        .get_or_init(start_container)
        .await
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port")
}

async fn start_drop_queue() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("Failed to drop test database `{name}`: {error}");
            }
        }
    });

    sender
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    if validate_database_name(name).is_err() {
        return Ok(());
    }

    let mut conn = PgConnection::connect(&server_url("postgres", container_port().await)).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\""))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// A migrated database of its own for one test, dropped once the handle goes away.
#[derive(Debug)]
pub struct TestDb {
    /// Pool for assertions and fixtures that bypass the services.
    pub pool: PgPool,

    /// Generated database name.
    pub name: String,

    url: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(queue) = DROP_QUEUE.get() {
            let _ = queue.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Clock before UNIX epoch")
            .as_nanos();

        let name = format!("doruken_test_{nanos}_{:?}", thread::current().id())
            .replace([':', ' ', '(', ')'], "");

        Self::with_name(&name).await
    }

    pub async fn with_name(name: &str) -> Self {
        DROP_QUEUE.get_or_init(start_drop_queue).await;

        if let Err(error) = validate_database_name(name) {
            panic!("Invalid test database name: {error}");
        }

        let port = container_port().await;

        let mut admin = PgConnection::connect(&server_url("postgres", port))
            .await
            .expect("Failed to connect to the postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("Failed to create test database");

        admin
            .close()
            .await
            .expect("Failed to close admin connection");

        let url = server_url(name, port);

        let pool = PgPool::connect(&url)
            .await
            .expect("Failed to connect to test database");

        MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to migrate test database");

        Self {
            pool,
            name: name.to_string(),
            url,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// A [`Db`] handle opening fresh connections to this database, as services do.
    pub fn db(&self) -> Db {
        let options: PgConnectOptions = self.url.parse().expect("Failed to parse test url");

        Db::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_style_names_are_valid() {
        assert!(validate_database_name("doruken_test_1740000000_ThreadId2").is_ok());
        assert!(validate_database_name("_leading_underscore").is_ok());
    }

    #[test]
    fn unsafe_names_are_rejected() {
        assert!(validate_database_name("").is_err(), "empty");
        assert!(validate_database_name("1abc").is_err(), "leading digit");
        assert!(validate_database_name("a\"; DROP").is_err(), "quote");
        assert!(validate_database_name("with-hyphen").is_err(), "hyphen");
        assert!(validate_database_name(&"a".repeat(64)).is_err(), "too long");
    }

    #[tokio::test]
    async fn migrations_create_an_empty_invoice_table() {
        let test_db = TestDb::new().await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_table")
            .fetch_one(test_db.pool())
            .await
            .expect("invoice_table should exist");

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn db_handle_connects_and_releases() {
        let test_db = TestDb::new().await;
        let db = test_db.db();

        let mut conn = db.connect().await.expect("Failed to open connection");

        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&mut conn)
            .await
            .expect("Failed to run query");

        db.release(conn).await;

        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn migrating_twice_is_a_no_op() {
        let test_db = TestDb::new().await;

        test_db
            .db()
            .migrate()
            .await
            .expect("Re-running migrations should succeed");
    }
}
