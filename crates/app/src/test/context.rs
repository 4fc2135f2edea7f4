//! Test context for service-level integration tests.

use doruken::prelude::Catalog;

use crate::domain::orders::PgOrdersService;

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;

        Self {
            orders: PgOrdersService::new(test_db.db(), Catalog::default()),
            db: test_db,
        }
    }
}
