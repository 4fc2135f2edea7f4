//! Orders service.

use async_trait::async_trait;
use doruken::prelude::{Aggregate, Catalog, NewOrder, Order, OrderId, OrderLookup};
use mockall::automock;
use sqlx::PgConnection;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        records::OrderParams,
        repository::{NameFilter, PgOrdersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    catalog: Catalog,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    /// Create a service over `db`. The catalog resolves package scopes of named
    /// aggregates.
    #[must_use]
    pub fn new(db: Db, catalog: Catalog) -> Self {
        Self {
            db,
            catalog,
            repository: PgOrdersRepository::new(),
        }
    }

    async fn connect(&self) -> Result<PgConnection, OrdersServiceError> {
        self.db
            .connect()
            .await
            .map_err(OrdersServiceError::Connection)
    }

    async fn list_names(&self, filter: NameFilter) -> Result<Vec<String>, OrdersServiceError> {
        let mut conn = self.connect().await?;

        let result = self.repository.list_names(&mut conn, filter).await;

        self.db.release(conn).await;

        Ok(result?)
    }

    async fn resolve(
        &self,
        conn: &mut PgConnection,
        lookup: &OrderLookup,
    ) -> Result<OrderId, OrdersServiceError> {
        match lookup {
            OrderLookup::Id(id) => Ok(*id),
            OrderLookup::Name(name) => {
                let ids = self.repository.find_order_ids_by_name(conn, name).await?;

                match ids.as_slice() {
                    [] => Err(OrdersServiceError::NotFound),
                    [id] => Ok(*id),
                    _ => Err(OrdersServiceError::AmbiguousName {
                        name: name.clone(),
                        ids: ids.clone(),
                    }),
                }
            }
        }
    }

    async fn find_in(
        &self,
        conn: &mut PgConnection,
        lookup: &OrderLookup,
    ) -> Result<Order, OrdersServiceError> {
        let order = self.resolve(conn, lookup).await?;

        Ok(self.repository.get_order(conn, order).await?)
    }

    async fn mark_paid_in(
        &self,
        conn: &mut PgConnection,
        lookup: &OrderLookup,
    ) -> Result<OrderId, OrdersServiceError> {
        let order = self.resolve(conn, lookup).await?;

        if self.repository.mark_paid(conn, order).await? == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        Ok(order)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        self.catalog.verify(&order)?;

        let params = OrderParams::try_from(&order)?;

        let mut conn = self.connect().await?;

        let result = self.repository.create_order(&mut conn, params).await;

        self.db.release(conn).await;

        let created = result?;

        info!(
            order = %created.id,
            customer = %created.customer.name,
            total = created.total_price,
            "order recorded"
        );

        Ok(created)
    }

    async fn list_unpaid_names(&self) -> Result<Vec<String>, OrdersServiceError> {
        self.list_names(NameFilter::Unpaid).await
    }

    async fn list_shipping_names(&self) -> Result<Vec<String>, OrdersServiceError> {
        self.list_names(NameFilter::Shipping).await
    }

    async fn list_all_names(&self) -> Result<Vec<String>, OrdersServiceError> {
        self.list_names(NameFilter::All).await
    }

    async fn mark_paid(&self, order: OrderId) -> Result<(), OrdersServiceError> {
        let mut conn = self.connect().await?;

        let result = self.repository.mark_paid(&mut conn, order).await;

        self.db.release(conn).await;

        if result? == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        info!(%order, "order marked paid");

        Ok(())
    }

    async fn mark_paid_by_name(&self, name: &str) -> Result<OrderId, OrdersServiceError> {
        let mut conn = self.connect().await?;

        let result = self
            .mark_paid_in(&mut conn, &OrderLookup::Name(name.to_string()))
            .await;

        self.db.release(conn).await;

        let order = result?;

        info!(%order, customer = name, "order marked paid");

        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut conn = self.connect().await?;

        let result = self.repository.list_orders(&mut conn).await;

        self.db.release(conn).await;

        Ok(result?)
    }

    async fn find_order(&self, lookup: OrderLookup) -> Result<Order, OrdersServiceError> {
        let mut conn = self.connect().await?;

        let result = self.find_in(&mut conn, &lookup).await;

        self.db.release(conn).await;

        debug!(%lookup, found = result.is_ok(), "order lookup");

        result
    }

    async fn aggregate(&self, kind: &str, scope: &str) -> Result<u64, OrdersServiceError> {
        let Some(aggregate) = Aggregate::lookup(kind, scope, &self.catalog) else {
            debug!(kind, scope, "unknown aggregate, reporting zero");

            return Ok(0);
        };

        self.evaluate(aggregate).await
    }

    async fn evaluate(&self, aggregate: Aggregate) -> Result<u64, OrdersServiceError> {
        let mut conn = self.connect().await?;

        let result = self.repository.aggregate(&mut conn, &aggregate).await;

        self.db.release(conn).await;

        Ok(u64::try_from(result?)?)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validates and stores a priced order, returning it with its id and timestamp.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Names on orders not yet paid, by id.
    async fn list_unpaid_names(&self) -> Result<Vec<String>, OrdersServiceError>;

    /// Names on orders that ship, by id.
    async fn list_shipping_names(&self) -> Result<Vec<String>, OrdersServiceError>;

    /// Every customer name, by id.
    async fn list_all_names(&self) -> Result<Vec<String>, OrdersServiceError>;

    /// Marks an order paid. Marking a paid order again succeeds.
    async fn mark_paid(&self, order: OrderId) -> Result<(), OrdersServiceError>;

    /// Marks the single order recorded under `name` paid.
    async fn mark_paid_by_name(&self, name: &str) -> Result<OrderId, OrdersServiceError>;

    /// Every order, by id.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve a single order by id or unique customer name.
    async fn find_order(&self, lookup: OrderLookup) -> Result<Order, OrdersServiceError>;

    /// Named aggregate (`qty`, `total`, `count`) over a named scope. Unknown names yield zero.
    async fn aggregate(&self, kind: &str, scope: &str) -> Result<u64, OrdersServiceError>;

    /// Evaluate an aggregate query.
    async fn evaluate(&self, aggregate: Aggregate) -> Result<u64, OrdersServiceError>;
}
