//! Orders Repository

use doruken::prelude::{Aggregate, Measure, Order, OrderId, Scope};
use jiff_sqlx::Date as SqlxDate;
use sqlx::{PgConnection, Postgres, query, query_as, query_scalar};

use crate::domain::orders::records::{OrderParams, OrderRow};

const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const FIND_ORDER_IDS_BY_NAME_SQL: &str = include_str!("sql/find_order_ids_by_name.sql");
const MARK_PAID_SQL: &str = include_str!("sql/mark_paid.sql");
const LIST_ALL_NAMES_SQL: &str = include_str!("sql/list_all_names.sql");
const LIST_UNPAID_NAMES_SQL: &str = include_str!("sql/list_unpaid_names.sql");
const LIST_SHIPPING_NAMES_SQL: &str = include_str!("sql/list_shipping_names.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const SUM_QUANTITY_SQL: &str = include_str!("sql/sum_quantity.sql");
const SUM_REVENUE_SQL: &str = include_str!("sql/sum_revenue.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");

/// Which customer names to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameFilter {
    All,
    Unpaid,
    Shipping,
}

impl NameFilter {
    const fn sql(self) -> &'static str {
        match self {
            NameFilter::All => LIST_ALL_NAMES_SQL,
            NameFilter::Unpaid => LIST_UNPAID_NAMES_SQL,
            NameFilter::Shipping => LIST_SHIPPING_NAMES_SQL,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        conn: &mut PgConnection,
        params: OrderParams,
    ) -> Result<Order, sqlx::Error> {
        let row = query_as::<Postgres, OrderRow>(CREATE_ORDER_SQL)
            .bind(params.name)
            .bind(params.email)
            .bind(params.phone)
            .bind(params.package)
            .bind(params.size)
            .bind(params.upsize_price)
            .bind(params.quantity)
            .bind(params.is_pickup)
            .bind(params.address)
            .bind(params.origin)
            .bind(params.destination)
            .bind(params.shipping_cost)
            .bind(SqlxDate::from(params.due_date))
            .bind(params.total_price)
            .fetch_one(&mut *conn)
            .await?;

        Ok(row.into())
    }

    pub(crate) async fn list_names(
        &self,
        conn: &mut PgConnection,
        filter: NameFilter,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(filter.sql())
            .fetch_all(&mut *conn)
            .await
    }

    pub(crate) async fn mark_paid(
        &self,
        conn: &mut PgConnection,
        order: OrderId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_PAID_SQL)
            .bind(order.into_i64())
            .execute(&mut *conn)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_orders(
        &self,
        conn: &mut PgConnection,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let rows = query_as::<Postgres, OrderRow>(LIST_ORDERS_SQL)
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    pub(crate) async fn get_order(
        &self,
        conn: &mut PgConnection,
        order: OrderId,
    ) -> Result<Order, sqlx::Error> {
        let row = query_as::<Postgres, OrderRow>(GET_ORDER_SQL)
            .bind(order.into_i64())
            .fetch_one(&mut *conn)
            .await?;

        Ok(row.into())
    }

    pub(crate) async fn find_order_ids_by_name(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Vec<OrderId>, sqlx::Error> {
        let ids = query_scalar::<Postgres, i64>(FIND_ORDER_IDS_BY_NAME_SQL)
            .bind(name)
            .fetch_all(&mut *conn)
            .await?;

        Ok(ids.into_iter().map(OrderId::from_i64).collect())
    }

    /// `NULL` binds leave the package and payment filters open.
    pub(crate) async fn aggregate(
        &self,
        conn: &mut PgConnection,
        aggregate: &Aggregate,
    ) -> Result<i64, sqlx::Error> {
        let sql = match aggregate.measure {
            Measure::Quantity => SUM_QUANTITY_SQL,
            Measure::Revenue => SUM_REVENUE_SQL,
            Measure::Orders => COUNT_ORDERS_SQL,
        };

        let (package, paid) = match &aggregate.scope {
            Scope::All => (None, None),
            Scope::Package(name) => (Some(name.clone()), None),
            Scope::Paid => (None, Some(true)),
            Scope::Unpaid => (None, Some(false)),
        };

        query_scalar::<Postgres, i64>(sql)
            .bind(package)
            .bind(paid)
            .fetch_one(&mut *conn)
            .await
    }
}
