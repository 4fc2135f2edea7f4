//! Order Records

use std::num::TryFromIntError;

use doruken::prelude::{Customer, Delivery, NewOrder, Order, OrderId, ShippingDetails, Size};
use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Row, postgres::PgRow};

/// Row of `invoice_table` decoded into an [`Order`].
#[derive(Debug, Clone)]
pub(crate) struct OrderRow(pub(crate) Order);

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        row.0
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let size_label: String = row.try_get("apparel_size")?;

        let size = size_label
            .parse::<Size>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "apparel_size".to_string(),
                source: Box::new(e),
            })?;

        let quantity = u32::try_from(row.try_get::<i32, _>("qty")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "qty".to_string(),
                source: Box::new(e),
            }
        })?;

        let delivery = if row.try_get::<bool, _>("is_pick_cf")? {
            Delivery::Pickup
        } else {
            Delivery::Shipping(ShippingDetails {
                address: row.try_get("address")?,
                origin: row.try_get("origin")?,
                destination: row.try_get("destination")?,
                cost: decode_amount(row, "shipping_cost")?,
            })
        };

        Ok(Self(Order {
            id: OrderId::from_i64(row.try_get("id_invoice")?),
            customer: Customer {
                name: row.try_get("nama")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
            },
            package: row.try_get("apparel_package")?,
            size,
            quantity,
            upsize_price: decode_amount(row, "upsize_price")?,
            delivery,
            due_date: row.try_get::<SqlxDate, _>("due_date")?.to_jiff(),
            total_price: decode_amount(row, "total_price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            paid: row.try_get("is_paid")?,
        }))
    }
}

fn decode_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Bind values for `create_order.sql`, in placeholder order. Pickup orders store blank
/// shipping fields and a zero cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderParams {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) package: String,
    pub(crate) size: String,
    pub(crate) upsize_price: i64,
    pub(crate) quantity: i32,
    pub(crate) is_pickup: bool,
    pub(crate) address: String,
    pub(crate) origin: String,
    pub(crate) destination: String,
    pub(crate) shipping_cost: i64,
    pub(crate) due_date: Date,
    pub(crate) total_price: i64,
}

impl TryFrom<&NewOrder> for OrderParams {
    type Error = TryFromIntError;

    fn try_from(order: &NewOrder) -> Result<Self, Self::Error> {
        let (is_pickup, address, origin, destination, shipping_cost) = match &order.delivery {
            Delivery::Pickup => (true, String::new(), String::new(), String::new(), 0),
            Delivery::Shipping(details) => (
                false,
                details.address.clone(),
                details.origin.clone(),
                details.destination.clone(),
                i64::try_from(details.cost)?,
            ),
        };

        Ok(Self {
            name: order.customer.name.clone(),
            email: order.customer.email.clone(),
            phone: order.customer.phone.clone(),
            package: order.package.clone(),
            size: order.size.to_string(),
            upsize_price: i64::try_from(order.upsize_price)?,
            quantity: i32::try_from(order.quantity)?,
            is_pickup,
            address,
            origin,
            destination,
            shipping_cost,
            due_date: order.due_date,
            total_price: i64::try_from(order.total_price)?,
        })
    }
}
