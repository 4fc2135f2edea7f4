//! Test Helpers

use doruken::prelude::{
    Catalog, Customer, Delivery, NewOrder, Order, OrderDraft, OrderError, OrderId, Size,
};
use jiff::{Timestamp, civil::date};

/// Price an order for `name` against the default catalog.
pub(crate) fn quote(
    name: &str,
    size: Size,
    quantity: u32,
    delivery: Delivery,
) -> Result<NewOrder, OrderError> {
    Catalog::default().quote(OrderDraft {
        customer: Customer {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "0812000000".to_string(),
        },
        package: "pira".to_string(),
        size,
        quantity,
        delivery,
        due_date: date(2025, 12, 31),
    })
}

/// A stored order as the database would return it.
pub(crate) fn stored(id: i64, order: NewOrder) -> Order {
    Order {
        id: OrderId::from_i64(id),
        customer: order.customer,
        package: order.package,
        size: order.size,
        quantity: order.quantity,
        upsize_price: order.upsize_price,
        delivery: order.delivery,
        due_date: order.due_date,
        total_price: order.total_price,
        created_at: Timestamp::from_second(1_740_000_000).expect("valid timestamp"),
        paid: false,
    }
}
