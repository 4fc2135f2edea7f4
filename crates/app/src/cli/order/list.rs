use doruken::prelude::{Delivery, Order, format_amount};
use doruken_app::context::AppContext;
use tabled::builder::Builder;

use crate::cli::table;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let orders = context
        .orders
        .list_orders()
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("no orders recorded");
        return Ok(());
    }

    println!("{}", table::render(orders_table(&orders), 4..6));

    Ok(())
}

fn orders_table(orders: &[Order]) -> Builder {
    let mut builder = Builder::default();

    builder.push_record([
        "ID", "Name", "Package", "Size", "Qty", "Total", "Delivery", "Due", "Paid",
    ]);

    for order in orders {
        let delivery = match &order.delivery {
            Delivery::Pickup => "pickup".to_string(),
            Delivery::Shipping(details) => format!("{} → {}", details.origin, details.destination),
        };

        builder.push_record([
            order.id.to_string(),
            order.customer.name.clone(),
            order.package.clone(),
            order.size.to_string(),
            order.quantity.to_string(),
            format_amount(order.total_price),
            delivery,
            order.due_date.to_string(),
            if order.paid { "yes" } else { "no" }.to_string(),
        ]);
    }

    builder
}
