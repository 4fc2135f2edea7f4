use clap::Args;
use doruken::prelude::{Customer, Delivery, OrderDraft, ShippingDetails, Size, format_amount};
use doruken_app::context::AppContext;
use jiff::civil::Date;

/// Shipments leave from the Depok workshop unless told otherwise.
const DEFAULT_ORIGIN: &str = "depok";

#[derive(Debug, Args)]
pub(crate) struct CreateOrderArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Customer email
    #[arg(long)]
    email: String,

    /// Customer phone number
    #[arg(long)]
    phone: String,

    /// Package key or name; the first catalog package when omitted
    #[arg(long)]
    package: Option<String>,

    /// Apparel size (S, M, L, XL, 2XL, 3XL, 4XL)
    #[arg(long)]
    size: Size,

    /// Number of pieces
    #[arg(long, default_value_t = 1)]
    qty: u32,

    /// Payment deadline (YYYY-MM-DD)
    #[arg(long)]
    due_date: Date,

    /// Ship the order instead of picking it up
    #[arg(long)]
    shipping: bool,

    /// Delivery address
    #[arg(long, requires = "shipping")]
    address: Option<String>,

    /// Courier origin city
    #[arg(long, requires = "shipping", default_value = DEFAULT_ORIGIN)]
    origin: String,

    /// Courier destination city
    #[arg(long, requires = "shipping")]
    destination: Option<String>,

    /// Courier cost in rupiah
    #[arg(long, requires = "shipping", default_value_t = 0)]
    shipping_cost: u64,
}

impl CreateOrderArgs {
    fn into_draft(self, default_package: Option<&str>) -> Result<OrderDraft, String> {
        let package = self
            .package
            .or_else(|| default_package.map(str::to_string))
            .ok_or_else(|| "the catalog has no packages".to_string())?;

        let delivery = if self.shipping {
            Delivery::Shipping(ShippingDetails {
                address: self.address.unwrap_or_default(),
                origin: self.origin,
                destination: self.destination.unwrap_or_default(),
                cost: self.shipping_cost,
            })
        } else {
            Delivery::Pickup
        };

        Ok(OrderDraft {
            customer: Customer {
                name: self.name,
                email: self.email,
                phone: self.phone,
            },
            package,
            size: self.size,
            quantity: self.qty,
            delivery,
            due_date: self.due_date,
        })
    }
}

pub(crate) async fn run(args: CreateOrderArgs, context: &AppContext) -> Result<(), String> {
    let catalog = &context.storefront.catalog;
    let default_package = catalog.packages().first().map(|package| package.key.as_str());

    let order = catalog
        .quote(args.into_draft(default_package)?)
        .map_err(|error| format!("invalid order: {error}"))?;

    let order = context
        .orders
        .create_order(order)
        .await
        .map_err(|error| format!("failed to create order: {error}"))?;

    println!("order_id: {}", order.id);
    println!("customer: {}", order.customer.name);
    println!("package: {} ({})", order.package, order.size);
    println!("total: {}", format_amount(order.total_price));

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CreateOrderArgs,
    }

    fn parse(extra: &[&str]) -> Result<CreateOrderArgs, clap::Error> {
        let base = [
            "create",
            "--name",
            "Sari",
            "--email",
            "sari@example.com",
            "--phone",
            "0812",
            "--size",
            "2XL",
            "--due-date",
            "2025-03-01",
        ];

        Ok(TestCli::try_parse_from(base.iter().chain(extra).copied())?.args)
    }

    #[test]
    fn pickup_is_the_default() -> TestResult {
        let draft = parse(&[])?.into_draft(Some("pira"))?;

        assert_eq!(draft.delivery, Delivery::Pickup);
        assert_eq!(draft.package, "pira");
        assert_eq!(draft.size, Size::XXL);
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.due_date, date(2025, 3, 1));

        Ok(())
    }

    #[test]
    fn shipping_origin_defaults_to_depok() -> TestResult {
        let draft = parse(&[
            "--shipping",
            "--address",
            "Jl. Mawar 1, Bogor",
            "--destination",
            "bogor",
            "--shipping-cost",
            "12000",
        ])?
        .into_draft(Some("pira"))?;

        assert_eq!(
            draft.delivery,
            Delivery::Shipping(ShippingDetails {
                address: "Jl. Mawar 1, Bogor".to_string(),
                origin: "depok".to_string(),
                destination: "bogor".to_string(),
                cost: 12_000,
            })
        );

        Ok(())
    }

    #[test]
    fn address_without_shipping_is_rejected() {
        let result = parse(&["--address", "Jl. Mawar 1"]);

        assert!(result.is_err(), "--address requires --shipping");
    }

    #[test]
    fn explicit_package_wins() -> TestResult {
        let draft = parse(&["--package", "Juliana Shafira Package"])?.into_draft(Some("pira"))?;

        assert_eq!(draft.package, "Juliana Shafira Package");

        Ok(())
    }
}
