use clap::Args;
use doruken::prelude::{Aggregate, Measure, format_amount};
use doruken_app::context::AppContext;
use tabled::builder::Builder;

use crate::cli::table;

#[derive(Debug, Args)]
pub(crate) struct StatsArgs {
    /// Aggregate to compute (qty, total, count); the dashboard when omitted
    #[arg(long, requires = "scope")]
    kind: Option<String>,

    /// Orders to include (all, paid, not_paid, or a package key/name)
    #[arg(long, requires = "kind")]
    scope: Option<String>,
}

pub(crate) async fn run(args: StatsArgs, context: &AppContext) -> Result<(), String> {
    if let (Some(kind), Some(scope)) = (args.kind, args.scope) {
        let value = context
            .orders
            .aggregate(&kind, &scope)
            .await
            .map_err(|error| format!("failed to compute {kind} for {scope}: {error}"))?;

        println!("{}", display_value(Measure::from_name(&kind), value));

        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Measure", "Scope", "Value"]);

    for aggregate in Aggregate::dashboard(&context.storefront.catalog) {
        let label = (aggregate.measure, aggregate.scope.to_string());
        let value = context
            .orders
            .evaluate(aggregate)
            .await
            .map_err(|error| format!("failed to compute statistics: {error}"))?;

        builder.push_record([
            label.0.name().to_string(),
            label.1,
            display_value(Some(label.0), value),
        ]);
    }

    println!("{}", table::render(builder, 2..3));

    Ok(())
}

fn display_value(measure: Option<Measure>, value: u64) -> String {
    match measure {
        Some(Measure::Revenue) => format_amount(value),
        _ => value.to_string(),
    }
}
