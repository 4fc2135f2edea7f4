use doruken::prelude::OrderLookup;
use doruken_app::context::AppContext;

use crate::cli::LookupArgs;

pub(crate) async fn run(args: LookupArgs, context: &AppContext) -> Result<(), String> {
    let id = match args.lookup()? {
        OrderLookup::Id(id) => context.orders.mark_paid(id).await.map(|()| id),
        OrderLookup::Name(name) => context.orders.mark_paid_by_name(&name).await,
    }
    .map_err(|error| format!("failed to mark order paid: {error}"))?;

    println!("order {id} marked paid");

    Ok(())
}
