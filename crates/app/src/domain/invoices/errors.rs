//! Invoices Service Errors

use doruken::prelude::OrderId;
use thiserror::Error;

use crate::{domain::orders::OrdersServiceError, render::RenderError};

#[derive(Debug, Error)]
pub enum InvoicesServiceError {
    /// Looking the order up failed.
    #[error(transparent)]
    Orders(#[from] OrdersServiceError),

    /// Shipping labels only exist for orders that ship.
    #[error("order #{0} is picked up; it has no shipping label")]
    NotShipping(OrderId),

    /// Templating or PDF generation failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
