//! Invoices service.

use std::sync::Arc;

use async_trait::async_trait;
use doruken::prelude::{InvoiceDocument, Order, OrderLookup, ShippingDocument, Storefront};
use mockall::automock;
use tracing::info;

use crate::{
    domain::{invoices::errors::InvoicesServiceError, orders::OrdersService},
    render::{InvoiceRenderer, TemplateKind},
};

/// A rendered document and the name to save it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedInvoice {
    pub file_name: String,
    pub html: String,
    pub pdf: Vec<u8>,
}

/// Builds invoice documents from stored orders and renders them with the storefront's
/// templates.
#[derive(Clone)]
pub struct StorefrontInvoicesService {
    orders: Arc<dyn OrdersService>,
    storefront: Storefront,
    renderer: Arc<InvoiceRenderer>,
    logo: String,
}

impl StorefrontInvoicesService {
    /// `logo` is the `file://` URI placed in every issuer block.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        storefront: Storefront,
        renderer: Arc<InvoiceRenderer>,
        logo: String,
    ) -> Self {
        Self {
            orders,
            storefront,
            renderer,
            logo,
        }
    }

    fn shipping_for(&self, order: &Order) -> Result<ShippingDocument, InvoicesServiceError> {
        if !order.delivery.is_shipping() {
            return Err(InvoicesServiceError::NotShipping(order.id));
        }

        Ok(ShippingDocument::build(order, &self.storefront, &self.logo))
    }
}

#[async_trait]
impl InvoicesService for StorefrontInvoicesService {
    async fn invoice_document(
        &self,
        lookup: OrderLookup,
    ) -> Result<InvoiceDocument, InvoicesServiceError> {
        let order = self.orders.find_order(lookup).await?;

        Ok(InvoiceDocument::build(&order, &self.storefront, &self.logo))
    }

    async fn shipping_document(
        &self,
        lookup: OrderLookup,
    ) -> Result<ShippingDocument, InvoicesServiceError> {
        let order = self.orders.find_order(lookup).await?;

        self.shipping_for(&order)
    }

    async fn render_invoice(
        &self,
        lookup: OrderLookup,
    ) -> Result<RenderedInvoice, InvoicesServiceError> {
        let document = self.invoice_document(lookup).await?;
        let rendered = self.renderer.render(TemplateKind::Invoice, &document).await?;
        let file_name = document.file_name(&self.storefront);

        info!(order = %document.invoice_number, file = %file_name, "rendered invoice");

        Ok(RenderedInvoice {
            file_name,
            html: rendered.html,
            pdf: rendered.pdf,
        })
    }

    async fn render_shipping(
        &self,
        lookup: OrderLookup,
    ) -> Result<RenderedInvoice, InvoicesServiceError> {
        let document = self.shipping_document(lookup).await?;
        let rendered = self
            .renderer
            .render(TemplateKind::Shipping, &document)
            .await?;
        let file_name = document.file_name(&self.storefront);

        info!(order = %document.invoice_number, file = %file_name, "rendered shipping label");

        Ok(RenderedInvoice {
            file_name,
            html: rendered.html,
            pdf: rendered.pdf,
        })
    }
}

#[automock]
#[async_trait]
pub trait InvoicesService: Send + Sync {
    /// Standard invoice for an order.
    async fn invoice_document(
        &self,
        lookup: OrderLookup,
    ) -> Result<InvoiceDocument, InvoicesServiceError>;

    /// Shipping label for an order that ships.
    async fn shipping_document(
        &self,
        lookup: OrderLookup,
    ) -> Result<ShippingDocument, InvoicesServiceError>;

    /// Render the standard invoice to HTML and PDF.
    async fn render_invoice(
        &self,
        lookup: OrderLookup,
    ) -> Result<RenderedInvoice, InvoicesServiceError>;

    /// Render the shipping label to HTML and PDF.
    async fn render_shipping(
        &self,
        lookup: OrderLookup,
    ) -> Result<RenderedInvoice, InvoicesServiceError>;
}
