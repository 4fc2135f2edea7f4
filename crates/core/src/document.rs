//! Invoice Documents
//!
//! Template-ready views of a stored order. Field names serialize in camelCase to match
//! the placeholders used by the invoice templates.

use jiff::civil::Date;
use serde::Serialize;

use crate::{
    orders::{Order, OrderId},
    storefront::{Address, Issuer, Storefront},
};

/// Customer block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Customer name.
    pub first_name: String,

    /// Always blank; the order stores a single name field.
    pub last_name: String,

    /// Customer phone.
    pub phone_number: String,

    /// Delivery address; blank for pickup orders.
    pub address: Address,

    /// Always blank.
    pub discord_username: String,
}

impl ClientInfo {
    fn from_order(order: &Order) -> Self {
        Self {
            first_name: order.customer.name.clone(),
            last_name: String::new(),
            phone_number: order.customer.phone.clone(),
            address: Address {
                city: order
                    .delivery
                    .shipping()
                    .map(|details| details.address.clone())
                    .unwrap_or_default(),
                country: String::new(),
            },
            discord_username: String::new(),
        }
    }
}

/// Issuer block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerInfo {
    /// `file://` URI of the logo image.
    pub logo: String,

    /// Company name.
    pub company_name: String,

    /// Contact first name.
    pub first_name: String,

    /// Contact last name.
    pub last_name: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Address block.
    pub address: Address,

    /// Discord handle.
    pub discord_username: String,
}

impl IssuerInfo {
    fn new(issuer: &Issuer, logo: &str) -> Self {
        Self {
            logo: logo.to_string(),
            company_name: issuer.company_name.clone(),
            first_name: issuer.first_name.clone(),
            last_name: issuer.last_name.clone(),
            phone_number: issuer.phone_number.clone(),
            address: issuer.address.clone(),
            discord_username: issuer.discord_username.clone(),
        }
    }
}

/// One row of the invoice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    /// Item description.
    pub item: String,

    /// Secondary text, e.g. the size.
    pub notes: String,

    /// Quantity; absent for the shipping line.
    pub qty: Option<u32>,

    /// Line amount in rupiah.
    pub total: u64,
}

/// Standard invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDocument {
    /// Heading.
    pub title: String,

    /// Order id.
    pub invoice_number: OrderId,

    /// Date the order was recorded.
    pub issue_date: Date,

    /// Payment deadline.
    pub due_date: Date,

    /// Paid flag.
    pub status: bool,

    /// Customer block.
    pub client: ClientInfo,

    /// Issuer block.
    pub server: IssuerInfo,

    /// Package, upsize and shipping lines, in that order.
    pub item_list: Vec<LineItem>,

    /// Payment terms.
    pub terms: Vec<String>,
}

impl InvoiceDocument {
    /// Build the standard invoice for an order.
    ///
    /// The package line is `total − shipping − upsize`, the upsize line is
    /// `upsize × quantity` and the shipping line carries the courier cost.
    pub fn build(order: &Order, storefront: &Storefront, logo: &str) -> Self {
        let issue_date = order
            .created_at
            .to_zoned(storefront.time_zone())
            .date();

        let item_list = vec![
            LineItem {
                item: order.package.clone(),
                notes: order.size.to_string(),
                qty: Some(order.quantity),
                total: order.package_line_total(),
            },
            LineItem {
                item: storefront.upsize_label.clone(),
                notes: order.size.to_string(),
                qty: Some(order.quantity),
                total: order.upsize_line_total(),
            },
            LineItem {
                item: storefront.shipping_label.clone(),
                notes: String::new(),
                qty: None,
                total: order.delivery.shipping_cost(),
            },
        ];

        Self {
            title: storefront.title.clone(),
            invoice_number: order.id,
            issue_date,
            due_date: order.due_date,
            status: order.paid,
            client: ClientInfo::from_order(order),
            server: IssuerInfo::new(&storefront.issuer, logo),
            item_list,
            terms: storefront.terms.clone(),
        }
    }

    /// Download name, e.g. `invoice-pira-12-Sari.pdf`.
    pub fn file_name(&self, storefront: &Storefront) -> String {
        file_name(
            &storefront.invoice_file_prefix,
            self.invoice_number,
            &self.client.first_name,
        )
    }
}

/// Shipping label: who sends what to whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDocument {
    /// Order id.
    pub invoice_number: OrderId,

    /// Recipient block.
    pub client: ClientInfo,

    /// Sender block.
    pub server: IssuerInfo,
}

impl ShippingDocument {
    /// Build the shipping label for an order.
    pub fn build(order: &Order, storefront: &Storefront, logo: &str) -> Self {
        Self {
            invoice_number: order.id,
            client: ClientInfo::from_order(order),
            server: IssuerInfo::new(&storefront.sender, logo),
        }
    }

    /// Download name, e.g. `invoice-shipping-pira-12-Sari.pdf`.
    pub fn file_name(&self, storefront: &Storefront) -> String {
        file_name(
            &storefront.shipping_file_prefix,
            self.invoice_number,
            &self.client.first_name,
        )
    }
}

fn file_name(prefix: &str, invoice_number: OrderId, first_name: &str) -> String {
    let first_name = first_name.replace(['/', '\\'], "_");

    format!("{prefix}-{invoice_number}-{first_name}.pdf")
}
