//! Orders

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::{Timestamp, civil::Date};
use thiserror::Error;

use crate::{catalog::Size, ids::TypedId};

/// Order Id
pub type OrderId = TypedId<Order>;

/// Order validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// A required text field was blank.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Package is not in the catalog.
    #[error("unknown package `{0}`")]
    UnknownPackage(String),

    /// Package price on the order differs from the catalog's.
    #[error("package `{package}` costs {expected}, not {actual}")]
    PriceMismatch {
        /// Package display name
        package: String,
        /// Catalog price
        expected: u64,
        /// Price on the order
        actual: u64,
    },

    /// Upsize surcharge does not match the size table.
    #[error("upsize surcharge {actual} does not match {expected} for size {size}")]
    UpsizeMismatch {
        /// Ordered size
        size: Size,
        /// Surcharge from the size table
        expected: u64,
        /// Surcharge on the order
        actual: u64,
    },

    /// Total does not match the pricing formula.
    #[error("total price {actual} does not match computed total {expected}")]
    TotalMismatch {
        /// `(package + upsize) × quantity + shipping`
        expected: u64,
        /// Total on the order
        actual: u64,
    },

    /// An amount did not fit in the supported range.
    #[error("amount overflow")]
    Overflow,
}

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Customer name printed on the invoice.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone number.
    pub phone: String,
}

/// Shipping destination and cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    /// Delivery address.
    pub address: String,

    /// City the parcel ships from.
    pub origin: String,

    /// City the parcel ships to.
    pub destination: String,

    /// Courier cost in rupiah.
    pub cost: u64,
}

/// How the order reaches the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Collected in person at the pickup point.
    Pickup,

    /// Shipped to the customer's address.
    Shipping(ShippingDetails),
}

impl Delivery {
    /// Whether the order ships.
    pub const fn is_shipping(&self) -> bool {
        matches!(self, Delivery::Shipping(_))
    }

    /// Courier cost, zero for pickup.
    pub const fn shipping_cost(&self) -> u64 {
        match self {
            Delivery::Pickup => 0,
            Delivery::Shipping(details) => details.cost,
        }
    }

    /// Shipping details, if any.
    pub const fn shipping(&self) -> Option<&ShippingDetails> {
        match self {
            Delivery::Pickup => None,
            Delivery::Shipping(details) => Some(details),
        }
    }
}

/// Order form input before pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Customer contact details.
    pub customer: Customer,

    /// Package key or display name.
    pub package: String,

    /// Apparel size.
    pub size: Size,

    /// Number of pieces.
    pub quantity: u32,

    /// Pickup or shipping.
    pub delivery: Delivery,

    /// Payment deadline.
    pub due_date: Date,
}

impl OrderDraft {
    pub(crate) fn check_required(&self) -> Result<(), OrderError> {
        check_customer(&self.customer)?;
        check_delivery(&self.delivery)?;

        if self.quantity == 0 {
            return Err(OrderError::ZeroQuantity);
        }

        Ok(())
    }
}

/// Priced order ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Customer contact details.
    pub customer: Customer,

    /// Package display name.
    pub package: String,

    /// Package unit price at the time of quoting; not stored.
    pub package_price: u64,

    /// Apparel size.
    pub size: Size,

    /// Number of pieces.
    pub quantity: u32,

    /// Per-piece surcharge for the size.
    pub upsize_price: u64,

    /// Pickup or shipping.
    pub delivery: Delivery,

    /// Payment deadline.
    pub due_date: Date,

    /// Amount due.
    pub total_price: u64,
}

impl NewOrder {
    /// `(package price + upsize surcharge) × quantity + shipping cost`, or `None` on overflow.
    pub fn total_for(
        package_price: u64,
        upsize_price: u64,
        quantity: u32,
        shipping_cost: u64,
    ) -> Option<u64> {
        package_price
            .checked_add(upsize_price)?
            .checked_mul(u64::from(quantity))?
            .checked_add(shipping_cost)
    }

    /// Re-check every invariant of a priced order.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] when a required field is blank, the quantity is zero,
    /// the upsize surcharge disagrees with the size table, or the total disagrees with
    /// the pricing formula.
    pub fn validate(&self) -> Result<(), OrderError> {
        check_customer(&self.customer)?;
        check_delivery(&self.delivery)?;

        if self.package.trim().is_empty() {
            return Err(OrderError::MissingField("package"));
        }

        if self.quantity == 0 {
            return Err(OrderError::ZeroQuantity);
        }

        let expected_upsize = self.size.upsize_surcharge();

        if self.upsize_price != expected_upsize {
            return Err(OrderError::UpsizeMismatch {
                size: self.size,
                expected: expected_upsize,
                actual: self.upsize_price,
            });
        }

        let expected = Self::total_for(
            self.package_price,
            self.upsize_price,
            self.quantity,
            self.delivery.shipping_cost(),
        )
        .ok_or(OrderError::Overflow)?;

        if self.total_price != expected {
            return Err(OrderError::TotalMismatch {
                expected,
                actual: self.total_price,
            });
        }

        Ok(())
    }
}

/// Stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Storage-assigned id, also the invoice number.
    pub id: OrderId,

    /// Customer contact details.
    pub customer: Customer,

    /// Package display name.
    pub package: String,

    /// Apparel size.
    pub size: Size,

    /// Number of pieces.
    pub quantity: u32,

    /// Per-piece surcharge for the size.
    pub upsize_price: u64,

    /// Pickup or shipping.
    pub delivery: Delivery,

    /// Payment deadline.
    pub due_date: Date,

    /// Amount due.
    pub total_price: u64,

    /// Insert time.
    pub created_at: Timestamp,

    /// Whether payment has been received.
    pub paid: bool,
}

impl Order {
    /// Amount attributed to the package line: total minus shipping minus one upsize.
    pub fn package_line_total(&self) -> u64 {
        self.total_price
            .saturating_sub(self.delivery.shipping_cost())
            .saturating_sub(self.upsize_price)
    }

    /// Upsize surcharge across all pieces.
    pub fn upsize_line_total(&self) -> u64 {
        self.upsize_price.saturating_mul(u64::from(self.quantity))
    }
}

/// How a single order is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderLookup {
    /// By storage id.
    Id(OrderId),

    /// By customer name; must match exactly one order.
    Name(String),
}

impl Display for OrderLookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OrderLookup::Id(id) => write!(f, "order #{id}"),
            OrderLookup::Name(name) => write!(f, "order for `{name}`"),
        }
    }
}

impl From<OrderId> for OrderLookup {
    fn from(id: OrderId) -> Self {
        Self::Id(id)
    }
}

fn check_customer(customer: &Customer) -> Result<(), OrderError> {
    if customer.name.trim().is_empty() {
        return Err(OrderError::MissingField("name"));
    }

    if customer.email.trim().is_empty() {
        return Err(OrderError::MissingField("email"));
    }

    if customer.phone.trim().is_empty() {
        return Err(OrderError::MissingField("phone"));
    }

    Ok(())
}

fn check_delivery(delivery: &Delivery) -> Result<(), OrderError> {
    match delivery {
        Delivery::Shipping(details) if details.address.trim().is_empty() => {
            Err(OrderError::MissingField("address"))
        }
        Delivery::Pickup | Delivery::Shipping(_) => Ok(()),
    }
}
