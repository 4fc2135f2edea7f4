//! Catalog
//!
//! Apparel packages, sizes and the upsize surcharge table.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orders::{NewOrder, OrderDraft, OrderError};

/// Apparel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Size {
    /// Small
    S,

    /// Medium
    M,

    /// Large
    L,

    /// Extra large
    XL,

    /// `2XL`
    XXL,

    /// `3XL`
    XXXL,

    /// `4XL`
    XXXXL,
}

impl Size {
    /// Every size in display order.
    pub const ALL: [Size; 7] = [
        Size::S,
        Size::M,
        Size::L,
        Size::XL,
        Size::XXL,
        Size::XXXL,
        Size::XXXXL,
    ];

    /// Label printed on invoices and stored in the database.
    pub const fn label(self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
            Size::XXL => "2XL",
            Size::XXXL => "3XL",
            Size::XXXXL => "4XL",
        }
    }

    /// Per-piece surcharge for oversized apparel.
    pub const fn upsize_surcharge(self) -> u64 {
        match self {
            Size::S | Size::M | Size::L | Size::XL => 0,
            Size::XXL => 5_000,
            Size::XXXL => 10_000,
            Size::XXXXL => 15_000,
        }
    }

    /// Whether this size carries a surcharge.
    pub const fn is_upsize(self) -> bool {
        self.upsize_surcharge() > 0
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Unknown size label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown size `{0}`, expected one of S, M, L, XL, 2XL, 3XL, 4XL")]
pub struct ParseSizeError(pub String);

impl FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();

        Size::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(label))
            .or_else(|| match label.to_ascii_uppercase().as_str() {
                "XXL" => Some(Size::XXL),
                "XXXL" => Some(Size::XXXL),
                "XXXXL" => Some(Size::XXXXL),
                _ => None,
            })
            .ok_or_else(|| ParseSizeError(s.to_string()))
    }
}

impl TryFrom<String> for Size {
    type Error = ParseSizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.label().to_string()
    }
}

/// A package on sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Short key used on the command line and in stats scopes, e.g. `pira`.
    pub key: String,

    /// Display name stored on the order.
    pub name: String,

    /// Unit price in rupiah.
    pub price: u64,
}

/// Packages available to order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    packages: Vec<Package>,
}

impl Catalog {
    /// Create a catalog from a list of packages.
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// All packages in listing order.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Find a package by key or display name (case-insensitive).
    pub fn package(&self, key_or_name: &str) -> Option<&Package> {
        let needle = key_or_name.trim();

        self.packages.iter().find(|package| {
            package.key.eq_ignore_ascii_case(needle) || package.name.eq_ignore_ascii_case(needle)
        })
    }

    /// Price a draft order.
    ///
    /// The total is `(package price + upsize surcharge) × quantity + shipping cost`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] when a required field is blank, the quantity is zero,
    /// the package is unknown, or an amount overflows.
    pub fn quote(&self, draft: OrderDraft) -> Result<NewOrder, OrderError> {
        draft.check_required()?;

        let package = self
            .package(&draft.package)
            .ok_or_else(|| OrderError::UnknownPackage(draft.package.clone()))?;

        let upsize_price = draft.size.upsize_surcharge();

        let total_price = NewOrder::total_for(
            package.price,
            upsize_price,
            draft.quantity,
            draft.delivery.shipping_cost(),
        )
        .ok_or(OrderError::Overflow)?;

        Ok(NewOrder {
            customer: draft.customer,
            package: package.name.clone(),
            package_price: package.price,
            size: draft.size,
            quantity: draft.quantity,
            upsize_price,
            delivery: draft.delivery,
            due_date: draft.due_date,
            total_price,
        })
    }

    /// Check a priced order against this catalog: the pricing formula must hold, and the
    /// package must be listed at the price the order carries.
    ///
    /// # Errors
    ///
    /// Returns the first [`OrderError`] found by [`NewOrder::validate`], then
    /// [`OrderError::UnknownPackage`] or [`OrderError::PriceMismatch`].
    pub fn verify(&self, order: &NewOrder) -> Result<(), OrderError> {
        order.validate()?;

        let package = self
            .package(&order.package)
            .ok_or_else(|| OrderError::UnknownPackage(order.package.clone()))?;

        if package.price != order.package_price {
            return Err(OrderError::PriceMismatch {
                package: package.name.clone(),
                expected: package.price,
                actual: order.package_price,
            });
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![Package {
            key: "pira".to_string(),
            name: "Juliana Shafira Package".to_string(),
            price: 150_000,
        }])
    }
}
