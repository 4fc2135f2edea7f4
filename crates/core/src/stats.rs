//! Order Statistics
//!
//! Named aggregate queries over all orders: how many pieces, how much revenue and how
//! many customers, optionally narrowed to a package or a payment status.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::catalog::Catalog;

/// What to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Sum of quantities (`qty`).
    Quantity,

    /// Sum of total prices (`total`).
    Revenue,

    /// Number of orders (`count`).
    Orders,
}

impl Measure {
    /// Look up a measure by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "qty" => Some(Measure::Quantity),
            "total" => Some(Measure::Revenue),
            "count" => Some(Measure::Orders),
            _ => None,
        }
    }

    /// Name accepted by [`Measure::from_name`].
    pub const fn name(self) -> &'static str {
        match self {
            Measure::Quantity => "qty",
            Measure::Revenue => "total",
            Measure::Orders => "count",
        }
    }
}

/// Which orders to include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every order.
    All,

    /// Orders for one package, by display name.
    Package(String),

    /// Paid orders.
    Paid,

    /// Orders not yet paid.
    Unpaid,
}

impl Scope {
    /// Look up a scope by name. Package scopes accept a catalog key or display name.
    pub fn from_name(name: &str, catalog: &Catalog) -> Option<Self> {
        match name.trim() {
            "" | "all" => Some(Scope::All),
            "paid" => Some(Scope::Paid),
            "not_paid" => Some(Scope::Unpaid),
            other => catalog
                .package(other)
                .map(|package| Scope::Package(package.name.clone())),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Scope::All => f.write_str("all orders"),
            Scope::Package(name) => write!(f, "{name}"),
            Scope::Paid => f.write_str("paid orders"),
            Scope::Unpaid => f.write_str("unpaid orders"),
        }
    }
}

/// A single aggregate query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    /// What to compute.
    pub measure: Measure,

    /// Which orders to include.
    pub scope: Scope,
}

impl Aggregate {
    /// Create an aggregate query.
    pub fn new(measure: Measure, scope: Scope) -> Self {
        Self { measure, scope }
    }

    /// Resolve a named aggregate. Unknown kind or scope names yield `None`, which callers
    /// report as zero.
    pub fn lookup(kind: &str, scope: &str, catalog: &Catalog) -> Option<Self> {
        Some(Self {
            measure: Measure::from_name(kind)?,
            scope: Scope::from_name(scope, catalog)?,
        })
    }

    /// The summary shown on the stats dashboard.
    pub fn dashboard(catalog: &Catalog) -> Vec<Self> {
        let mut queries = vec![
            Self::new(Measure::Quantity, Scope::All),
            Self::new(Measure::Revenue, Scope::All),
        ];

        for package in catalog.packages() {
            queries.push(Self::new(
                Measure::Quantity,
                Scope::Package(package.name.clone()),
            ));
            queries.push(Self::new(
                Measure::Revenue,
                Scope::Package(package.name.clone()),
            ));
        }

        queries.push(Self::new(Measure::Orders, Scope::Paid));
        queries.push(Self::new(Measure::Orders, Scope::Unpaid));

        queries
    }
}
