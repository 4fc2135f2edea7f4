//! Prelude

pub use crate::{
    catalog::{Catalog, Package, ParseSizeError, Size},
    document::{ClientInfo, InvoiceDocument, IssuerInfo, LineItem, ShippingDocument},
    ids::TypedId,
    money::{CURRENCY_SYMBOL, format_amount, format_currency},
    orders::{
        Customer, Delivery, NewOrder, Order, OrderDraft, OrderError, OrderId, OrderLookup,
        ShippingDetails,
    },
    stats::{Aggregate, Measure, Scope},
    storefront::{Address, Issuer, Storefront, StorefrontError},
};
