//! Doruken
//!
//! Order pricing, invoice documents and currency formatting for the Doruken apparel
//! invoice tool. Everything in this crate is pure: persistence and rendering live in
//! `doruken-app`.

pub mod catalog;
pub mod document;
pub mod ids;
pub mod money;
pub mod orders;
pub mod prelude;
pub mod stats;
pub mod storefront;
