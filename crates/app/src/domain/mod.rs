//! Doruken Domain Concerns

pub mod invoices;
pub mod orders;
