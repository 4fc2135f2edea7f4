//! Orders

pub mod errors;
mod records;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
