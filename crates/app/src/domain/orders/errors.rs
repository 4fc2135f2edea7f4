//! Orders service errors.

use std::num::TryFromIntError;

use doruken::prelude::{OrderError, OrderId};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("could not connect to the database")]
    Connection(#[source] Error),

    #[error("order not found")]
    NotFound,

    #[error("{} orders are recorded for `{name}`; use an id instead", ids.len())]
    AmbiguousName { name: String, ids: Vec<OrderId> },

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("amount out of range")]
    InvalidAmount(#[from] TryFromIntError),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            // `invoice_table` has no unique or foreign keys, so nothing else is classified.
            Some(_) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = OrdersServiceError::from(Error::RowNotFound);

        assert!(
            matches!(error, OrdersServiceError::NotFound),
            "expected NotFound, got {error:?}"
        );
    }

    #[test]
    fn other_errors_are_kept_as_storage_errors() {
        let error = OrdersServiceError::from(Error::PoolClosed);

        assert!(
            matches!(error, OrdersServiceError::Sql(Error::PoolClosed)),
            "expected Sql, got {error:?}"
        );
    }

    #[test]
    fn ambiguous_name_reports_the_match_count() {
        let error = OrdersServiceError::AmbiguousName {
            name: "Sari".to_string(),
            ids: vec![OrderId::from_i64(1), OrderId::from_i64(4)],
        };

        assert_eq!(
            error.to_string(),
            "2 orders are recorded for `Sari`; use an id instead"
        );
    }
}
