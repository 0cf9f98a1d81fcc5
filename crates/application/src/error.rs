//! Application error types.

use domain::SaleError;
use sale_store::StoreError;
use thiserror::Error;

use crate::dispatcher::HandlerError;

/// A registered event handler failed.
#[derive(Debug, Error)]
#[error("Handler {handler} failed on {event_type} for sale {sale_id}: {source}")]
pub struct DispatchError {
    pub handler: &'static str,
    pub event_type: &'static str,
    pub sale_id: common::SaleId,
    #[source]
    pub source: HandlerError,
}

/// Errors returned by the sale use cases.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The requested sale or line does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Another sale already uses this number.
    #[error("Sale with number {0} already exists")]
    DuplicateSaleNumber(String),

    /// The aggregate rejected the operation.
    #[error("Sale error: {0}")]
    Sale(#[from] SaleError),

    /// The repository failed.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Persisted, but an event handler failed.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl ApplicationError {
    pub fn sale_not_found(id: impl ToString) -> Self {
        ApplicationError::NotFound {
            entity: "Sale",
            id: id.to_string(),
        }
    }

    /// Returns true if the caller should treat this as a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApplicationError::NotFound { .. })
    }

    /// Returns true if the caller sent bad input or broke a business rule.
    pub fn is_client_error(&self) -> bool {
        match self {
            ApplicationError::NotFound { .. } | ApplicationError::DuplicateSaleNumber(_) => true,
            ApplicationError::Sale(_) => true,
            ApplicationError::Store(StoreError::ConcurrencyConflict { .. }) => true,
            _ => false,
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ApplicationError::sale_not_found(id),
            StoreError::DuplicateSaleNumber(number) => ApplicationError::DuplicateSaleNumber(number),
            other => ApplicationError::Store(other),
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, ApplicationError>;
