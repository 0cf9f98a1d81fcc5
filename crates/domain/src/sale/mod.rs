//! Sale aggregate and related types.

mod aggregate;
mod commands;
mod discount;
mod events;
mod item;
mod value_objects;

pub use aggregate::Sale;
pub use commands::{CancelSale, CancelSaleItem, CreateSale, RemoveSaleItem, SaleLine, UpdateSale};
pub use discount::{
    DiscountTier, LinePricing, MAX_QUANTITY_PER_PRODUCT, discount_for, validate_quantity,
};
pub use events::{
    ItemCancelledData, SaleCancelledData, SaleCreatedData, SaleEvent, SaleModifiedData,
};
pub use item::SaleItem;
pub use value_objects::{
    BranchId, BranchSnapshot, CustomerId, CustomerSnapshot, ProductId, ProductSnapshot,
};

use thiserror::Error;

/// Errors that can occur during sale operations.
///
/// Variants split into two kinds: bad input from the caller
/// ([`is_invalid_argument`](Self::is_invalid_argument)) and attempts to
/// break a business rule ([`is_rule_violation`](Self::is_rule_violation)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    /// A required value is missing or malformed.
    #[error("Invalid argument `{field}`: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },

    /// Quantity outside the allowed range for a single product.
    #[error("Invalid quantity: {quantity} (must be between 1 and {max})", max = MAX_QUANTITY_PER_PRODUCT)]
    QuantityOutOfRange { quantity: u32 },

    /// The sale is cancelled and can no longer change.
    #[error("Cannot {action} on a cancelled sale")]
    SaleCancelled { action: &'static str },

    /// A line or sale amount does not fit in a `Decimal`.
    #[error("Amount overflow: line or sale total exceeds the supported range")]
    AmountOverflow,
}

impl SaleError {
    /// Returns true if the error is a business rule violation.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            SaleError::QuantityOutOfRange { .. }
                | SaleError::SaleCancelled { .. }
                | SaleError::AmountOverflow
        )
    }

    /// Returns true if the error was caused by a missing or malformed input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SaleError::InvalidArgument { .. })
    }
}
