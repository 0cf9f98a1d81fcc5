//! Domain layer for the sales system.
//!
//! This crate holds the pure business rules for retail sales:
//! - [`AggregateRoot`] and [`DomainEvent`] traits
//! - the [`Sale`] aggregate with its [`SaleItem`] lines
//! - the volume [`DiscountTier`] policy
//! - value snapshots and the commands the application layer issues
//!
//! Nothing here performs I/O. Persistence and event dispatch live in the
//! `sale-store` and `application` crates.

pub mod aggregate;
pub mod sale;

pub use aggregate::{AggregateRoot, DomainEvent};
pub use sale::{
    BranchId, BranchSnapshot, CancelSale, CancelSaleItem, CreateSale, CustomerId,
    CustomerSnapshot, DiscountTier, ItemCancelledData, LinePricing, MAX_QUANTITY_PER_PRODUCT,
    ProductId, ProductSnapshot, RemoveSaleItem, Sale, SaleCancelledData, SaleCreatedData,
    SaleError, SaleEvent, SaleItem, SaleLine, SaleModifiedData, UpdateSale, discount_for,
};
