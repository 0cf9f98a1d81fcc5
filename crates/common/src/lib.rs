//! Shared types for the sales workspace.

pub mod types;
pub mod version;

pub use types::{SaleId, SaleItemId};
pub use version::Version;
