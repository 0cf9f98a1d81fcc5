//! Persistence for the sale aggregate.
//!
//! [`SaleRepository`] is the storage boundary used by the application
//! layer. Two implementations are provided:
//! - [`InMemorySaleRepository`] for tests and local runs
//! - [`PostgresSaleRepository`] backed by a `sales` table
//!
//! Both store a sale as a JSON document next to a few indexed columns and
//! guard updates with the sale's persistence [`Version`].

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use common::{SaleId, Version};
pub use error::{Result, StoreError};
pub use memory::InMemorySaleRepository;
pub use postgres::PostgresSaleRepository;
pub use repository::{PageRequest, SaleRepository, SaleRepositoryExt};
