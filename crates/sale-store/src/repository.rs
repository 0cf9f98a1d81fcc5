use async_trait::async_trait;
use domain::Sale;

use crate::{Result, SaleId, StoreError, Version};

/// A page of a listing, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Page size used when none is given.
    pub const DEFAULT_SIZE: u32 = 10;

    /// Largest page size a caller may request.
    pub const MAX_SIZE: u32 = 100;

    /// Creates a page request.
    ///
    /// A page below 1 is treated as page 1 and the size is clamped to
    /// `1..=MAX_SIZE`.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, Self::MAX_SIZE),
        }
    }

    /// Returns the first page with the given size.
    pub fn first(size: u32) -> Self {
        Self::new(1, size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }

    /// Number of pages needed for `total` records.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

/// Storage boundary for sales.
///
/// Each write carries optimistic concurrency: `add` expects a sale that has
/// never been stored, and `update` expects the sale's version to match the
/// stored one. Both return the version now stored, which the caller should
/// write back with `AggregateRoot::set_version`.
///
/// Pending events are never persisted.
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Loads a sale by id.
    async fn find_by_id(&self, id: SaleId) -> Result<Option<Sale>>;

    /// Loads a sale by its business number.
    async fn find_by_sale_number(&self, sale_number: &str) -> Result<Option<Sale>>;

    /// Lists sales newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<Sale>>;

    /// Stores a new sale.
    ///
    /// Fails with `DuplicateSaleNumber` if the number is taken and with
    /// `ConcurrencyConflict` if the sale was already stored.
    async fn add(&self, sale: &Sale) -> Result<Version>;

    /// Replaces a stored sale.
    ///
    /// Fails with `NotFound` if the sale is not stored and with
    /// `ConcurrencyConflict` if it was changed since it was loaded.
    async fn update(&self, sale: &Sale) -> Result<Version>;

    /// Deletes a sale, returning whether it existed.
    async fn delete(&self, id: SaleId) -> Result<bool>;

    /// Returns the number of stored sales.
    async fn count(&self) -> Result<u64>;
}

/// Extension methods for sale repositories.
#[async_trait]
pub trait SaleRepositoryExt: SaleRepository {
    /// Loads a sale that must exist.
    async fn get(&self, id: SaleId) -> Result<Sale> {
        self.find_by_id(id).await?.ok_or(StoreError::NotFound(id))
    }

    /// Checks whether a sale number is already in use.
    async fn sale_number_exists(&self, sale_number: &str) -> Result<bool> {
        Ok(self.find_by_sale_number(sale_number).await?.is_some())
    }
}

// Blanket implementation for all SaleRepository implementations
impl<T: SaleRepository + ?Sized> SaleRepositoryExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps_input() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page.page(), 1);
        assert_eq!(page.size(), 1);

        let page = PageRequest::new(3, 500);
        assert_eq!(page.size(), PageRequest::MAX_SIZE);
    }

    #[test]
    fn page_request_offset() {
        assert_eq!(PageRequest::default().offset(), 0);
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest::first(10);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_pages(11), 2);
        assert_eq!(page.total_pages(25), 3);
    }
}
