use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{AggregateRoot, Sale};
use tokio::sync::RwLock;

use crate::{
    PageRequest, Result, SaleId, StoreError, Version, repository::SaleRepository,
};

/// A stored sale: its JSON document plus the columns queries use.
#[derive(Debug, Clone)]
struct StoredSale {
    sale_number: String,
    sale_date: DateTime<Utc>,
    version: Version,
    document: serde_json::Value,
}

impl StoredSale {
    fn from_sale(sale: &Sale, version: Version) -> Result<Self> {
        Ok(Self {
            sale_number: sale.sale_number().to_string(),
            sale_date: sale.sale_date(),
            version,
            document: serde_json::to_value(sale)?,
        })
    }

    fn to_sale(&self) -> Result<Sale> {
        let mut sale: Sale = serde_json::from_value(self.document.clone())?;
        sale.set_version(self.version);
        Ok(sale)
    }
}

/// In-memory sale repository for testing.
///
/// Sales are kept as serialized documents, so a loaded sale never shares
/// state with the instance that was stored and never carries pending
/// events. Behaves like the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemorySaleRepository {
    sales: Arc<RwLock<HashMap<SaleId, StoredSale>>>,
}

impl InMemorySaleRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all sales.
    pub async fn clear(&self) {
        self.sales.write().await.clear();
    }

    fn number_taken(
        sales: &HashMap<SaleId, StoredSale>,
        sale_number: &str,
        except: SaleId,
    ) -> bool {
        sales
            .iter()
            .any(|(id, stored)| *id != except && stored.sale_number == sale_number)
    }
}

#[async_trait]
impl SaleRepository for InMemorySaleRepository {
    async fn find_by_id(&self, id: SaleId) -> Result<Option<Sale>> {
        let sales = self.sales.read().await;
        sales.get(&id).map(StoredSale::to_sale).transpose()
    }

    async fn find_by_sale_number(&self, sale_number: &str) -> Result<Option<Sale>> {
        let sales = self.sales.read().await;
        sales
            .values()
            .find(|stored| stored.sale_number == sale_number)
            .map(StoredSale::to_sale)
            .transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Sale>> {
        let sales = self.sales.read().await;
        let mut entries: Vec<_> = sales.iter().collect();
        entries.sort_by(|(a_id, a), (b_id, b)| {
            b.sale_date
                .cmp(&a.sale_date)
                .then_with(|| a_id.as_uuid().cmp(&b_id.as_uuid()))
        });

        entries
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.size()).unwrap_or(usize::MAX))
            .map(|(_, stored)| stored.to_sale())
            .collect()
    }

    async fn add(&self, sale: &Sale) -> Result<Version> {
        let sale_id = sale.id();
        let mut sales = self.sales.write().await;

        let actual = sales
            .get(&sale_id)
            .map(|stored| stored.version)
            .unwrap_or(Version::initial());
        if sale.version() != Version::initial() || actual != Version::initial() {
            return Err(StoreError::ConcurrencyConflict {
                sale_id,
                expected: sale.version(),
                actual,
            });
        }

        if Self::number_taken(&sales, sale.sale_number(), sale_id) {
            return Err(StoreError::DuplicateSaleNumber(
                sale.sale_number().to_string(),
            ));
        }

        let version = Version::first();
        sales.insert(sale_id, StoredSale::from_sale(sale, version)?);
        Ok(version)
    }

    async fn update(&self, sale: &Sale) -> Result<Version> {
        let sale_id = sale.id();
        let mut sales = self.sales.write().await;

        let actual = sales
            .get(&sale_id)
            .map(|stored| stored.version)
            .ok_or(StoreError::NotFound(sale_id))?;
        if actual != sale.version() {
            return Err(StoreError::ConcurrencyConflict {
                sale_id,
                expected: sale.version(),
                actual,
            });
        }

        if Self::number_taken(&sales, sale.sale_number(), sale_id) {
            return Err(StoreError::DuplicateSaleNumber(
                sale.sale_number().to_string(),
            ));
        }

        let version = actual.next();
        sales.insert(sale_id, StoredSale::from_sale(sale, version)?);
        Ok(version)
    }

    async fn delete(&self, id: SaleId) -> Result<bool> {
        Ok(self.sales.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.sales.read().await.len() as u64)
    }
}
