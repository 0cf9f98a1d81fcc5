//! Sales activity read model, built from sale events.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::SaleId;
use domain::{BranchId, CustomerId, ProductId, SaleEvent};
use tokio::sync::RwLock;

use crate::dispatcher::{EventHandler, HandlerError};

/// Lifecycle status of a sale as seen by the read model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaleStatus {
    Active,
    Cancelled,
}

/// Activity summary of one sale.
#[derive(Debug, Clone)]
pub struct SaleActivity {
    pub sale_id: SaleId,
    pub sale_number: String,
    pub customer_id: Option<CustomerId>,
    pub branch_id: Option<BranchId>,
    pub status: SaleStatus,
    pub cancelled_products: Vec<ProductId>,
    pub modification_count: u32,
    pub last_event_at: DateTime<Utc>,
}

impl SaleActivity {
    fn new(sale_id: SaleId, sale_number: &str) -> Self {
        Self {
            sale_id,
            sale_number: sale_number.to_string(),
            customer_id: None,
            branch_id: None,
            status: SaleStatus::Active,
            cancelled_products: Vec::new(),
            modification_count: 0,
            last_event_at: Utc::now(),
        }
    }
}

/// Read model of recent sale activity.
///
/// Sales first seen through a later event (the view was registered after
/// the sale was created) are tracked from that event on, without customer
/// or branch.
#[derive(Clone, Default)]
pub struct SalesActivityView {
    sales: Arc<RwLock<HashMap<SaleId, SaleActivity>>>,
    events_handled: Arc<AtomicU64>,
}

impl SalesActivityView {
    /// Creates a new empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the activity of a specific sale.
    pub async fn get(&self, sale_id: SaleId) -> Option<SaleActivity> {
        self.sales.read().await.get(&sale_id).cloned()
    }

    /// Gets every tracked sale.
    pub async fn all(&self) -> Vec<SaleActivity> {
        self.sales.read().await.values().cloned().collect()
    }

    /// Gets the tracked sales with a given status.
    pub async fn by_status(&self, status: SaleStatus) -> Vec<SaleActivity> {
        self.sales
            .read()
            .await
            .values()
            .filter(|activity| activity.status == status)
            .cloned()
            .collect()
    }

    /// Gets the tracked sales of a customer.
    pub async fn by_customer(&self, customer_id: CustomerId) -> Vec<SaleActivity> {
        self.sales
            .read()
            .await
            .values()
            .filter(|activity| activity.customer_id == Some(customer_id))
            .cloned()
            .collect()
    }

    /// Returns the number of events applied to the view.
    pub fn events_handled(&self) -> u64 {
        self.events_handled.load(Ordering::Relaxed)
    }

    /// Clears the view.
    pub async fn reset(&self) {
        self.sales.write().await.clear();
        self.events_handled.store(0, Ordering::Relaxed);
    }
}

#[async_trait]
impl EventHandler for SalesActivityView {
    fn name(&self) -> &'static str {
        "SalesActivityView"
    }

    async fn handle(&self, event: &SaleEvent) -> Result<(), HandlerError> {
        let mut sales = self.sales.write().await;
        let sale_id = event.sale_id();
        let activity = sales
            .entry(sale_id)
            .or_insert_with(|| SaleActivity::new(sale_id, event.sale_number()));

        activity.sale_number = event.sale_number().to_string();
        activity.last_event_at = Utc::now();

        match event {
            SaleEvent::SaleCreated(data) => {
                activity.customer_id = Some(data.customer_id);
                activity.branch_id = Some(data.branch_id);
            }
            SaleEvent::SaleModified(_) => {
                activity.modification_count += 1;
            }
            SaleEvent::SaleCancelled(_) => {
                activity.status = SaleStatus::Cancelled;
            }
            SaleEvent::ItemCancelled(data) => {
                if !activity.cancelled_products.contains(&data.product_id) {
                    activity.cancelled_products.push(data.product_id);
                }
            }
        }

        drop(sales);
        self.events_handled.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_sale_lifecycle() {
        let view = SalesActivityView::new();
        let sale_id = SaleId::new();
        let customer_id = CustomerId::new();
        let product_id = ProductId::new();

        let events = [
            SaleEvent::sale_created(sale_id, "S-1", customer_id, BranchId::new(), Utc::now()),
            SaleEvent::sale_modified(sale_id, "S-1"),
            SaleEvent::sale_modified(sale_id, "S-1A"),
            SaleEvent::item_cancelled(sale_id, "S-1A", product_id),
            SaleEvent::item_cancelled(sale_id, "S-1A", product_id),
            SaleEvent::sale_cancelled(sale_id, "S-1A"),
        ];
        for event in &events {
            view.handle(event).await.unwrap();
        }

        let activity = view.get(sale_id).await.unwrap();
        assert_eq!(activity.sale_number, "S-1A");
        assert_eq!(activity.customer_id, Some(customer_id));
        assert_eq!(activity.status, SaleStatus::Cancelled);
        assert_eq!(activity.modification_count, 2);
        assert_eq!(activity.cancelled_products, vec![product_id]);
        assert_eq!(view.events_handled(), 6);

        assert_eq!(view.by_status(SaleStatus::Cancelled).await.len(), 1);
        assert!(view.by_status(SaleStatus::Active).await.is_empty());
        assert_eq!(view.by_customer(customer_id).await.len(), 1);
    }

    #[tokio::test]
    async fn late_registration_tracks_from_first_seen_event() {
        let view = SalesActivityView::new();
        let sale_id = SaleId::new();

        view.handle(&SaleEvent::sale_modified(sale_id, "S-9"))
            .await
            .unwrap();

        let activity = view.get(sale_id).await.unwrap();
        assert_eq!(activity.status, SaleStatus::Active);
        assert_eq!(activity.customer_id, None);
        assert_eq!(activity.modification_count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn counts_every_concurrently_handled_event() {
        let view = SalesActivityView::new();
        let sale_id = SaleId::new();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let view = view.clone();
                tokio::spawn(async move {
                    view.handle(&SaleEvent::sale_modified(sale_id, "S-1"))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(view.events_handled(), 50);
        assert_eq!(view.get(sale_id).await.unwrap().modification_count, 50);
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let view = SalesActivityView::new();
        view.handle(&SaleEvent::sale_cancelled(SaleId::new(), "S-1"))
            .await
            .unwrap();

        view.reset().await;
        assert!(view.all().await.is_empty());
        assert_eq!(view.events_handled(), 0);
    }
}
