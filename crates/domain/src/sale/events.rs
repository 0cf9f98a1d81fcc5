//! Sale domain events.

use chrono::{DateTime, Utc};
use common::SaleId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{BranchId, CustomerId, ProductId};

/// Events recorded by the sale aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SaleEvent {
    /// Sale was created.
    SaleCreated(SaleCreatedData),

    /// Sale number or lines changed.
    SaleModified(SaleModifiedData),

    /// Sale was cancelled as a whole.
    SaleCancelled(SaleCancelledData),

    /// A single line was cancelled.
    ItemCancelled(ItemCancelledData),
}

impl DomainEvent for SaleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated(_) => "SaleCreated",
            SaleEvent::SaleModified(_) => "SaleModified",
            SaleEvent::SaleCancelled(_) => "SaleCancelled",
            SaleEvent::ItemCancelled(_) => "ItemCancelled",
        }
    }
}

/// Data for SaleCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleCreatedData {
    pub sale_id: SaleId,
    pub sale_number: String,
    pub customer_id: CustomerId,
    pub branch_id: BranchId,
    pub sale_date: DateTime<Utc>,
}

/// Data for SaleModified event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleModifiedData {
    pub sale_id: SaleId,

    /// Sale number after the modification.
    pub sale_number: String,
}

/// Data for SaleCancelled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleCancelledData {
    pub sale_id: SaleId,
    pub sale_number: String,
}

/// Data for ItemCancelled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCancelledData {
    pub sale_id: SaleId,
    pub sale_number: String,

    /// Product of the cancelled line.
    pub product_id: ProductId,
}

// Convenience constructors for events
impl SaleEvent {
    pub fn sale_created(
        sale_id: SaleId,
        sale_number: impl Into<String>,
        customer_id: CustomerId,
        branch_id: BranchId,
        sale_date: DateTime<Utc>,
    ) -> Self {
        SaleEvent::SaleCreated(SaleCreatedData {
            sale_id,
            sale_number: sale_number.into(),
            customer_id,
            branch_id,
            sale_date,
        })
    }

    pub fn sale_modified(sale_id: SaleId, sale_number: impl Into<String>) -> Self {
        SaleEvent::SaleModified(SaleModifiedData {
            sale_id,
            sale_number: sale_number.into(),
        })
    }

    pub fn sale_cancelled(sale_id: SaleId, sale_number: impl Into<String>) -> Self {
        SaleEvent::SaleCancelled(SaleCancelledData {
            sale_id,
            sale_number: sale_number.into(),
        })
    }

    pub fn item_cancelled(
        sale_id: SaleId,
        sale_number: impl Into<String>,
        product_id: ProductId,
    ) -> Self {
        SaleEvent::ItemCancelled(ItemCancelledData {
            sale_id,
            sale_number: sale_number.into(),
            product_id,
        })
    }

    /// Returns the sale this event belongs to.
    pub fn sale_id(&self) -> SaleId {
        match self {
            SaleEvent::SaleCreated(data) => data.sale_id,
            SaleEvent::SaleModified(data) => data.sale_id,
            SaleEvent::SaleCancelled(data) => data.sale_id,
            SaleEvent::ItemCancelled(data) => data.sale_id,
        }
    }

    /// Returns the sale number carried by the event.
    pub fn sale_number(&self) -> &str {
        match self {
            SaleEvent::SaleCreated(data) => &data.sale_number,
            SaleEvent::SaleModified(data) => &data.sale_number,
            SaleEvent::SaleCancelled(data) => &data.sale_number,
            SaleEvent::ItemCancelled(data) => &data.sale_number,
        }
    }
}
