use async_trait::async_trait;
use domain::{DomainEvent, SaleEvent};

use crate::dispatcher::{EventHandler, HandlerError};

/// Writes one structured log record per sale event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

impl LoggingHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventHandler for LoggingHandler {
    fn name(&self) -> &'static str {
        "LoggingHandler"
    }

    async fn handle(&self, event: &SaleEvent) -> Result<(), HandlerError> {
        match event {
            SaleEvent::SaleCreated(data) => tracing::info!(
                event_type = event.event_type(),
                sale_id = %data.sale_id,
                sale_number = %data.sale_number,
                customer_id = %data.customer_id,
                branch_id = %data.branch_id,
                sale_date = %data.sale_date,
                "Sale created"
            ),
            SaleEvent::SaleModified(data) => tracing::info!(
                event_type = event.event_type(),
                sale_id = %data.sale_id,
                sale_number = %data.sale_number,
                "Sale modified"
            ),
            SaleEvent::SaleCancelled(data) => tracing::info!(
                event_type = event.event_type(),
                sale_id = %data.sale_id,
                sale_number = %data.sale_number,
                "Sale cancelled"
            ),
            SaleEvent::ItemCancelled(data) => tracing::info!(
                event_type = event.event_type(),
                sale_id = %data.sale_id,
                sale_number = %data.sale_number,
                product_id = %data.product_id,
                "Sale item cancelled"
            ),
        }
        Ok(())
    }
}
