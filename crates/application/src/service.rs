//! Sale use cases.

use common::SaleId;
use domain::{
    AggregateRoot, CancelSale, CancelSaleItem, CreateSale, RemoveSaleItem, Sale, UpdateSale,
};
use sale_store::{PageRequest, SaleRepository, SaleRepositoryExt};

use crate::dispatcher::EventDispatcher;
use crate::error::{ApplicationError, Result};

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Returns true if there is a page after this one.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

/// Service for managing sales.
///
/// Each command loads the sale, applies the change on the aggregate,
/// persists it with a version check and then dispatches the events the
/// aggregate recorded. Events are dispatched only after a successful write;
/// a dispatch failure is returned to the caller but the write stands.
pub struct SaleService<R: SaleRepository> {
    repository: R,
    dispatcher: EventDispatcher,
}

impl<R: SaleRepository> SaleService<R> {
    /// Creates a new sale service.
    pub fn new(repository: R, dispatcher: EventDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns a reference to the event dispatcher.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Records a new sale with its initial lines.
    #[tracing::instrument(skip(self, cmd), fields(sale_number = %cmd.sale_number))]
    pub async fn create_sale(&self, cmd: CreateSale) -> Result<Sale> {
        if self.repository.sale_number_exists(&cmd.sale_number).await? {
            return Err(ApplicationError::DuplicateSaleNumber(cmd.sale_number));
        }

        let mut sale = Sale::new(cmd.sale_number, cmd.customer, cmd.branch)?;
        for line in cmd.lines {
            sale.add_item(line.product, line.quantity, line.unit_price)?;
        }

        let version = self.repository.add(&sale).await?;
        sale.set_version(version);
        self.publish(&mut sale).await?;

        metrics::counter!("sales_created_total").increment(1);
        tracing::info!(
            sale_id = %sale.id(),
            total_amount = %sale.total_amount(),
            items = sale.items().len(),
            "sale created"
        );
        Ok(sale)
    }

    /// Loads a sale by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_sale(&self, sale_id: SaleId) -> Result<Option<Sale>> {
        Ok(self.repository.find_by_id(sale_id).await?)
    }

    /// Lists sales newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_sales(&self, page: PageRequest) -> Result<Page<Sale>> {
        let items = self.repository.list(page).await?;
        let total_items = self.repository.count().await?;

        Ok(Page {
            items,
            page: page.page(),
            size: page.size(),
            total_items,
            total_pages: page.total_pages(total_items),
        })
    }

    /// Renames a sale and replaces its lines.
    #[tracing::instrument(skip(self, cmd), fields(sale_id = %cmd.sale_id))]
    pub async fn update_sale(&self, cmd: UpdateSale) -> Result<Sale> {
        let mut sale = self.load(cmd.sale_id).await?;

        if let Some(ref number) = cmd.sale_number
            && number != sale.sale_number()
            && let Some(other) = self.repository.find_by_sale_number(number).await?
            && other.id() != sale.id()
        {
            return Err(ApplicationError::DuplicateSaleNumber(number.clone()));
        }

        sale.update(cmd.sale_number, cmd.lines)?;
        self.save(&mut sale).await?;

        tracing::info!(total_amount = %sale.total_amount(), "sale updated");
        Ok(sale)
    }

    /// Cancels a sale. Cancelling an already cancelled sale changes nothing.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_sale(&self, cmd: CancelSale) -> Result<Sale> {
        let mut sale = self.load(cmd.sale_id).await?;

        sale.cancel();
        if !sale.has_pending_events() {
            return Ok(sale);
        }
        self.save(&mut sale).await?;

        metrics::counter!("sales_cancelled_total").increment(1);
        tracing::info!("sale cancelled");
        Ok(sale)
    }

    /// Cancels one line of a sale.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_sale_item(&self, cmd: CancelSaleItem) -> Result<Sale> {
        let mut sale = self.load(cmd.sale_id).await?;

        if !sale.cancel_item(cmd.product_id)? {
            return Err(ApplicationError::NotFound {
                entity: "SaleItem",
                id: cmd.product_id.to_string(),
            });
        }
        if !sale.has_pending_events() {
            return Ok(sale);
        }
        self.save(&mut sale).await?;

        metrics::counter!("sale_items_cancelled_total").increment(1);
        tracing::info!(product_id = %cmd.product_id, "sale item cancelled");
        Ok(sale)
    }

    /// Removes one line from a sale.
    #[tracing::instrument(skip(self))]
    pub async fn remove_sale_item(&self, cmd: RemoveSaleItem) -> Result<Sale> {
        let mut sale = self.load(cmd.sale_id).await?;

        if !sale.remove_item(cmd.product_id)? {
            return Err(ApplicationError::NotFound {
                entity: "SaleItem",
                id: cmd.product_id.to_string(),
            });
        }
        self.save(&mut sale).await?;

        tracing::info!(product_id = %cmd.product_id, "sale item removed");
        Ok(sale)
    }

    /// Deletes a sale.
    #[tracing::instrument(skip(self))]
    pub async fn delete_sale(&self, sale_id: SaleId) -> Result<()> {
        if !self.repository.delete(sale_id).await? {
            return Err(ApplicationError::sale_not_found(sale_id));
        }

        tracing::info!("sale deleted");
        Ok(())
    }

    async fn load(&self, sale_id: SaleId) -> Result<Sale> {
        Ok(self.repository.get(sale_id).await?)
    }

    async fn save(&self, sale: &mut Sale) -> Result<()> {
        let version = self.repository.update(sale).await?;
        sale.set_version(version);
        self.publish(sale).await
    }

    async fn publish(&self, sale: &mut Sale) -> Result<()> {
        let events = sale.take_events();
        self.dispatcher.dispatch(&events).await?;
        Ok(())
    }
}
