//! Sale aggregate implementation.

use chrono::{DateTime, Utc};
use common::{SaleId, Version};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateRoot;

use super::discount::validate_quantity;
use super::{
    BranchSnapshot, CustomerSnapshot, ProductId, ProductSnapshot, SaleError, SaleEvent, SaleItem,
    SaleLine,
};

/// Sale aggregate root.
///
/// A sale owns its lines exclusively and keeps these rules true after every
/// public operation:
/// - every line holds between 1 and 20 units
/// - at most one line exists per product
/// - the sale total equals the sum of the non-cancelled line totals
/// - once cancelled, the sale accepts no further structural changes
///
/// Every operation validates before it mutates. A rejected operation leaves
/// the sale, including its pending events, exactly as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    id: SaleId,

    /// Persistence version for optimistic concurrency.
    #[serde(default)]
    version: Version,

    sale_number: String,
    sale_date: DateTime<Utc>,
    customer: CustomerSnapshot,
    branch: BranchSnapshot,

    /// Lines in insertion order.
    items: Vec<SaleItem>,

    total_amount: Decimal,
    is_cancelled: bool,

    /// Events recorded since the last drain. Never persisted.
    #[serde(skip)]
    pending_events: Vec<SaleEvent>,
}

impl AggregateRoot for Sale {
    type Id = SaleId;
    type Event = SaleEvent;

    fn aggregate_type() -> &'static str {
        "Sale"
    }

    fn id(&self) -> SaleId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn pending_events(&self) -> &[SaleEvent] {
        &self.pending_events
    }

    fn take_events(&mut self) -> Vec<SaleEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

// Query methods
impl Sale {
    /// Returns the business sale number.
    pub fn sale_number(&self) -> &str {
        &self.sale_number
    }

    /// Returns when the sale was recorded.
    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    pub fn customer(&self) -> &CustomerSnapshot {
        &self.customer
    }

    pub fn branch(&self) -> &BranchSnapshot {
        &self.branch
    }

    /// Returns all lines, cancelled ones included, in insertion order.
    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    /// Returns the line for a product.
    pub fn item(&self, product_id: ProductId) -> Option<&SaleItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    /// Returns the number of lines that are not cancelled.
    pub fn active_item_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_cancelled()).count()
    }

    /// Returns the units across all non-cancelled lines.
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .filter(|item| !item.is_cancelled())
            .map(SaleItem::quantity)
            .sum()
    }

    /// Returns the sale total.
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }
}

// Command methods (record events)
impl Sale {
    /// Creates a new, empty sale dated now.
    pub fn new(
        sale_number: impl Into<String>,
        customer: CustomerSnapshot,
        branch: BranchSnapshot,
    ) -> Result<Self, SaleError> {
        let sale_number = sale_number.into();
        validate_sale_number(&sale_number)?;

        let id = SaleId::new();
        let sale_date = Utc::now();
        let created = SaleEvent::sale_created(
            id,
            sale_number.clone(),
            customer.id(),
            branch.id(),
            sale_date,
        );

        Ok(Self {
            id,
            version: Version::initial(),
            sale_number,
            sale_date,
            customer,
            branch,
            items: Vec::new(),
            total_amount: Decimal::ZERO,
            is_cancelled: false,
            pending_events: vec![created],
        })
    }

    /// Adds `quantity` units of a product to the sale.
    ///
    /// If the product already has a line, the quantities are merged and the
    /// line keeps its original unit price. Both the requested and the
    /// merged quantity must fall within 1 to 20. Merging into a cancelled
    /// line updates its quantity but it still counts nothing toward the
    /// total.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<(), SaleError> {
        self.ensure_not_cancelled("add items")?;
        validate_quantity(quantity)?;
        if unit_price < Decimal::ZERO {
            return Err(SaleError::InvalidArgument {
                field: "unit_price",
                reason: "must not be negative",
            });
        }

        let (index, line) = match self.position_of(product.id()) {
            Some(index) => {
                let mut line = self.items[index].clone();
                line.update_quantity(line.quantity().saturating_add(quantity))?;
                (Some(index), line)
            }
            None => (None, SaleItem::new(self.id, product, quantity, unit_price)?),
        };
        let total = self.total_with(index, Some(&line))?;

        match index {
            Some(index) => self.items[index] = line,
            None => self.items.push(line),
        }
        self.total_amount = total;
        self.record_modified();
        Ok(())
    }

    /// Removes a product's line entirely.
    ///
    /// Returns `Ok(false)` without recording anything when the product has
    /// no line.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<bool, SaleError> {
        self.ensure_not_cancelled("remove items")?;

        let Some(index) = self.position_of(product_id) else {
            return Ok(false);
        };
        let total = self.total_with(Some(index), None)?;

        self.items.remove(index);
        self.total_amount = total;
        self.record_modified();
        Ok(true)
    }

    /// Cancels a product's line, keeping it in the sale for the record.
    ///
    /// Returns `Ok(false)` when the product has no line. Cancelling a line
    /// that is already cancelled returns `Ok(true)` and records nothing.
    pub fn cancel_item(&mut self, product_id: ProductId) -> Result<bool, SaleError> {
        self.ensure_not_cancelled("cancel items")?;

        let Some(index) = self.position_of(product_id) else {
            return Ok(false);
        };
        if self.items[index].is_cancelled() {
            return Ok(true);
        }
        let mut line = self.items[index].clone();
        line.cancel();
        let total = self.total_with(Some(index), Some(&line))?;

        self.items[index] = line;
        self.total_amount = total;
        self.pending_events.push(SaleEvent::item_cancelled(
            self.id,
            self.sale_number.clone(),
            product_id,
        ));
        Ok(true)
    }

    /// Cancels the whole sale and every line in it.
    ///
    /// Cancelling an already cancelled sale does nothing.
    pub fn cancel(&mut self) {
        if self.is_cancelled {
            return;
        }

        self.is_cancelled = true;
        for item in &mut self.items {
            item.cancel();
        }
        self.total_amount = Decimal::ZERO;
        self.pending_events.push(SaleEvent::sale_cancelled(
            self.id,
            self.sale_number.clone(),
        ));
    }

    /// Changes the business sale number.
    pub fn update_sale_number(&mut self, sale_number: impl Into<String>) -> Result<(), SaleError> {
        self.ensure_not_cancelled("change the sale number")?;
        let sale_number = sale_number.into();
        validate_sale_number(&sale_number)?;

        self.sale_number = sale_number;
        self.record_modified();
        Ok(())
    }

    /// Replaces every line with `lines`.
    ///
    /// Each line goes through [`add_item`](Self::add_item), so repeated
    /// products merge and every quantity rule applies. The replacement is
    /// all or nothing and records a single `SaleModified` event.
    pub fn replace_items(
        &mut self,
        lines: impl IntoIterator<Item = SaleLine>,
    ) -> Result<(), SaleError> {
        self.ensure_not_cancelled("replace items")?;

        let mut staged = self.clone();
        let recorded = staged.pending_events.len();
        staged.items.clear();
        for line in lines {
            staged.add_item(line.product, line.quantity, line.unit_price)?;
        }
        staged.pending_events.truncate(recorded);
        staged.total_amount = staged.total_with(None, None)?;
        staged.record_modified();

        *self = staged;
        Ok(())
    }

    /// Optionally renames the sale, then replaces its lines.
    ///
    /// All or nothing: a rejected line also discards the rename.
    pub fn update(
        &mut self,
        sale_number: Option<String>,
        lines: Vec<SaleLine>,
    ) -> Result<(), SaleError> {
        self.ensure_not_cancelled("update")?;

        let mut staged = self.clone();
        if let Some(sale_number) = sale_number
            && sale_number != staged.sale_number
        {
            staged.update_sale_number(sale_number)?;
        }
        staged.replace_items(lines)?;

        *self = staged;
        Ok(())
    }
}

// Internal helpers
impl Sale {
    fn ensure_not_cancelled(&self, action: &'static str) -> Result<(), SaleError> {
        if self.is_cancelled {
            return Err(SaleError::SaleCancelled { action });
        }
        Ok(())
    }

    fn position_of(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id() == product_id)
    }

    /// Sums the non-cancelled line totals, with the line at `replaced`
    /// swapped for `line` (or dropped when `line` is `None`). A `line`
    /// without `replaced` is counted as an extra line.
    fn total_with(
        &self,
        replaced: Option<usize>,
        line: Option<&SaleItem>,
    ) -> Result<Decimal, SaleError> {
        self.items
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replaced)
            .map(|(_, item)| item)
            .chain(line)
            .filter(|item| !item.is_cancelled())
            .try_fold(Decimal::ZERO, |total, item| {
                total
                    .checked_add(item.total_amount())
                    .ok_or(SaleError::AmountOverflow)
            })
    }

    fn record_modified(&mut self) {
        self.pending_events.push(SaleEvent::sale_modified(
            self.id,
            self.sale_number.clone(),
        ));
    }
}

fn validate_sale_number(sale_number: &str) -> Result<(), SaleError> {
    if sale_number.trim().is_empty() {
        return Err(SaleError::InvalidArgument {
            field: "sale_number",
            reason: "must not be blank",
        });
    }
    Ok(())
}
