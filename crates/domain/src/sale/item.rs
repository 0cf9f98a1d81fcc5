//! Sale line entity.

use common::{SaleId, SaleItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::discount::LinePricing;
use super::{ProductId, ProductSnapshot, SaleError};

/// A single product line within a sale.
///
/// Discount and total are always derived from quantity and unit price. The
/// unit price is fixed when the line is created. A cancelled line keeps its
/// quantity and discount for the record but contributes nothing to the
/// sale total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    id: SaleItemId,
    sale_id: SaleId,
    product: ProductSnapshot,
    quantity: u32,
    unit_price: Decimal,
    discount: Decimal,
    total_amount: Decimal,
    is_cancelled: bool,
}

impl SaleItem {
    /// Creates a priced line for `quantity` units of `product`.
    pub fn new(
        sale_id: SaleId,
        product: ProductSnapshot,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, SaleError> {
        if unit_price < Decimal::ZERO {
            return Err(SaleError::InvalidArgument {
                field: "unit_price",
                reason: "must not be negative",
            });
        }

        let mut item = Self {
            id: SaleItemId::new(),
            sale_id,
            product,
            quantity: 0,
            unit_price,
            discount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            is_cancelled: false,
        };
        item.update_quantity(quantity)?;
        Ok(item)
    }

    // Query methods

    pub fn id(&self) -> SaleItemId {
        self.id
    }

    pub fn sale_id(&self) -> SaleId {
        self.sale_id
    }

    pub fn product(&self) -> &ProductSnapshot {
        &self.product
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Net amount of the line; zero once cancelled.
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    // Command methods

    /// Sets the quantity and reprices the line.
    ///
    /// Leaves the line untouched if the quantity is out of range.
    pub fn update_quantity(&mut self, quantity: u32) -> Result<(), SaleError> {
        let pricing = LinePricing::compute(quantity, self.unit_price)?;

        self.quantity = quantity;
        self.discount = pricing.discount;
        self.total_amount = if self.is_cancelled {
            Decimal::ZERO
        } else {
            pricing.total
        };
        Ok(())
    }

    /// Marks the line cancelled and zeroes its total.
    pub fn cancel(&mut self) {
        self.is_cancelled = true;
        self.total_amount = Decimal::ZERO;
    }
}
