//! Sale commands issued by the application layer.

use common::SaleId;
use rust_decimal::Decimal;

use super::{BranchSnapshot, CustomerSnapshot, ProductId, ProductSnapshot};

/// A requested line: `quantity` units of `product` at `unit_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLine {
    pub product: ProductSnapshot,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl SaleLine {
    pub fn new(product: ProductSnapshot, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product,
            quantity,
            unit_price,
        }
    }
}

/// Command to record a new sale.
#[derive(Debug, Clone)]
pub struct CreateSale {
    /// Business number of the sale; must be unique.
    pub sale_number: String,

    /// Customer who made the purchase.
    pub customer: CustomerSnapshot,

    /// Branch where the sale took place.
    pub branch: BranchSnapshot,

    /// Initial lines. Repeated products are merged.
    pub lines: Vec<SaleLine>,
}

impl CreateSale {
    /// Creates a new CreateSale command without lines.
    pub fn new(
        sale_number: impl Into<String>,
        customer: CustomerSnapshot,
        branch: BranchSnapshot,
    ) -> Self {
        Self {
            sale_number: sale_number.into(),
            customer,
            branch,
            lines: Vec::new(),
        }
    }

    /// Adds a line to the command.
    pub fn with_line(mut self, product: ProductSnapshot, quantity: u32, unit_price: Decimal) -> Self {
        self.lines.push(SaleLine::new(product, quantity, unit_price));
        self
    }
}

/// Command to change a sale's number and replace its lines.
#[derive(Debug, Clone)]
pub struct UpdateSale {
    pub sale_id: SaleId,

    /// New sale number, if it changes.
    pub sale_number: Option<String>,

    /// Full replacement line list.
    pub lines: Vec<SaleLine>,
}

impl UpdateSale {
    pub fn new(sale_id: SaleId, lines: Vec<SaleLine>) -> Self {
        Self {
            sale_id,
            sale_number: None,
            lines,
        }
    }

    /// Also renames the sale.
    pub fn with_sale_number(mut self, sale_number: impl Into<String>) -> Self {
        self.sale_number = Some(sale_number.into());
        self
    }
}

/// Command to cancel a whole sale.
#[derive(Debug, Clone, Copy)]
pub struct CancelSale {
    pub sale_id: SaleId,
}

impl CancelSale {
    pub fn new(sale_id: SaleId) -> Self {
        Self { sale_id }
    }
}

/// Command to cancel one line of a sale.
#[derive(Debug, Clone, Copy)]
pub struct CancelSaleItem {
    pub sale_id: SaleId,
    pub product_id: ProductId,
}

impl CancelSaleItem {
    pub fn new(sale_id: SaleId, product_id: ProductId) -> Self {
        Self {
            sale_id,
            product_id,
        }
    }
}

/// Command to remove one line from a sale.
#[derive(Debug, Clone, Copy)]
pub struct RemoveSaleItem {
    pub sale_id: SaleId,
    pub product_id: ProductId,
}

impl RemoveSaleItem {
    pub fn new(sale_id: SaleId, product_id: ProductId) -> Self {
        Self {
            sale_id,
            product_id,
        }
    }
}
