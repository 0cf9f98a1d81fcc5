//! Volume discount policy for sale lines.
//!
//! | quantity | rate |
//! |----------|------|
//! | 1-3      | 0%   |
//! | 4-9      | 10%  |
//! | 10-20    | 20%  |
//!
//! More than [`MAX_QUANTITY_PER_PRODUCT`] units of one product cannot be
//! sold in a single sale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SaleError;

/// Maximum number of units of a single product in one sale.
pub const MAX_QUANTITY_PER_PRODUCT: u32 = 20;

/// Discount tier selected by line quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountTier {
    /// 1 to 3 units.
    None,
    /// 4 to 9 units.
    Standard,
    /// 10 to 20 units.
    Bulk,
}

impl DiscountTier {
    /// Returns the tier for a quantity.
    ///
    /// Callers validate the quantity first; anything above 9 is `Bulk`.
    pub fn for_quantity(quantity: u32) -> Self {
        match quantity {
            0..=3 => DiscountTier::None,
            4..=9 => DiscountTier::Standard,
            _ => DiscountTier::Bulk,
        }
    }

    /// Returns the discount rate as a fraction of the gross amount.
    pub fn rate(&self) -> Decimal {
        match self {
            DiscountTier::None => Decimal::ZERO,
            DiscountTier::Standard => Decimal::new(10, 2),
            DiscountTier::Bulk => Decimal::new(20, 2),
        }
    }
}

impl std::fmt::Display for DiscountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountTier::None => write!(f, "none"),
            DiscountTier::Standard => write!(f, "standard"),
            DiscountTier::Bulk => write!(f, "bulk"),
        }
    }
}

/// Checks that a quantity is within `1..=MAX_QUANTITY_PER_PRODUCT`.
pub fn validate_quantity(quantity: u32) -> Result<(), SaleError> {
    if quantity == 0 || quantity > MAX_QUANTITY_PER_PRODUCT {
        return Err(SaleError::QuantityOutOfRange { quantity });
    }
    Ok(())
}

/// Discount amount for `quantity` units at `unit_price`.
pub fn discount_for(quantity: u32, unit_price: Decimal) -> Result<Decimal, SaleError> {
    let gross = gross_amount(quantity, unit_price)?;
    gross
        .checked_mul(DiscountTier::for_quantity(quantity).rate())
        .ok_or(SaleError::AmountOverflow)
}

fn gross_amount(quantity: u32, unit_price: Decimal) -> Result<Decimal, SaleError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(SaleError::AmountOverflow)
}

/// Priced amounts of a sale line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePricing {
    pub tier: DiscountTier,
    pub gross: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl LinePricing {
    /// Prices a line, rejecting quantities outside the allowed range and
    /// amounts that do not fit in a `Decimal`.
    pub fn compute(quantity: u32, unit_price: Decimal) -> Result<Self, SaleError> {
        validate_quantity(quantity)?;

        let gross = gross_amount(quantity, unit_price)?;
        let discount = discount_for(quantity, unit_price)?;
        let total = gross
            .checked_sub(discount)
            .ok_or(SaleError::AmountOverflow)?;
        Ok(Self {
            tier: DiscountTier::for_quantity(quantity),
            gross,
            discount,
            total,
        })
    }
}
