//! Value objects for the sale domain.
//!
//! Customers, branches and products are owned by other parts of the
//! business. A sale only keeps an immutable snapshot of the fields it
//! needs, taken at the moment the sale (or line) was recorded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SaleError;

/// Unique identifier for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Creates a new random customer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a customer ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CustomerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Unique identifier for a branch (store location).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(Uuid);

impl BranchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BranchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for BranchId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Unique identifier for a product.
///
/// Lines inside a sale are keyed by this id: a sale holds at most one line
/// per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ProductId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

fn require_non_blank(value: String, field: &'static str) -> Result<String, SaleError> {
    if value.trim().is_empty() {
        return Err(SaleError::InvalidArgument {
            field,
            reason: "must not be blank",
        });
    }
    Ok(value)
}

/// Snapshot of the customer who made the purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    id: CustomerId,
    name: String,
    email: String,
}

impl CustomerSnapshot {
    /// Creates a customer snapshot. The name must not be blank.
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, SaleError> {
        Ok(Self {
            id,
            name: require_non_blank(name.into(), "customer.name")?,
            email: email.into(),
        })
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Snapshot of the branch where the sale took place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSnapshot {
    id: BranchId,
    name: String,
    address: String,
}

impl BranchSnapshot {
    /// Creates a branch snapshot. The name must not be blank.
    pub fn new(
        id: BranchId,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, SaleError> {
        Ok(Self {
            id,
            name: require_non_blank(name.into(), "branch.name")?,
            address: address.into(),
        })
    }

    pub fn id(&self) -> BranchId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Snapshot of the product sold on a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    id: ProductId,
    name: String,
    description: String,
    category: String,
}

impl ProductSnapshot {
    /// Creates a product snapshot. The name must not be blank.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, SaleError> {
        Ok(Self {
            id,
            name: require_non_blank(name.into(), "product.name")?,
            description: description.into(),
            category: category.into(),
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}
