use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a sale (the aggregate root).
///
/// Wraps a UUID so sale ids cannot be mixed up with item, product,
/// customer or branch ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(Uuid);

impl SaleId {
    /// Creates a new random sale ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a sale ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SaleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SaleId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<SaleId> for Uuid {
    fn from(id: SaleId) -> Self {
        id.0
    }
}

/// Unique identifier for a single line inside a sale.
///
/// Lines are addressed by product id in every aggregate operation; this id
/// only exists so a line has a stable identity in storage and read models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleItemId(Uuid);

impl SaleItemId {
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

impl Default for SaleItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SaleItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
