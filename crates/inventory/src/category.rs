use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kitflow_core::{DomainError, DomainResult, Entity};

use crate::item::ItemCategory;

/// Identifier of a custom subcategory registry entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryEntryId(Uuid);

impl CategoryEntryId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CategoryEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CategoryEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for CategoryEntryId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("CategoryEntryId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Record: a custom subcategory definition for one of the fixed item
/// categories. Duplicate `(category, value)` pairs are rejected at the
/// store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCategory {
    pub id: CategoryEntryId,
    pub category: ItemCategory,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for InventoryCategory {
    type Id = CategoryEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl InventoryCategory {
    pub fn create(
        id: CategoryEntryId,
        category: ItemCategory,
        value: String,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<InventoryCategory> {
        if value.trim().is_empty() {
            return Err(DomainError::validation("subcategory value cannot be empty"));
        }

        Ok(InventoryCategory {
            id,
            category,
            value,
            created_at: occurred_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_blank_value() {
        let err = InventoryCategory::create(
            CategoryEntryId::new(),
            ItemCategory::Raw,
            "  ".to_string(),
            Utc::now(),
        )
        .unwrap_err();

        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
