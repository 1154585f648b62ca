use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitflow_core::{DomainError, DomainResult, Entity, InventoryItemId};

/// Inventory item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Raw,
    Preprocessed,
    Finished,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Raw => "raw",
            ItemCategory::Preprocessed => "preprocessed",
            ItemCategory::Finished => "finished",
        }
    }
}

/// Record: InventoryItem.
///
/// Quantity moves only through explicit signed deltas and may never go
/// negative — unlike kit stock, there is no backlog convention here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    pub category: ItemCategory,
    pub subcategory: Option<String>,
    pub unit: Option<String>,
    pub quantity: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateInventoryItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInventoryItem {
    pub item_id: InventoryItemId,
    pub name: String,
    pub category: ItemCategory,
    pub subcategory: Option<String>,
    pub unit: Option<String>,
    pub quantity: i64,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateInventoryItem (partial patch; quantity moves only via
/// [`AdjustQuantity`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInventoryItem {
    pub name: Option<String>,
    pub subcategory: Option<String>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustQuantity {
    pub item_id: InventoryItemId,
    pub delta: i64,
    pub occurred_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn create(cmd: CreateInventoryItem) -> DomainResult<InventoryItem> {
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if cmd.quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }

        Ok(InventoryItem {
            id: cmd.item_id,
            name: cmd.name,
            category: cmd.category,
            subcategory: cmd.subcategory,
            unit: cmd.unit,
            quantity: cmd.quantity,
            notes: cmd.notes,
            created_at: cmd.occurred_at,
            updated_at: None,
        })
    }

    pub fn apply_update(&mut self, cmd: UpdateInventoryItem) -> DomainResult<()> {
        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }

        if let Some(name) = cmd.name {
            self.name = name;
        }
        if cmd.subcategory.is_some() {
            self.subcategory = cmd.subcategory;
        }
        if cmd.unit.is_some() {
            self.unit = cmd.unit;
        }
        if cmd.notes.is_some() {
            self.notes = cmd.notes;
        }
        self.updated_at = Some(cmd.occurred_at);

        Ok(())
    }

    /// Apply a signed quantity delta.
    pub fn apply_adjustment(&mut self, cmd: AdjustQuantity) -> DomainResult<()> {
        if cmd.delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }

        let new_quantity = self.quantity + cmd.delta;
        if new_quantity < 0 {
            return Err(DomainError::invariant("quantity cannot go negative"));
        }

        self.quantity = new_quantity;
        self.updated_at = Some(cmd.occurred_at);
        Ok(())
    }
}
