use std::sync::Arc;

use kitflow_auth::Principal;
use kitflow_core::{DomainError, DomainResult, InventoryItemId};
use kitflow_inventory::{
    AdjustQuantity, CategoryEntryId, CreateInventoryItem, InventoryCategory, InventoryItem,
    ItemCategory, UpdateInventoryItem,
};

use crate::datastore::Datastore;
use crate::services::ensure_admin;

/// Inventory item + subcategory registry operations.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<Datastore>,
}

impl InventoryService {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        _caller: &Principal,
        cmd: CreateInventoryItem,
    ) -> DomainResult<InventoryItem> {
        let item = InventoryItem::create(cmd)?;

        let mut state = self.store.write();
        if state.inventory.contains_key(&item.id) {
            return Err(DomainError::conflict("inventory item already exists"));
        }
        state.inventory.insert(item.id, item.clone());

        tracing::info!(item_id = %item.id, category = item.category.as_str(), "inventory item created");
        Ok(item)
    }

    pub fn update(
        &self,
        _caller: &Principal,
        item_id: InventoryItemId,
        cmd: UpdateInventoryItem,
    ) -> DomainResult<InventoryItem> {
        let mut state = self.store.write();
        let item = state
            .inventory
            .get_mut(&item_id)
            .ok_or(DomainError::NotFound)?;
        item.apply_update(cmd)?;
        Ok(item.clone())
    }

    /// Apply a signed quantity delta. The resulting quantity may never be
    /// negative; unlike kits there is no backlog convention here.
    pub fn adjust_quantity(
        &self,
        _caller: &Principal,
        cmd: AdjustQuantity,
    ) -> DomainResult<InventoryItem> {
        let mut state = self.store.write();
        let item = state
            .inventory
            .get_mut(&cmd.item_id)
            .ok_or(DomainError::NotFound)?;
        item.apply_adjustment(cmd)?;
        Ok(item.clone())
    }

    pub fn remove(&self, caller: &Principal, item_id: InventoryItemId) -> DomainResult<()> {
        ensure_admin(caller)?;
        let mut state = self.store.write();
        state
            .inventory
            .remove(&item_id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }

    pub fn get(&self, item_id: InventoryItemId) -> DomainResult<InventoryItem> {
        self.store
            .read()
            .inventory
            .get(&item_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn list(&self) -> Vec<InventoryItem> {
        let mut items: Vec<InventoryItem> = self.store.read().inventory.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    pub fn list_by_category(&self, category: ItemCategory) -> Vec<InventoryItem> {
        let mut items: Vec<InventoryItem> = self
            .store
            .read()
            .inventory
            .values()
            .filter(|i| i.category == category)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    // ── subcategory registry ───────────────────────────────────────────

    pub fn add_category(
        &self,
        _caller: &Principal,
        entry: InventoryCategory,
    ) -> DomainResult<InventoryCategory> {
        let mut state = self.store.write();
        let duplicate = state
            .inventory_categories
            .values()
            .any(|c| c.category == entry.category && c.value == entry.value);
        if duplicate {
            return Err(DomainError::validation(format!(
                "subcategory '{}' already exists for {}",
                entry.value,
                entry.category.as_str()
            )));
        }

        state.inventory_categories.insert(entry.id, entry.clone());
        Ok(entry)
    }

    pub fn remove_category(&self, caller: &Principal, id: CategoryEntryId) -> DomainResult<()> {
        ensure_admin(caller)?;
        let mut state = self.store.write();
        state
            .inventory_categories
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }

    pub fn list_categories(&self, category: Option<ItemCategory>) -> Vec<InventoryCategory> {
        let mut entries: Vec<InventoryCategory> = self
            .store
            .read()
            .inventory_categories
            .values()
            .filter(|c| category.is_none_or(|wanted| c.category == wanted))
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.value.cmp(&b.value));
        entries
    }
}
