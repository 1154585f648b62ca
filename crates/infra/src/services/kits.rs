use std::sync::Arc;

use kitflow_auth::Principal;
use kitflow_core::{DomainError, DomainResult, KitId};
use kitflow_kits::{CopyKit, CreateKit, Kit, UpdateKit};

use crate::datastore::Datastore;
use crate::services::ensure_admin;

/// Kit record store operations.
#[derive(Clone)]
pub struct KitService {
    store: Arc<Datastore>,
}

impl KitService {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    pub fn create(&self, _caller: &Principal, cmd: CreateKit) -> DomainResult<Kit> {
        let kit = Kit::create(cmd)?;

        let mut state = self.store.write();
        if state.kits.contains_key(&kit.id) {
            return Err(DomainError::conflict("kit already exists"));
        }
        state.kits.insert(kit.id, kit.clone());

        tracing::info!(kit_id = %kit.id, program = %kit.program, "kit created");
        Ok(kit)
    }

    pub fn update(&self, _caller: &Principal, kit_id: KitId, cmd: UpdateKit) -> DomainResult<Kit> {
        let mut state = self.store.write();
        let kit = state.kits.get_mut(&kit_id).ok_or(DomainError::NotFound)?;
        kit.apply_update(cmd)?;
        Ok(kit.clone())
    }

    /// Admin only. No cascade: assignments referencing the kit stay put and
    /// are tolerated as orphans by the lifecycle operations.
    pub fn remove(&self, caller: &Principal, kit_id: KitId) -> DomainResult<()> {
        ensure_admin(caller)?;

        let mut state = self.store.write();
        state
            .kits
            .remove(&kit_id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)?;

        tracing::info!(kit_id = %kit_id, "kit removed");
        Ok(())
    }

    pub fn get(&self, kit_id: KitId) -> DomainResult<Kit> {
        self.store
            .read()
            .kits
            .get(&kit_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn list(&self) -> Vec<Kit> {
        let mut kits: Vec<Kit> = self.store.read().kits.values().cloned().collect();
        kits.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        kits
    }

    /// Kits at or under their low-stock threshold.
    pub fn low_stock(&self) -> Vec<Kit> {
        let mut kits: Vec<Kit> = self
            .store
            .read()
            .kits
            .values()
            .filter(|k| k.is_low_stock())
            .cloned()
            .collect();
        kits.sort_by(|a, b| a.stock_count.cmp(&b.stock_count));
        kits
    }

    /// Duplicate a kit's packing data into a new kit under a different
    /// program. Copies are born with stock 0.
    pub fn copy(&self, _caller: &Principal, source: KitId, cmd: CopyKit) -> DomainResult<Kit> {
        let mut state = self.store.write();
        let copy = state
            .kits
            .get(&source)
            .ok_or(DomainError::NotFound)?
            .copy(cmd)?;

        if state.kits.contains_key(&copy.id) {
            return Err(DomainError::conflict("kit already exists"));
        }
        state.kits.insert(copy.id, copy.clone());

        tracing::info!(source = %source, copy = %copy.id, "kit copied");
        Ok(copy)
    }
}
