//! In-memory stand-in for the hosted record datastore.
//!
//! Seven collections keyed by opaque identifiers, all behind one lock.
//! Services take the lock once per exposed operation; that single
//! acquisition is the transaction boundary the rest of the system relies
//! on. Read models are never cached — reporting folds over a read guard.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use kitflow_assignments::Assignment;
use kitflow_core::{
    AssignmentId, ClientId, InventoryItemId, KitId, ProgramId, ServiceProviderId, VendorId,
};
use kitflow_inventory::{CategoryEntryId, InventoryCategory, InventoryItem};
use kitflow_kits::{Kit, Program};
use kitflow_parties::{Client, ServiceProvider, Vendor};

/// All persisted collections. Access only through a [`Datastore`] guard.
#[derive(Debug, Default)]
pub struct Collections {
    pub kits: HashMap<KitId, Kit>,
    pub programs: HashMap<ProgramId, Program>,
    pub clients: HashMap<ClientId, Client>,
    pub vendors: HashMap<VendorId, Vendor>,
    pub providers: HashMap<ServiceProviderId, ServiceProvider>,
    pub inventory: HashMap<InventoryItemId, InventoryItem>,
    pub inventory_categories: HashMap<CategoryEntryId, InventoryCategory>,
    pub assignments: HashMap<AssignmentId, Assignment>,
    /// Idempotency keys seen by assignment creation, mapped to the
    /// assignment they produced.
    pub assignment_keys: HashMap<String, AssignmentId>,
}

/// Single-lock record store.
#[derive(Debug, Default)]
pub struct Datastore {
    inner: RwLock<Collections>,
}

impl Datastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared read access (reporting, gets, lists).
    pub fn read(&self) -> RwLockReadGuard<'_, Collections> {
        // A poisoned lock only means a panic happened mid-operation in a
        // test; the data itself is still the last consistent snapshot.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Exclusive access for one atomic operation.
    pub fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
