use std::sync::Arc;

use kitflow_auth::Principal;
use kitflow_core::{ClientId, DomainError, DomainResult, ServiceProviderId, VendorId};
use kitflow_parties::{
    Client, CreateClient, CreateServiceProvider, CreateVendor, ServiceProvider, UpdateClient,
    UpdateServiceProvider, UpdateVendor, Vendor,
};

use crate::datastore::Datastore;
use crate::services::ensure_admin;

/// Directory operations: clients, vendors, service providers.
///
/// Three collections, one service — these records share a shape and none
/// of them carries lifecycle coupling.
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<Datastore>,
}

impl DirectoryService {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    // ── clients ────────────────────────────────────────────────────────

    pub fn create_client(&self, _caller: &Principal, cmd: CreateClient) -> DomainResult<Client> {
        let client = Client::create(cmd)?;

        let mut state = self.store.write();
        if state.clients.contains_key(&client.id) {
            return Err(DomainError::conflict("client already exists"));
        }
        state.clients.insert(client.id, client.clone());

        tracing::info!(client_id = %client.id, "client created");
        Ok(client)
    }

    pub fn update_client(
        &self,
        _caller: &Principal,
        client_id: ClientId,
        cmd: UpdateClient,
    ) -> DomainResult<Client> {
        let mut state = self.store.write();
        let client = state
            .clients
            .get_mut(&client_id)
            .ok_or(DomainError::NotFound)?;
        client.apply_update(cmd)?;
        Ok(client.clone())
    }

    pub fn remove_client(&self, caller: &Principal, client_id: ClientId) -> DomainResult<()> {
        ensure_admin(caller)?;
        let mut state = self.store.write();
        state
            .clients
            .remove(&client_id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }

    pub fn get_client(&self, client_id: ClientId) -> DomainResult<Client> {
        self.store
            .read()
            .clients
            .get(&client_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn list_clients(&self) -> Vec<Client> {
        let mut clients: Vec<Client> = self.store.read().clients.values().cloned().collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        clients
    }

    // ── vendors ────────────────────────────────────────────────────────

    pub fn create_vendor(&self, _caller: &Principal, cmd: CreateVendor) -> DomainResult<Vendor> {
        let vendor = Vendor::create(cmd)?;

        let mut state = self.store.write();
        if state.vendors.contains_key(&vendor.id) {
            return Err(DomainError::conflict("vendor already exists"));
        }
        state.vendors.insert(vendor.id, vendor.clone());

        tracing::info!(vendor_id = %vendor.id, "vendor created");
        Ok(vendor)
    }

    pub fn update_vendor(
        &self,
        _caller: &Principal,
        vendor_id: VendorId,
        cmd: UpdateVendor,
    ) -> DomainResult<Vendor> {
        let mut state = self.store.write();
        let vendor = state
            .vendors
            .get_mut(&vendor_id)
            .ok_or(DomainError::NotFound)?;
        vendor.apply_update(cmd)?;
        Ok(vendor.clone())
    }

    pub fn remove_vendor(&self, caller: &Principal, vendor_id: VendorId) -> DomainResult<()> {
        ensure_admin(caller)?;
        let mut state = self.store.write();
        state
            .vendors
            .remove(&vendor_id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }

    pub fn get_vendor(&self, vendor_id: VendorId) -> DomainResult<Vendor> {
        self.store
            .read()
            .vendors
            .get(&vendor_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn list_vendors(&self) -> Vec<Vendor> {
        let mut vendors: Vec<Vendor> = self.store.read().vendors.values().cloned().collect();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        vendors
    }

    // ── service providers ──────────────────────────────────────────────

    pub fn create_provider(
        &self,
        _caller: &Principal,
        cmd: CreateServiceProvider,
    ) -> DomainResult<ServiceProvider> {
        let provider = ServiceProvider::create(cmd)?;

        let mut state = self.store.write();
        if state.providers.contains_key(&provider.id) {
            return Err(DomainError::conflict("service provider already exists"));
        }
        state.providers.insert(provider.id, provider.clone());

        tracing::info!(provider_id = %provider.id, "service provider created");
        Ok(provider)
    }

    pub fn update_provider(
        &self,
        _caller: &Principal,
        provider_id: ServiceProviderId,
        cmd: UpdateServiceProvider,
    ) -> DomainResult<ServiceProvider> {
        let mut state = self.store.write();
        let provider = state
            .providers
            .get_mut(&provider_id)
            .ok_or(DomainError::NotFound)?;
        provider.apply_update(cmd)?;
        Ok(provider.clone())
    }

    pub fn remove_provider(
        &self,
        caller: &Principal,
        provider_id: ServiceProviderId,
    ) -> DomainResult<()> {
        ensure_admin(caller)?;
        let mut state = self.store.write();
        state
            .providers
            .remove(&provider_id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }

    pub fn get_provider(&self, provider_id: ServiceProviderId) -> DomainResult<ServiceProvider> {
        self.store
            .read()
            .providers
            .get(&provider_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn list_providers(&self) -> Vec<ServiceProvider> {
        let mut providers: Vec<ServiceProvider> =
            self.store.read().providers.values().cloned().collect();
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        providers
    }
}
