//! Blob storage collaborator seam.
//!
//! The hosted blob store hands out one-shot upload URLs; clients upload
//! directly and the records only ever keep the opaque storage identifier.
//! File contents are never inspected here.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::Serialize;
use uuid::Uuid;

/// An issued upload slot: where to PUT the file, and the identifier to
/// store on the record afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadTicket {
    pub upload_url: String,
    pub storage_id: String,
}

/// Blob store collaborator.
pub trait BlobStore: Send + Sync {
    /// Mint an upload URL plus the storage id it will be filed under.
    fn generate_upload_url(&self) -> UploadTicket;

    /// Retrieval URL for a previously issued storage id, if it exists.
    fn get_url(&self, storage_id: &str) -> Option<String>;
}

/// In-memory stand-in for the hosted store: remembers issued ids and
/// serves deterministic URLs for them.
#[derive(Debug)]
pub struct InMemoryBlobStore {
    base_url: String,
    issued: Mutex<HashSet<String>>,
}

impl InMemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            issued: Mutex::new(HashSet::new()),
        }
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new("https://blobs.invalid")
    }
}

impl BlobStore for InMemoryBlobStore {
    fn generate_upload_url(&self) -> UploadTicket {
        let storage_id = Uuid::now_v7().to_string();
        if let Ok(mut issued) = self.issued.lock() {
            issued.insert(storage_id.clone());
        }
        UploadTicket {
            upload_url: format!("{}/upload/{}", self.base_url, storage_id),
            storage_id,
        }
    }

    fn get_url(&self, storage_id: &str) -> Option<String> {
        let issued = self.issued.lock().ok()?;
        issued
            .contains(storage_id)
            .then(|| format!("{}/files/{}", self.base_url, storage_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_ids_resolve_and_unknown_ids_do_not() {
        let store = InMemoryBlobStore::default();
        let ticket = store.generate_upload_url();

        assert!(ticket.upload_url.contains(&ticket.storage_id));
        assert!(store.get_url(&ticket.storage_id).is_some());
        assert_eq!(store.get_url("nope"), None);
    }
}
