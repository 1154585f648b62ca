use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitflow_core::{DomainError, DomainResult, Entity, ServiceProviderId};

use crate::contact::ContactInfo;

/// Record: ServiceProvider — laser cutting, printing, courier and similar
/// outside services. A pure contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: ServiceProviderId,
    pub name: String,
    /// What the provider does (e.g. "laser cutting").
    pub service: Option<String>,
    pub contact: ContactInfo,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ServiceProvider {
    type Id = ServiceProviderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateServiceProvider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceProvider {
    pub provider_id: ServiceProviderId,
    pub name: String,
    pub service: Option<String>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateServiceProvider (partial patch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateServiceProvider {
    pub name: Option<String>,
    pub service: Option<String>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl ServiceProvider {
    pub fn create(cmd: CreateServiceProvider) -> DomainResult<ServiceProvider> {
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(ServiceProvider {
            id: cmd.provider_id,
            name: cmd.name,
            service: cmd.service,
            contact: cmd.contact.unwrap_or_default(),
            notes: cmd.notes,
            created_at: cmd.occurred_at,
            updated_at: None,
        })
    }

    pub fn apply_update(&mut self, cmd: UpdateServiceProvider) -> DomainResult<()> {
        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }

        if let Some(name) = cmd.name {
            self.name = name;
        }
        if cmd.service.is_some() {
            self.service = cmd.service;
        }
        if let Some(contact) = cmd.contact {
            self.contact = contact;
        }
        if cmd.notes.is_some() {
            self.notes = cmd.notes;
        }
        self.updated_at = Some(cmd.occurred_at);

        Ok(())
    }
}
