use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitflow_core::{DomainError, DomainResult, Entity, VendorId};

use crate::contact::ContactInfo;

/// Record: Vendor — a supplier contact, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub contact: ContactInfo,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Vendor {
    type Id = VendorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateVendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVendor {
    pub vendor_id: VendorId,
    pub name: String,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateVendor (partial patch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVendor {
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl Vendor {
    pub fn create(cmd: CreateVendor) -> DomainResult<Vendor> {
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Vendor {
            id: cmd.vendor_id,
            name: cmd.name,
            contact: cmd.contact.unwrap_or_default(),
            notes: cmd.notes,
            created_at: cmd.occurred_at,
            updated_at: None,
        })
    }

    pub fn apply_update(&mut self, cmd: UpdateVendor) -> DomainResult<()> {
        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }

        if let Some(name) = cmd.name {
            self.name = name;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_patch() {
        let mut vendor = Vendor::create(CreateVendor {
            vendor_id: VendorId::new(),
            name: "Fabric Supply Co".to_string(),
            contact: None,
            notes: None,
            occurred_at: Utc::now(),
        })
        .unwrap();

        vendor
            .apply_update(UpdateVendor {
                name: None,
                contact: None,
                notes: Some("net-30 terms".to_string()),
                occurred_at: Utc::now(),
            })
            .unwrap();

        assert_eq!(vendor.name, "Fabric Supply Co");
        assert_eq!(vendor.notes.as_deref(), Some("net-30 terms"));
    }
}
