use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitflow_core::{ClientId, DomainError, DomainResult, Entity};

use crate::contact::ContactInfo;

/// Client relationship kind: recurring monthly recipient or one-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    Monthly,
    OneTime,
}

/// Record: Client — a recipient organization/contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub organization: Option<String>,
    pub kind: ClientKind,
    pub contact: ContactInfo,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateClient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClient {
    pub client_id: ClientId,
    pub name: String,
    pub organization: Option<String>,
    pub kind: ClientKind,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateClient (partial patch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub kind: Option<ClientKind>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl Client {
    pub fn create(cmd: CreateClient) -> DomainResult<Client> {
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Client {
            id: cmd.client_id,
            name: cmd.name,
            organization: cmd.organization,
            kind: cmd.kind,
            contact: cmd.contact.unwrap_or_default(),
            notes: cmd.notes,
            created_at: cmd.occurred_at,
            updated_at: None,
        })
    }

    pub fn apply_update(&mut self, cmd: UpdateClient) -> DomainResult<()> {
        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }

        if let Some(name) = cmd.name {
            self.name = name;
        }
        if cmd.organization.is_some() {
            self.organization = cmd.organization;
        }
        if let Some(kind) = cmd.kind {
            self.kind = kind;
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

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn create_defaults_contact_when_absent() {
        let client = Client::create(CreateClient {
            client_id: ClientId::new(),
            name: "Greenfield School".to_string(),
            organization: Some("Greenfield Trust".to_string()),
            kind: ClientKind::Monthly,
            contact: None,
            notes: None,
            occurred_at: test_time(),
        })
        .unwrap();

        assert_eq!(client.contact, ContactInfo::default());
        assert_eq!(client.kind, ClientKind::Monthly);
    }

    #[test]
    fn create_rejects_empty_name() {
        let err = Client::create(CreateClient {
            client_id: ClientId::new(),
            name: "   ".to_string(),
            organization: None,
            kind: ClientKind::OneTime,
            contact: None,
            notes: None,
            occurred_at: test_time(),
        })
        .unwrap_err();

        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn update_patches_only_supplied_fields() {
        let mut client = Client::create(CreateClient {
            client_id: ClientId::new(),
            name: "Greenfield School".to_string(),
            organization: None,
            kind: ClientKind::Monthly,
            contact: None,
            notes: None,
            occurred_at: test_time(),
        })
        .unwrap();

        client
            .apply_update(UpdateClient {
                name: None,
                organization: None,
                kind: Some(ClientKind::OneTime),
                contact: Some(ContactInfo {
                    email: Some("office@greenfield.example".to_string()),
                    phone: None,
                    address: None,
                }),
                notes: None,
                occurred_at: test_time(),
            })
            .unwrap();

        assert_eq!(client.name, "Greenfield School");
        assert_eq!(client.kind, ClientKind::OneTime);
        assert_eq!(
            client.contact.email.as_deref(),
            Some("office@greenfield.example")
        );
    }
}
