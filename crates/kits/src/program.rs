use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitflow_core::{DomainError, DomainResult, Entity, ProgramId};

/// Record: Program — a named category of kits, referenced by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    /// Stable key kits reference via their `program` field. Immutable after
    /// creation — renaming a slug would silently orphan every kit under it.
    pub slug: String,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Program {
    type Id = ProgramId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Validate a program slug: non-empty, lowercase ASCII letters, digits and
/// hyphens, no leading/trailing hyphen.
pub fn validate_slug(slug: &str) -> DomainResult<()> {
    if slug.is_empty() {
        return Err(DomainError::validation("slug cannot be empty"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(DomainError::validation(
            "slug cannot start or end with a hyphen",
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(DomainError::validation(
            "slug may only contain lowercase letters, digits and hyphens",
        ));
    }
    Ok(())
}

/// Command: CreateProgram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProgram {
    pub program_id: ProgramId,
    pub name: String,
    pub slug: String,
    pub categories: Vec<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateProgram (slug is immutable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProgram {
    pub name: Option<String>,
    pub categories: Option<Vec<String>>,
    pub occurred_at: DateTime<Utc>,
}

impl Program {
    pub fn create(cmd: CreateProgram) -> DomainResult<Program> {
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        validate_slug(&cmd.slug)?;

        Ok(Program {
            id: cmd.program_id,
            name: cmd.name,
            slug: cmd.slug,
            categories: cmd.categories,
            created_at: cmd.occurred_at,
            updated_at: None,
        })
    }

    pub fn apply_update(&mut self, cmd: UpdateProgram) -> DomainResult<()> {
        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }

        if let Some(name) = cmd.name {
            self.name = name;
        }
        if let Some(categories) = cmd.categories {
            self.categories = categories;
        }
        self.updated_at = Some(cmd.occurred_at);

        Ok(())
    }
}
