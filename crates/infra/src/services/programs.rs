use std::sync::Arc;

use kitflow_auth::Principal;
use kitflow_core::{DomainError, DomainResult, ProgramId};
use kitflow_kits::{CreateProgram, Program, UpdateProgram};

use crate::datastore::Datastore;
use crate::services::ensure_admin;

/// Program registry operations.
#[derive(Clone)]
pub struct ProgramService {
    store: Arc<Datastore>,
}

impl ProgramService {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    pub fn create(&self, _caller: &Principal, cmd: CreateProgram) -> DomainResult<Program> {
        let program = Program::create(cmd)?;

        let mut state = self.store.write();
        if state.programs.values().any(|p| p.slug == program.slug) {
            return Err(DomainError::validation(format!(
                "program slug '{}' already exists",
                program.slug
            )));
        }
        state.programs.insert(program.id, program.clone());

        tracing::info!(program = %program.slug, "program created");
        Ok(program)
    }

    pub fn update(
        &self,
        _caller: &Principal,
        program_id: ProgramId,
        cmd: UpdateProgram,
    ) -> DomainResult<Program> {
        let mut state = self.store.write();
        let program = state
            .programs
            .get_mut(&program_id)
            .ok_or(DomainError::NotFound)?;
        program.apply_update(cmd)?;
        Ok(program.clone())
    }

    /// Admin only. Refuses while any kit still references the slug.
    pub fn remove(&self, caller: &Principal, program_id: ProgramId) -> DomainResult<()> {
        ensure_admin(caller)?;

        let mut state = self.store.write();
        let slug = state
            .programs
            .get(&program_id)
            .ok_or(DomainError::NotFound)?
            .slug
            .clone();

        let referencing = state.kits.values().filter(|k| k.program == slug).count();
        if referencing > 0 {
            return Err(DomainError::conflict(format!(
                "program '{slug}' is still referenced by {referencing} kit(s)"
            )));
        }

        state.programs.remove(&program_id);
        tracing::info!(program = %slug, "program removed");
        Ok(())
    }

    pub fn get(&self, program_id: ProgramId) -> DomainResult<Program> {
        self.store
            .read()
            .programs
            .get(&program_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn get_by_slug(&self, slug: &str) -> DomainResult<Program> {
        self.store
            .read()
            .programs
            .values()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn list(&self) -> Vec<Program> {
        let mut programs: Vec<Program> = self.store.read().programs.values().cloned().collect();
        programs.sort_by(|a, b| a.slug.cmp(&b.slug));
        programs
    }
}
