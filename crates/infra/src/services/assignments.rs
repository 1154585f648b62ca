use std::sync::Arc;

use chrono::{DateTime, Utc};

use kitflow_assignments::{
    Assignment, AssignmentStatus, CreateAssignment, GradeFilter, Month, UpdateAssignmentStatus,
};
use kitflow_auth::Principal;
use kitflow_core::{AssignmentId, ClientId, DomainError, DomainResult, KitId};

use crate::datastore::{Collections, Datastore};
use crate::services::ensure_admin;

/// Assignment lifecycle operations.
///
/// The one component with real invariants: an assignment's quantity is
/// subtracted from its kit exactly once at creation, and handed back
/// exactly once when a non-dispatched assignment is deleted. Every method
/// here runs under a single datastore lock acquisition, so the
/// insert-and-decrement pair (and every bulk clear) is one logical
/// transaction.
#[derive(Clone)]
pub struct AssignmentService {
    store: Arc<Datastore>,
}

impl AssignmentService {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    /// Reserve `quantity` units of a kit for a client.
    ///
    /// Fails with `InsufficientStock` when the kit is missing or has fewer
    /// units than requested, leaving both collections untouched. A repeated
    /// `idempotency_key` short-circuits to the assignment it first created
    /// instead of decrementing stock again.
    pub fn create(&self, _caller: &Principal, cmd: CreateAssignment) -> DomainResult<Assignment> {
        let idempotency_key = cmd.idempotency_key.clone();
        let kit_id = cmd.kit_id;
        let quantity = cmd.quantity;
        let occurred_at = cmd.occurred_at;

        let assignment = Assignment::create(cmd)?;

        let mut state = self.store.write();

        if let Some(key) = &idempotency_key {
            if let Some(existing_id) = state.assignment_keys.get(key) {
                if let Some(existing) = state.assignments.get(existing_id) {
                    tracing::debug!(key = %key, assignment_id = %existing.id, "assignment create replayed");
                    return Ok(existing.clone());
                }
            }
        }

        let kit = state
            .kits
            .get_mut(&kit_id)
            .ok_or_else(|| DomainError::insufficient_stock(format!("kit {kit_id} not found")))?;
        if kit.stock_count < quantity {
            return Err(DomainError::insufficient_stock(format!(
                "kit {} has {} unit(s), requested {}",
                kit_id, kit.stock_count, quantity
            )));
        }

        kit.adjust_stock(-quantity, occurred_at);
        state.assignments.insert(assignment.id, assignment.clone());
        if let Some(key) = idempotency_key {
            state.assignment_keys.insert(key, assignment.id);
        }

        tracing::info!(
            assignment_id = %assignment.id,
            kit_id = %kit_id,
            quantity,
            "assignment created"
        );
        Ok(assignment)
    }

    /// Pure status patch — no stock side effect, any direction accepted.
    pub fn update_status(
        &self,
        _caller: &Principal,
        cmd: UpdateAssignmentStatus,
    ) -> DomainResult<Assignment> {
        let mut state = self.store.write();
        let assignment = state
            .assignments
            .get_mut(&cmd.assignment_id)
            .ok_or(DomainError::NotFound)?;
        assignment.apply_status(cmd);
        Ok(assignment.clone())
    }

    /// Bulk-set the dispatch date on a client's assignments for one
    /// calendar month, optionally narrowing by grade and advancing status.
    /// Returns the number affected; zero matches is a no-op, not an error.
    pub fn set_dispatch_date_for_client_month(
        &self,
        _caller: &Principal,
        client_id: ClientId,
        month: Month,
        dispatched_at: DateTime<Utc>,
        grade_filter: GradeFilter,
        mark_dispatched: bool,
    ) -> u64 {
        let mut state = self.store.write();
        let mut affected = 0;

        for assignment in state.assignments.values_mut() {
            if assignment.client_id != client_id
                || !month.contains(assignment.assigned_at)
                || !grade_filter.matches(assignment.grade)
            {
                continue;
            }
            assignment.mark_dispatched(dispatched_at, mark_dispatched);
            affected += 1;
        }

        tracing::info!(client_id = %client_id, %month, affected, "dispatch date set");
        affected
    }

    /// Inverse of [`Self::set_dispatch_date_for_client_month`].
    pub fn clear_dispatch_date_for_client_month(
        &self,
        _caller: &Principal,
        client_id: ClientId,
        month: Month,
        grade_filter: GradeFilter,
        revert_status: bool,
        occurred_at: DateTime<Utc>,
    ) -> u64 {
        let mut state = self.store.write();
        let mut affected = 0;

        for assignment in state.assignments.values_mut() {
            if assignment.client_id != client_id
                || !month.contains(assignment.assigned_at)
                || !grade_filter.matches(assignment.grade)
            {
                continue;
            }
            assignment.clear_dispatch(occurred_at, revert_status);
            affected += 1;
        }

        tracing::info!(client_id = %client_id, %month, affected, "dispatch date cleared");
        affected
    }

    /// Delete an assignment, restoring its quantity to the kit unless it
    /// was dispatched.
    pub fn remove(
        &self,
        caller: &Principal,
        assignment_id: AssignmentId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        ensure_admin(caller)?;

        let mut state = self.store.write();
        let assignment = state
            .assignments
            .remove(&assignment_id)
            .ok_or(DomainError::NotFound)?;
        restore_stock(&mut state, &assignment, occurred_at);
        prune_idempotency_keys(&mut state);

        tracing::info!(assignment_id = %assignment_id, "assignment removed");
        Ok(())
    }

    /// Delete every non-dispatched assignment, restoring each quantity to
    /// its kit. Returns the number deleted.
    pub fn clear_all_pending(
        &self,
        caller: &Principal,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<u64> {
        ensure_admin(caller)?;

        let mut state = self.store.write();
        let pending: Vec<AssignmentId> = state
            .assignments
            .values()
            .filter(|a| a.status != AssignmentStatus::Dispatched)
            .map(|a| a.id)
            .collect();

        let mut deleted = 0;
        for id in pending {
            if let Some(assignment) = state.assignments.remove(&id) {
                restore_stock(&mut state, &assignment, occurred_at);
                deleted += 1;
            }
        }
        prune_idempotency_keys(&mut state);

        tracing::info!(deleted, "pending assignments cleared");
        Ok(deleted)
    }

    /// Delete every assignment regardless of status. Stock is restored
    /// only for the ones that had not been dispatched.
    pub fn clear_all(&self, caller: &Principal, occurred_at: DateTime<Utc>) -> DomainResult<u64> {
        ensure_admin(caller)?;

        let mut state = self.store.write();
        let all: Vec<AssignmentId> = state.assignments.keys().copied().collect();

        let mut deleted = 0;
        for id in all {
            if let Some(assignment) = state.assignments.remove(&id) {
                restore_stock(&mut state, &assignment, occurred_at);
                deleted += 1;
            }
        }
        state.assignment_keys.clear();

        tracing::info!(deleted, "all assignments cleared");
        Ok(deleted)
    }

    /// Delete the pending assignments of one kit. Returns the number
    /// deleted and the total quantity handed back to the kit.
    pub fn clear_pending_by_kit(
        &self,
        caller: &Principal,
        kit_id: KitId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<(u64, i64)> {
        ensure_admin(caller)?;

        let mut state = self.store.write();
        let pending: Vec<AssignmentId> = state
            .assignments
            .values()
            .filter(|a| a.kit_id == kit_id && a.status != AssignmentStatus::Dispatched)
            .map(|a| a.id)
            .collect();

        let mut deleted = 0;
        let mut restored = 0;
        for id in pending {
            if let Some(assignment) = state.assignments.remove(&id) {
                if restore_stock(&mut state, &assignment, occurred_at) {
                    restored += assignment.quantity;
                }
                deleted += 1;
            }
        }
        prune_idempotency_keys(&mut state);

        tracing::info!(kit_id = %kit_id, deleted, restored, "pending assignments cleared for kit");
        Ok((deleted, restored))
    }

    pub fn get(&self, assignment_id: AssignmentId) -> DomainResult<Assignment> {
        self.store
            .read()
            .assignments
            .get(&assignment_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn list(&self) -> Vec<Assignment> {
        let mut assignments: Vec<Assignment> =
            self.store.read().assignments.values().cloned().collect();
        assignments.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        assignments
    }

    pub fn list_by_client(&self, client_id: ClientId) -> Vec<Assignment> {
        let mut assignments: Vec<Assignment> = self
            .store
            .read()
            .assignments
            .values()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        assignments
    }

    pub fn list_by_kit(&self, kit_id: KitId) -> Vec<Assignment> {
        let mut assignments: Vec<Assignment> = self
            .store
            .read()
            .assignments
            .values()
            .filter(|a| a.kit_id == kit_id)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        assignments
    }
}

/// Hand a deleted assignment's quantity back to its kit when the restore
/// rule applies. A missing kit is tolerated (deleting a kit does not
/// cascade); the deletion proceeds without restoration. Returns whether
/// stock was actually restored.
fn restore_stock(
    state: &mut Collections,
    assignment: &Assignment,
    occurred_at: DateTime<Utc>,
) -> bool {
    if !assignment.restores_stock_on_delete() {
        return false;
    }
    match state.kits.get_mut(&assignment.kit_id) {
        Some(kit) => {
            kit.adjust_stock(assignment.quantity, occurred_at);
            true
        }
        None => {
            tracing::warn!(
                assignment_id = %assignment.id,
                kit_id = %assignment.kit_id,
                "kit missing during restore; skipping"
            );
            false
        }
    }
}

/// Drop idempotency keys whose assignment no longer exists.
fn prune_idempotency_keys(state: &mut Collections) {
    let Collections {
        assignments,
        assignment_keys,
        ..
    } = state;
    assignment_keys.retain(|_, id| assignments.contains_key(id));
}
