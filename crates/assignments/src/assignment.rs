use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitflow_core::{AssignmentId, ClientId, DomainError, DomainResult, Entity, KitId};

/// Assignment status lifecycle.
///
/// Initial `Assigned`, terminal `Dispatched`. The store does not force the
/// forward order — intermediate transitions are side-effect-free
/// bookkeeping — but the restore-on-delete rule keys off this status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Assigned,
    Packed,
    Dispatched,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Packed => "packed",
            AssignmentStatus::Dispatched => "dispatched",
        }
    }
}

/// Optional 1–10 classification tag used for reporting buckets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    pub fn new(value: u8) -> DomainResult<Self> {
        if !(1..=10).contains(&value) {
            return Err(DomainError::validation(format!(
                "grade must be 1-10, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for Grade {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Grade filter for bulk month operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "grade")]
pub enum GradeFilter {
    /// Match regardless of grade.
    Any,
    /// Match assignments with exactly this grade.
    Exact(Grade),
    /// Match assignments with no grade set.
    Unspecified,
}

impl GradeFilter {
    pub fn matches(&self, grade: Option<Grade>) -> bool {
        match self {
            GradeFilter::Any => true,
            GradeFilter::Exact(wanted) => grade == Some(*wanted),
            GradeFilter::Unspecified => grade.is_none(),
        }
    }
}

/// Record: Assignment — a reservation of `quantity` units of a kit for a
/// client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub kit_id: KitId,
    pub client_id: ClientId,
    pub quantity: i64,
    pub status: AssignmentStatus,
    pub grade: Option<Grade>,
    pub notes: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub dispatched_at: Option<DateTime<Utc>>,
}

impl Entity for Assignment {
    type Id = AssignmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateAssignment.
///
/// The optional `idempotency_key` lets a caller retry a create that may
/// have partially succeeded without double-decrementing kit stock: the
/// store remembers seen keys and returns the original assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAssignment {
    pub assignment_id: AssignmentId,
    pub kit_id: KitId,
    pub client_id: ClientId,
    pub quantity: i64,
    pub grade: Option<Grade>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateAssignmentStatus — pure status patch, no stock effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAssignmentStatus {
    pub assignment_id: AssignmentId,
    pub status: AssignmentStatus,
    pub occurred_at: DateTime<Utc>,
}

impl Assignment {
    /// Build the assignment record for a validated creation command.
    ///
    /// Stock sufficiency is a store-level check (it needs the kit); this
    /// only validates the command's own shape.
    pub fn create(cmd: CreateAssignment) -> DomainResult<Assignment> {
        if cmd.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        Ok(Assignment {
            id: cmd.assignment_id,
            kit_id: cmd.kit_id,
            client_id: cmd.client_id,
            quantity: cmd.quantity,
            status: AssignmentStatus::Assigned,
            grade: cmd.grade,
            notes: cmd.notes,
            assigned_at: cmd.occurred_at,
            updated_at: None,
            dispatched_at: None,
        })
    }

    pub fn apply_status(&mut self, cmd: UpdateAssignmentStatus) {
        self.status = cmd.status;
        self.updated_at = Some(cmd.occurred_at);
    }

    /// Record a dispatch date (optionally advancing status to dispatched).
    pub fn mark_dispatched(&mut self, dispatched_at: DateTime<Utc>, advance_status: bool) {
        self.dispatched_at = Some(dispatched_at);
        if advance_status {
            self.status = AssignmentStatus::Dispatched;
        }
        self.updated_at = Some(dispatched_at);
    }

    /// Clear the dispatch date (optionally reverting status to assigned).
    pub fn clear_dispatch(&mut self, occurred_at: DateTime<Utc>, revert_status: bool) {
        self.dispatched_at = None;
        if revert_status && self.status == AssignmentStatus::Dispatched {
            self.status = AssignmentStatus::Assigned;
        }
        self.updated_at = Some(occurred_at);
    }

    /// Whether deleting this assignment must hand its quantity back to the
    /// kit. Dispatched units have left the building.
    pub fn restores_stock_on_delete(&self) -> bool {
        self.status != AssignmentStatus::Dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn create_cmd(quantity: i64) -> CreateAssignment {
        CreateAssignment {
            assignment_id: AssignmentId::new(),
            kit_id: KitId::new(),
            client_id: ClientId::new(),
            quantity,
            grade: None,
            notes: None,
            idempotency_key: None,
            occurred_at: test_time(),
        }
    }

    #[test]
    fn create_starts_assigned_with_no_dispatch_date() {
        let a = Assignment::create(create_cmd(3)).unwrap();
        assert_eq!(a.status, AssignmentStatus::Assigned);
        assert_eq!(a.dispatched_at, None);
        assert!(a.restores_stock_on_delete());
    }

    #[test]
    fn create_rejects_nonpositive_quantity() {
        for quantity in [0, -1] {
            let err = Assignment::create(create_cmd(quantity)).unwrap_err();
            match err {
                DomainError::Validation(_) => {}
                other => panic!("expected Validation, got {other:?}"),
            }
        }
    }

    #[test]
    fn grade_bounds() {
        assert!(Grade::new(1).is_ok());
        assert!(Grade::new(10).is_ok());
        assert!(Grade::new(0).is_err());
        assert!(Grade::new(11).is_err());
    }

    #[test]
    fn grade_filter_semantics() {
        let three = Grade::new(3).unwrap();
        assert!(GradeFilter::Any.matches(None));
        assert!(GradeFilter::Any.matches(Some(three)));
        assert!(GradeFilter::Exact(three).matches(Some(three)));
        assert!(!GradeFilter::Exact(three).matches(None));
        assert!(!GradeFilter::Exact(three).matches(Some(Grade::new(4).unwrap())));
        assert!(GradeFilter::Unspecified.matches(None));
        assert!(!GradeFilter::Unspecified.matches(Some(three)));
    }

    #[test]
    fn dispatched_assignments_do_not_restore_stock() {
        let mut a = Assignment::create(create_cmd(5)).unwrap();
        a.mark_dispatched(test_time(), true);
        assert_eq!(a.status, AssignmentStatus::Dispatched);
        assert!(!a.restores_stock_on_delete());
    }

    #[test]
    fn clear_dispatch_reverts_only_when_asked() {
        let mut a = Assignment::create(create_cmd(5)).unwrap();
        a.mark_dispatched(test_time(), true);

        a.clear_dispatch(test_time(), false);
        assert_eq!(a.dispatched_at, None);
        assert_eq!(a.status, AssignmentStatus::Dispatched);

        a.mark_dispatched(test_time(), true);
        a.clear_dispatch(test_time(), true);
        assert_eq!(a.status, AssignmentStatus::Assigned);
    }

    #[test]
    fn status_patch_is_not_forced_monotonic() {
        let mut a = Assignment::create(create_cmd(2)).unwrap();
        a.apply_status(UpdateAssignmentStatus {
            assignment_id: a.id,
            status: AssignmentStatus::Packed,
            occurred_at: test_time(),
        });
        assert_eq!(a.status, AssignmentStatus::Packed);

        // Backward patches are accepted; intermediate transitions carry no
        // stock side effect so accounting stays intact.
        a.apply_status(UpdateAssignmentStatus {
            assignment_id: a.id,
            status: AssignmentStatus::Assigned,
            occurred_at: test_time(),
        });
        assert_eq!(a.status, AssignmentStatus::Assigned);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: only the 1-10 range constructs a grade.
            #[test]
            fn grade_accepts_exactly_one_through_ten(value in 0u8..=255) {
                let result = Grade::new(value);
                if (1..=10).contains(&value) {
                    prop_assert_eq!(result.unwrap().value(), value);
                } else {
                    prop_assert!(result.is_err());
                }
            }
        }
    }
}
