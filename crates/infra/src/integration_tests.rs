//! Store-level integration tests: services wired over one datastore,
//! exercising the reservation lifecycle end to end.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use kitflow_assignments::{
    AssignmentStatus, CreateAssignment, Grade, GradeFilter, Month, UpdateAssignmentStatus,
};
use kitflow_auth::{Permission, Principal, PrincipalId, Role};
use kitflow_core::{AssignmentId, ClientId, DomainError, KitId, ProgramId};
use kitflow_kits::{CreateKit, CreateProgram, KitStatus, PackingData};

use crate::datastore::Datastore;
use crate::services::{AssignmentService, KitService, ProgramService, ReportingService};

struct Harness {
    kits: KitService,
    programs: ProgramService,
    assignments: AssignmentService,
    reports: ReportingService,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(Datastore::new());
        Self {
            kits: KitService::new(store.clone()),
            programs: ProgramService::new(store.clone()),
            assignments: AssignmentService::new(store.clone()),
            reports: ReportingService::new(store),
        }
    }
}

fn admin() -> Principal {
    Principal::new(
        PrincipalId::new(),
        vec![Role::admin()],
        vec![Permission::new("*")],
    )
}

fn plain_user() -> Principal {
    Principal::new(
        PrincipalId::new(),
        vec![Role::user()],
        vec![Permission::new("kits.write"), Permission::new("assignments.write")],
    )
}

fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn make_kit(h: &Harness, stock: i64) -> KitId {
    let kit_id = KitId::new();
    h.kits
        .create(
            &admin(),
            CreateKit {
                kit_id,
                name: "Beginner Sewing Kit".to_string(),
                program: "sewing".to_string(),
                variant: None,
                stock_count: stock,
                low_stock_threshold: 2,
                packing: PackingData::Legacy("thread, needles, felt".to_string()),
                remarks: None,
                image: None,
                occurred_at: ts(2024, 1, 1),
            },
        )
        .unwrap();
    kit_id
}

fn assign(
    h: &Harness,
    kit_id: KitId,
    client_id: ClientId,
    quantity: i64,
    at: DateTime<Utc>,
    grade: Option<Grade>,
) -> AssignmentId {
    let assignment_id = AssignmentId::new();
    h.assignments
        .create(
            &plain_user(),
            CreateAssignment {
                assignment_id,
                kit_id,
                client_id,
                quantity,
                grade,
                notes: None,
                idempotency_key: None,
                occurred_at: at,
            },
        )
        .unwrap();
    assignment_id
}

#[test]
fn assignment_create_decrements_stock_once() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);

    assign(&h, kit_id, ClientId::new(), 3, ts(2024, 3, 5), None);

    let kit = h.kits.get(kit_id).unwrap();
    assert_eq!(kit.stock_count, 7);
    assert_eq!(kit.status, KitStatus::InStock);
}

#[test]
fn insufficient_stock_leaves_both_stores_unchanged() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 2);

    let err = h
        .assignments
        .create(
            &plain_user(),
            CreateAssignment {
                assignment_id: AssignmentId::new(),
                kit_id,
                client_id: ClientId::new(),
                quantity: 3,
                grade: None,
                notes: None,
                idempotency_key: None,
                occurred_at: ts(2024, 3, 5),
            },
        )
        .unwrap_err();

    match err {
        DomainError::InsufficientStock(_) => {}
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 2);
    assert!(h.assignments.list().is_empty());
}

#[test]
fn missing_kit_reads_as_insufficient_stock() {
    let h = Harness::new();

    let err = h
        .assignments
        .create(
            &plain_user(),
            CreateAssignment {
                assignment_id: AssignmentId::new(),
                kit_id: KitId::new(),
                client_id: ClientId::new(),
                quantity: 1,
                grade: None,
                notes: None,
                idempotency_key: None,
                occurred_at: ts(2024, 3, 5),
            },
        )
        .unwrap_err();

    match err {
        DomainError::InsufficientStock(_) => {}
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
}

#[test]
fn draining_stock_flips_status_to_assigned() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 3);

    assign(&h, kit_id, ClientId::new(), 3, ts(2024, 3, 5), None);

    let kit = h.kits.get(kit_id).unwrap();
    assert_eq!(kit.stock_count, 0);
    assert_eq!(kit.status, KitStatus::Assigned);
}

#[test]
fn clear_pending_by_kit_round_trips_stock() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);
    let assignment_id = assign(&h, kit_id, ClientId::new(), 3, ts(2024, 3, 5), None);

    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 7);

    let (deleted, restored) = h
        .assignments
        .clear_pending_by_kit(&admin(), kit_id, ts(2024, 3, 6))
        .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(restored, 3);
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 10);
    assert!(matches!(
        h.assignments.get(assignment_id),
        Err(DomainError::NotFound)
    ));
}

#[test]
fn clearing_an_empty_pending_set_is_a_noop() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);

    let deleted = h
        .assignments
        .clear_all_pending(&admin(), ts(2024, 3, 6))
        .unwrap();

    assert_eq!(deleted, 0);
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 10);
}

#[test]
fn clear_all_restores_only_non_dispatched_stock() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);
    let client_id = ClientId::new();

    let dispatched_id = assign(&h, kit_id, client_id, 5, ts(2024, 3, 5), None);
    let pending_id = assign(&h, kit_id, client_id, 2, ts(2024, 3, 6), None);
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 3);

    h.assignments
        .update_status(
            &plain_user(),
            UpdateAssignmentStatus {
                assignment_id: dispatched_id,
                status: AssignmentStatus::Dispatched,
                occurred_at: ts(2024, 3, 7),
            },
        )
        .unwrap();

    let deleted = h.assignments.clear_all(&admin(), ts(2024, 3, 8)).unwrap();

    assert_eq!(deleted, 2);
    // Only the pending 2 came back; the dispatched 5 left inventory.
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 5);
    assert!(matches!(
        h.assignments.get(dispatched_id),
        Err(DomainError::NotFound)
    ));
    assert!(matches!(
        h.assignments.get(pending_id),
        Err(DomainError::NotFound)
    ));
}

#[test]
fn clear_pending_skips_dispatched_assignments_entirely() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);
    let client_id = ClientId::new();

    let dispatched_id = assign(&h, kit_id, client_id, 4, ts(2024, 3, 5), None);
    h.assignments
        .update_status(
            &plain_user(),
            UpdateAssignmentStatus {
                assignment_id: dispatched_id,
                status: AssignmentStatus::Dispatched,
                occurred_at: ts(2024, 3, 6),
            },
        )
        .unwrap();
    assign(&h, kit_id, client_id, 1, ts(2024, 3, 7), None);

    let deleted = h
        .assignments
        .clear_all_pending(&admin(), ts(2024, 3, 8))
        .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 6);
    // The dispatched assignment survives a pending-only clear.
    assert!(h.assignments.get(dispatched_id).is_ok());
}

#[test]
fn restore_tolerates_a_deleted_kit() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);
    assign(&h, kit_id, ClientId::new(), 3, ts(2024, 3, 5), None);

    h.kits.remove(&admin(), kit_id).unwrap();

    let deleted = h
        .assignments
        .clear_all_pending(&admin(), ts(2024, 3, 6))
        .unwrap();

    // Deletion proceeds; restoration is skipped without error.
    assert_eq!(deleted, 1);
    assert!(h.assignments.list().is_empty());
}

#[test]
fn idempotency_key_replays_instead_of_double_decrementing() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);
    let client_id = ClientId::new();

    let cmd = CreateAssignment {
        assignment_id: AssignmentId::new(),
        kit_id,
        client_id,
        quantity: 3,
        grade: None,
        notes: None,
        idempotency_key: Some("retry-7c2f".to_string()),
        occurred_at: ts(2024, 3, 5),
    };

    let first = h.assignments.create(&plain_user(), cmd.clone()).unwrap();
    let second = h
        .assignments
        .create(
            &plain_user(),
            CreateAssignment {
                assignment_id: AssignmentId::new(),
                ..cmd
            },
        )
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 7);
    assert_eq!(h.assignments.list().len(), 1);
}

#[test]
fn dispatch_date_bulk_set_respects_month_and_grade_filters() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 100);
    let client_id = ClientId::new();
    let other_client = ClientId::new();

    let march_ungraded = assign(&h, kit_id, client_id, 1, ts(2024, 3, 10), None);
    let march_graded = assign(
        &h,
        kit_id,
        client_id,
        1,
        ts(2024, 3, 12),
        Some(Grade::new(3).unwrap()),
    );
    let april_ungraded = assign(&h, kit_id, client_id, 1, ts(2024, 4, 2), None);
    let other_march = assign(&h, kit_id, other_client, 1, ts(2024, 3, 15), None);

    let affected = h.assignments.set_dispatch_date_for_client_month(
        &plain_user(),
        client_id,
        Month::new(2024, 3).unwrap(),
        ts(2024, 3, 20),
        GradeFilter::Unspecified,
        true,
    );

    assert_eq!(affected, 1);

    let hit = h.assignments.get(march_ungraded).unwrap();
    assert_eq!(hit.status, AssignmentStatus::Dispatched);
    assert_eq!(hit.dispatched_at, Some(ts(2024, 3, 20)));

    for untouched in [march_graded, april_ungraded, other_march] {
        let a = h.assignments.get(untouched).unwrap();
        assert_eq!(a.status, AssignmentStatus::Assigned);
        assert_eq!(a.dispatched_at, None);
    }
}

#[test]
fn dispatch_date_set_with_no_matches_is_a_noop() {
    let h = Harness::new();
    let affected = h.assignments.set_dispatch_date_for_client_month(
        &plain_user(),
        ClientId::new(),
        Month::new(2024, 3).unwrap(),
        ts(2024, 3, 20),
        GradeFilter::Any,
        true,
    );
    assert_eq!(affected, 0);
}

#[test]
fn dispatch_date_clear_reverts_when_asked() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);
    let client_id = ClientId::new();
    let id = assign(&h, kit_id, client_id, 1, ts(2024, 3, 10), None);
    let month = Month::new(2024, 3).unwrap();

    h.assignments.set_dispatch_date_for_client_month(
        &plain_user(),
        client_id,
        month,
        ts(2024, 3, 20),
        GradeFilter::Any,
        true,
    );

    let affected = h.assignments.clear_dispatch_date_for_client_month(
        &plain_user(),
        client_id,
        month,
        GradeFilter::Any,
        true,
        ts(2024, 3, 21),
    );

    assert_eq!(affected, 1);
    let a = h.assignments.get(id).unwrap();
    assert_eq!(a.dispatched_at, None);
    assert_eq!(a.status, AssignmentStatus::Assigned);
}

#[test]
fn dispatch_has_no_stock_effect() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 10);
    let client_id = ClientId::new();
    assign(&h, kit_id, client_id, 4, ts(2024, 3, 10), None);
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 6);

    h.assignments.set_dispatch_date_for_client_month(
        &plain_user(),
        client_id,
        Month::new(2024, 3).unwrap(),
        ts(2024, 3, 20),
        GradeFilter::Any,
        true,
    );

    // Stock was already taken at creation time.
    assert_eq!(h.kits.get(kit_id).unwrap().stock_count, 6);
}

#[test]
fn bulk_clears_are_admin_only() {
    let h = Harness::new();
    let user = plain_user();

    for result in [
        h.assignments.clear_all_pending(&user, ts(2024, 3, 6)),
        h.assignments.clear_all(&user, ts(2024, 3, 6)),
        h.assignments
            .clear_pending_by_kit(&user, KitId::new(), ts(2024, 3, 6))
            .map(|(n, _)| n),
    ] {
        match result {
            Err(DomainError::Unauthorized) => {}
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }
}

#[test]
fn program_deletion_is_guarded_by_referencing_kits() {
    let h = Harness::new();
    let program_id = ProgramId::new();
    h.programs
        .create(
            &admin(),
            CreateProgram {
                program_id,
                name: "Sewing".to_string(),
                slug: "sewing".to_string(),
                categories: vec![],
                occurred_at: ts(2024, 1, 1),
            },
        )
        .unwrap();
    make_kit(&h, 5);

    let err = h.programs.remove(&admin(), program_id).unwrap_err();
    match err {
        DomainError::Conflict(_) => {}
        other => panic!("expected Conflict, got {other:?}"),
    }

    // Unreferenced programs delete cleanly.
    let empty_id = ProgramId::new();
    h.programs
        .create(
            &admin(),
            CreateProgram {
                program_id: empty_id,
                name: "Embroidery".to_string(),
                slug: "embroidery".to_string(),
                categories: vec![],
                occurred_at: ts(2024, 1, 1),
            },
        )
        .unwrap();
    h.programs.remove(&admin(), empty_id).unwrap();
}

#[test]
fn duplicate_program_slug_is_rejected() {
    let h = Harness::new();
    for (id, expect_ok) in [(ProgramId::new(), true), (ProgramId::new(), false)] {
        let result = h.programs.create(
            &admin(),
            CreateProgram {
                program_id: id,
                name: "Sewing".to_string(),
                slug: "sewing".to_string(),
                categories: vec![],
                occurred_at: ts(2024, 1, 1),
            },
        );
        assert_eq!(result.is_ok(), expect_ok);
    }
}

#[test]
fn reporting_folds_tolerate_an_empty_store() {
    let h = Harness::new();
    let summary = h.reports.inventory_summary();
    assert!(summary.kits_by_program.is_empty());
    assert!(summary.inventory_by_category.is_empty());
    assert_eq!(summary.assignments_by_status.assigned, 0);
    assert!(h.reports.low_stock().is_empty());
    assert!(h.reports.client_month_breakdown(ClientId::new()).is_empty());
}

#[test]
fn client_month_breakdown_buckets_by_month_then_grade() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 100);
    let client_id = ClientId::new();

    assign(&h, kit_id, client_id, 2, ts(2024, 3, 5), None);
    assign(
        &h,
        kit_id,
        client_id,
        1,
        ts(2024, 3, 9),
        Some(Grade::new(1).unwrap()),
    );
    assign(
        &h,
        kit_id,
        client_id,
        3,
        ts(2024, 4, 2),
        Some(Grade::new(3).unwrap()),
    );

    let breakdown = h.reports.client_month_breakdown(client_id);
    assert_eq!(breakdown.len(), 2);

    let march = &breakdown[0];
    assert_eq!(march.month, Month::new(2024, 3).unwrap());
    assert_eq!(march.assignment_count, 2);
    assert_eq!(march.total_quantity, 3);
    // Unspecified buckets sort ahead of graded ones.
    assert_eq!(march.grades[0].grade, None);
    assert_eq!(march.grades[1].grade, Some(Grade::new(1).unwrap()));

    let april = &breakdown[1];
    assert_eq!(april.month, Month::new(2024, 4).unwrap());
    assert_eq!(april.total_quantity, 3);
}

#[test]
fn summary_reflects_current_state_on_every_read() {
    let h = Harness::new();
    let kit_id = make_kit(&h, 5);

    let before = h.reports.inventory_summary();
    assert_eq!(before.kits_by_program[0].total_stock, 5);
    assert_eq!(before.assignments_by_status.assigned, 0);

    assign(&h, kit_id, ClientId::new(), 2, ts(2024, 3, 5), None);

    let after = h.reports.inventory_summary();
    assert_eq!(after.kits_by_program[0].total_stock, 3);
    assert_eq!(after.assignments_by_status.assigned, 1);
}
