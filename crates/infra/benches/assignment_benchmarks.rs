//! Benchmarks for the reservation lifecycle and reporting folds.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use kitflow_assignments::CreateAssignment;
use kitflow_auth::{Permission, Principal, PrincipalId, Role};
use kitflow_core::{AssignmentId, ClientId, KitId};
use kitflow_infra::{AssignmentService, Datastore, KitService, ReportingService};
use kitflow_kits::{CreateKit, PackingData};

fn admin() -> Principal {
    Principal::new(
        PrincipalId::new(),
        vec![Role::admin()],
        vec![Permission::new("*")],
    )
}

fn seeded_store(kit_count: usize, stock_per_kit: i64) -> (Arc<Datastore>, Vec<KitId>) {
    let store = Arc::new(Datastore::new());
    let kits = KitService::new(store.clone());
    let caller = admin();
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let ids: Vec<KitId> = (0..kit_count)
        .map(|i| {
            let kit_id = KitId::new();
            kits.create(
                &caller,
                CreateKit {
                    kit_id,
                    name: format!("Kit {i}"),
                    program: format!("program-{}", i % 7),
                    variant: None,
                    stock_count: stock_per_kit,
                    low_stock_threshold: 5,
                    packing: PackingData::Legacy("thread, needles".to_string()),
                    remarks: None,
                    image: None,
                    occurred_at: now,
                },
            )
            .unwrap();
            kit_id
        })
        .collect();

    (store, ids)
}

fn bench_assignment_create(c: &mut Criterion) {
    let caller = admin();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    c.bench_function("assignment_create", |b| {
        let (store, kit_ids) = seeded_store(100, i64::MAX / 2);
        let assignments = AssignmentService::new(store);
        let mut i = 0usize;
        b.iter(|| {
            let kit_id = kit_ids[i % kit_ids.len()];
            i += 1;
            let created = assignments
                .create(
                    &caller,
                    CreateAssignment {
                        assignment_id: AssignmentId::new(),
                        kit_id,
                        client_id: ClientId::new(),
                        quantity: 1,
                        grade: None,
                        notes: None,
                        idempotency_key: None,
                        occurred_at: now,
                    },
                )
                .unwrap();
            black_box(created);
        });
    });
}

fn bench_clear_all_pending(c: &mut Criterion) {
    let caller = admin();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    c.bench_function("clear_all_pending_1000", |b| {
        b.iter_batched(
            || {
                let (store, kit_ids) = seeded_store(50, 1_000_000);
                let assignments = AssignmentService::new(store);
                for i in 0..1000 {
                    assignments
                        .create(
                            &caller,
                            CreateAssignment {
                                assignment_id: AssignmentId::new(),
                                kit_id: kit_ids[i % kit_ids.len()],
                                client_id: ClientId::new(),
                                quantity: 1,
                                grade: None,
                                notes: None,
                                idempotency_key: None,
                                occurred_at: now,
                            },
                        )
                        .unwrap();
                }
                assignments
            },
            |assignments| {
                let deleted = assignments.clear_all_pending(&caller, now).unwrap();
                black_box(deleted);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_inventory_summary(c: &mut Criterion) {
    let caller = admin();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    let (store, kit_ids) = seeded_store(500, 1_000_000);
    let assignments = AssignmentService::new(store.clone());
    for i in 0..2000 {
        assignments
            .create(
                &caller,
                CreateAssignment {
                    assignment_id: AssignmentId::new(),
                    kit_id: kit_ids[i % kit_ids.len()],
                    client_id: ClientId::new(),
                    quantity: 1,
                    grade: None,
                    notes: None,
                    idempotency_key: None,
                    occurred_at: now,
                },
            )
            .unwrap();
    }
    let reports = ReportingService::new(store);

    c.bench_function("inventory_summary_500_kits", |b| {
        b.iter(|| black_box(reports.inventory_summary()));
    });
}

criterion_group!(
    benches,
    bench_assignment_create,
    bench_clear_all_pending,
    bench_inventory_summary
);
criterion_main!(benches);
