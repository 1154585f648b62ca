use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use kitflow_assignments::{AssignmentStatus, Grade, Month};
use kitflow_core::ClientId;
use kitflow_inventory::ItemCategory;
use kitflow_kits::Kit;

use crate::datastore::Datastore;

/// Kit totals for one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramTotals {
    pub program: String,
    pub kit_count: u64,
    pub total_stock: i64,
}

/// Assignment counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub assigned: u64,
    pub packed: u64,
    pub dispatched: u64,
}

/// Inventory totals for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub category: ItemCategory,
    pub item_count: u64,
    pub total_quantity: i64,
}

/// The whole-store rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub kits_by_program: Vec<ProgramTotals>,
    pub assignments_by_status: StatusCounts,
    pub inventory_by_category: Vec<CategoryTotals>,
}

/// One grade bucket inside a month (grade `None` = unspecified).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeBucket {
    pub grade: Option<Grade>,
    pub assignment_count: u64,
    pub total_quantity: i64,
}

/// One calendar month of a client's assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientMonthBucket {
    pub month: Month,
    pub assignment_count: u64,
    pub total_quantity: i64,
    pub grades: Vec<GradeBucket>,
}

/// Read-only derived views, recomputed from current store state on every
/// call — no persisted cache, no incremental maintenance. Empty
/// collections fold to zeros and empty lists, never errors.
#[derive(Clone)]
pub struct ReportingService {
    store: Arc<Datastore>,
}

impl ReportingService {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    /// Counts and totals by program, assignment status, and inventory
    /// category.
    pub fn inventory_summary(&self) -> InventorySummary {
        let state = self.store.read();

        let mut by_program: BTreeMap<String, (u64, i64)> = BTreeMap::new();
        for kit in state.kits.values() {
            let entry = by_program.entry(kit.program.clone()).or_default();
            entry.0 += 1;
            entry.1 += kit.stock_count;
        }

        let mut statuses = StatusCounts::default();
        for assignment in state.assignments.values() {
            match assignment.status {
                AssignmentStatus::Assigned => statuses.assigned += 1,
                AssignmentStatus::Packed => statuses.packed += 1,
                AssignmentStatus::Dispatched => statuses.dispatched += 1,
            }
        }

        let mut by_category: BTreeMap<&'static str, (ItemCategory, u64, i64)> = BTreeMap::new();
        for item in state.inventory.values() {
            let entry = by_category
                .entry(item.category.as_str())
                .or_insert((item.category, 0, 0));
            entry.1 += 1;
            entry.2 += item.quantity;
        }

        InventorySummary {
            kits_by_program: by_program
                .into_iter()
                .map(|(program, (kit_count, total_stock))| ProgramTotals {
                    program,
                    kit_count,
                    total_stock,
                })
                .collect(),
            assignments_by_status: statuses,
            inventory_by_category: by_category
                .into_values()
                .map(|(category, item_count, total_quantity)| CategoryTotals {
                    category,
                    item_count,
                    total_quantity,
                })
                .collect(),
        }
    }

    /// Kits at or under their low-stock threshold, most depleted first.
    pub fn low_stock(&self) -> Vec<Kit> {
        let mut kits: Vec<Kit> = self
            .store
            .read()
            .kits
            .values()
            .filter(|k| k.is_low_stock())
            .cloned()
            .collect();
        kits.sort_by(|a, b| a.stock_count.cmp(&b.stock_count));
        kits
    }

    /// A client's assignments bucketed by calendar month of `assigned_at`,
    /// sub-bucketed by grade 1–10 plus unspecified.
    pub fn client_month_breakdown(&self, client_id: ClientId) -> Vec<ClientMonthBucket> {
        let state = self.store.read();

        let mut months: BTreeMap<Month, BTreeMap<Option<Grade>, (u64, i64)>> = BTreeMap::new();
        for assignment in state.assignments.values() {
            if assignment.client_id != client_id {
                continue;
            }
            let month = Month::of(assignment.assigned_at);
            let grades = months.entry(month).or_default();
            let entry = grades.entry(assignment.grade).or_default();
            entry.0 += 1;
            entry.1 += assignment.quantity;
        }

        months
            .into_iter()
            .map(|(month, grades)| {
                let mut assignment_count = 0;
                let mut total_quantity = 0;
                let grades: Vec<GradeBucket> = grades
                    .into_iter()
                    .map(|(grade, (count, quantity))| {
                        assignment_count += count;
                        total_quantity += quantity;
                        GradeBucket {
                            grade,
                            assignment_count: count,
                            total_quantity: quantity,
                        }
                    })
                    .collect();

                ClientMonthBucket {
                    month,
                    assignment_count,
                    total_quantity,
                    grades,
                }
            })
            .collect()
    }
}
