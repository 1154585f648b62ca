//! Store services: one public method per exposed datastore operation.
//!
//! Every mutating method takes the resolved caller so admin-only
//! operations can be checked at the same boundary that owns the
//! transaction. Reads are identity-checked upstream (all HTTP routes sit
//! behind the auth middleware).

mod assignments;
mod directory;
mod inventory;
mod kits;
mod programs;
mod reports;

pub use assignments::AssignmentService;
pub use directory::DirectoryService;
pub use inventory::InventoryService;
pub use kits::KitService;
pub use programs::ProgramService;
pub use reports::{
    CategoryTotals, ClientMonthBucket, GradeBucket, InventorySummary, ProgramTotals,
    ReportingService, StatusCounts,
};

use kitflow_auth::{Principal, require_admin};
use kitflow_core::{DomainError, DomainResult};

/// Admin gate shared by deletions and bulk clears.
fn ensure_admin(caller: &Principal) -> DomainResult<()> {
    require_admin(caller).map_err(|_| DomainError::Unauthorized)
}
