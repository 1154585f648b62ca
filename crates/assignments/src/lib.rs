//! `kitflow-assignments` — reservations of kit stock for clients.
//!
//! An assignment reserves N units of a kit at creation time (the kit's stock
//! is decremented exactly once, then) and walks `assigned → packed →
//! dispatched`. Deleting a non-dispatched assignment must hand its quantity
//! back to the kit exactly once; dispatched units have physically left
//! inventory and are never restored.

pub mod assignment;
pub mod month;

pub use assignment::{
    Assignment, AssignmentStatus, CreateAssignment, Grade, GradeFilter, UpdateAssignmentStatus,
};
pub use month::Month;
