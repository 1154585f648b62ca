//! `kitflow-infra` — the record store and the services over it.
//!
//! The hosted datastore this system is deployed against executes each
//! exposed operation as one atomic, serializable unit. [`Datastore`] models
//! that guarantee in-process: all collections live behind a single lock and
//! every service operation acquires it exactly once, so an assignment
//! create (insert + kit stock decrement) is one logical transaction and a
//! bulk clear cannot interleave with concurrent writers.

pub mod ai;
pub mod blob;
pub mod datastore;
pub mod email;
pub mod services;

#[cfg(test)]
mod integration_tests;

pub use blob::{BlobStore, InMemoryBlobStore, UploadTicket};
pub use datastore::Datastore;
pub use email::{InMemoryMailer, MailError, Mailer, SmtpMailer};
pub use services::{
    AssignmentService, ClientMonthBucket, DirectoryService, GradeBucket, InventoryService,
    InventorySummary, KitService, ProgramService, ReportingService,
};
