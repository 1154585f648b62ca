//! `kitflow-parties` — directory records: clients, vendors, service providers.
//!
//! These are reference entities with no lifecycle coupling to anything else;
//! assignments point at clients, nothing points back.

pub mod client;
pub mod contact;
pub mod service_provider;
pub mod vendor;

pub use client::{Client, ClientKind, CreateClient, UpdateClient};
pub use contact::ContactInfo;
pub use service_provider::{CreateServiceProvider, ServiceProvider, UpdateServiceProvider};
pub use vendor::{CreateVendor, UpdateVendor, Vendor};
