//! `kitflow-kits` — kit records, packing data, and the program registry.
//!
//! A kit is a fulfillable product bundle: a name, a program slug, a stock
//! count, and packing requirements (either a legacy comma-separated material
//! list or structured pouches). Packing data is a denormalized snapshot of
//! intended contents chosen at authoring time — it is deliberately NOT a
//! live reference into the inventory collection.

pub mod kit;
pub mod program;

pub use kit::{
    CopyKit, CreateKit, Kit, KitStatus, Material, PackingData, Pouch, UpdateKit, derive_status,
};
pub use program::{CreateProgram, Program, UpdateProgram, validate_slug};
