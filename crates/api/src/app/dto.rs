//! Request DTOs and JSON mapping helpers.
//!
//! Records serialize straight from their domain types; the structs here
//! only shape *incoming* payloads into typed commands.

use core::str::FromStr;

use axum::http::StatusCode;
use serde::Deserialize;

use kitflow_assignments::{AssignmentStatus, Grade, GradeFilter, Month};
use kitflow_core::DomainError;
use kitflow_inventory::ItemCategory;
use kitflow_kits::PackingData;
use kitflow_parties::{ClientKind, ContactInfo};

use crate::app::errors;

/// Parse a typed id out of a path segment, mapping failure to a 400.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>()
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}

/// Parse a `"YYYY-MM"` month, mapping failure to a 400.
pub fn parse_month(raw: &str) -> Result<Month, axum::response::Response> {
    raw.parse::<Month>()
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_month", e.to_string()))
}

// ── kits ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateKitRequest {
    pub name: String,
    pub program: String,
    pub variant: Option<String>,
    #[serde(default)]
    pub stock_count: i64,
    #[serde(default)]
    pub low_stock_threshold: i64,
    pub packing: Option<PackingData>,
    pub remarks: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateKitRequest {
    pub name: Option<String>,
    pub program: Option<String>,
    pub variant: Option<String>,
    pub stock_count: Option<i64>,
    pub low_stock_threshold: Option<i64>,
    pub packing: Option<PackingData>,
    pub remarks: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CopyKitRequest {
    pub new_program: String,
    pub new_name: Option<String>,
}

// ── programs ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateProgramRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub categories: Option<Vec<String>>,
}

// ── directory ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub organization: Option<String>,
    pub kind: ClientKind,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub kind: Option<ClientKind>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    pub name: String,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVendorRequest {
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProviderRequest {
    pub name: String,
    pub service: Option<String>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProviderRequest {
    pub name: Option<String>,
    pub service: Option<String>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
}

// ── inventory ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateInventoryItemRequest {
    pub name: String,
    pub category: ItemCategory,
    pub subcategory: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInventoryItemRequest {
    pub name: Option<String>,
    pub subcategory: Option<String>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddCategoryRequest {
    pub category: ItemCategory,
    pub value: String,
}

// ── assignments ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub kit_id: String,
    pub client_id: String,
    pub quantity: i64,
    pub grade: Option<u8>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AssignmentStatus,
}

/// Grade selector for bulk month operations: a number 1-10 for an exact
/// grade, or the keyword `"unspecified"`. Absent means "any grade".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GradeSelector {
    Number(u8),
    Keyword(String),
}

pub fn grade_filter(selector: Option<GradeSelector>) -> Result<GradeFilter, axum::response::Response> {
    match selector {
        None => Ok(GradeFilter::Any),
        Some(GradeSelector::Number(n)) => Grade::new(n)
            .map(GradeFilter::Exact)
            .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_grade", e.to_string())),
        Some(GradeSelector::Keyword(word)) if word == "unspecified" => Ok(GradeFilter::Unspecified),
        Some(GradeSelector::Keyword(word)) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_grade",
            format!("expected a grade 1-10 or \"unspecified\", got {word:?}"),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetDispatchDateRequest {
    pub client_id: String,
    /// Calendar month as `"YYYY-MM"`.
    pub month: String,
    pub dispatched_at: chrono::DateTime<chrono::Utc>,
    pub grade: Option<GradeSelector>,
    /// Also advance status to `dispatched` (default true).
    #[serde(default = "default_true")]
    pub mark_dispatched: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClearDispatchDateRequest {
    pub client_id: String,
    pub month: String,
    pub grade: Option<GradeSelector>,
    /// Also revert status from `dispatched` back to `assigned`.
    #[serde(default)]
    pub revert_status: bool,
}

fn default_true() -> bool {
    true
}

// ── collaborators ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
    pub code: String,
}
