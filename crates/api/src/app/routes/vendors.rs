use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use kitflow_core::VendorId;
use kitflow_parties::{CreateVendor, UpdateVendor};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_vendor).get(list_vendors))
        .route(
            "/:id",
            get(get_vendor).put(update_vendor).delete(delete_vendor),
        )
}

pub async fn create_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateVendorRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let cmd = CreateVendor {
        vendor_id: VendorId::new(),
        name: body.name,
        contact: body.contact,
        notes: body.notes,
        occurred_at: Utc::now(),
    };

    match services.directory.create_vendor(&caller, cmd) {
        Ok(vendor) => (StatusCode::CREATED, Json(vendor)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_vendors(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "directory.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.directory.list_vendors())).into_response()
}

pub async fn get_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "directory.read") {
        return resp;
    }
    let vendor_id: VendorId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.directory.get_vendor(vendor_id) {
        Ok(vendor) => (StatusCode::OK, Json(vendor)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateVendorRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let vendor_id: VendorId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = UpdateVendor {
        name: body.name,
        contact: body.contact,
        notes: body.notes,
        occurred_at: Utc::now(),
    };

    match services.directory.update_vendor(&caller, vendor_id, cmd) {
        Ok(vendor) => (StatusCode::OK, Json(vendor)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let vendor_id: VendorId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.directory.remove_vendor(&caller, vendor_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
