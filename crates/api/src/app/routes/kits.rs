use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;

use kitflow_core::KitId;
use kitflow_kits::{CopyKit, CreateKit, PackingData, UpdateKit};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_kit).get(list_kits))
        .route("/low-stock", get(low_stock))
        .route("/:id", get(get_kit).put(update_kit).delete(delete_kit))
        .route("/:id/copy", post(copy_kit))
}

pub async fn create_kit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateKitRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "kits.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let cmd = CreateKit {
        kit_id: KitId::new(),
        name: body.name,
        program: body.program,
        variant: body.variant,
        stock_count: body.stock_count,
        low_stock_threshold: body.low_stock_threshold,
        packing: body.packing.unwrap_or_else(PackingData::empty),
        remarks: body.remarks,
        image: body.image,
        occurred_at: Utc::now(),
    };

    match services.kits.create(&caller, cmd) {
        Ok(kit) => {
            services.publish("kits.changed", json!({"kit_id": kit.id}));
            (StatusCode::CREATED, Json(kit)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_kits(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "kits.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.kits.list())).into_response()
}

pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "kits.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.kits.low_stock())).into_response()
}

pub async fn get_kit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "kits.read") {
        return resp;
    }
    let kit_id: KitId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.kits.get(kit_id) {
        Ok(kit) => (StatusCode::OK, Json(kit)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_kit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateKitRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "kits.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let kit_id: KitId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = UpdateKit {
        name: body.name,
        program: body.program,
        variant: body.variant,
        stock_count: body.stock_count,
        low_stock_threshold: body.low_stock_threshold,
        packing: body.packing,
        remarks: body.remarks,
        image: body.image,
        occurred_at: Utc::now(),
    };

    match services.kits.update(&caller, kit_id, cmd) {
        Ok(kit) => {
            services.publish("kits.changed", json!({"kit_id": kit.id}));
            (StatusCode::OK, Json(kit)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_kit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "kits.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let kit_id: KitId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.kits.remove(&caller, kit_id) {
        Ok(()) => {
            services.publish("kits.changed", json!({"kit_id": kit_id}));
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn copy_kit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CopyKitRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "kits.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let source: KitId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = CopyKit {
        new_kit_id: KitId::new(),
        new_program: body.new_program,
        new_name: body.new_name,
        occurred_at: Utc::now(),
    };

    match services.kits.copy(&caller, source, cmd) {
        Ok(kit) => {
            services.publish("kits.changed", json!({"kit_id": kit.id}));
            (StatusCode::CREATED, Json(kit)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
