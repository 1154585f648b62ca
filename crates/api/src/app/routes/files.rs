use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/upload-url", post(upload_url))
        .route("/:storage_id/url", get(file_url))
}

/// Mint a direct-upload URL. The record layer only ever stores the
/// returned `storage_id`.
pub async fn upload_url(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "files.write") {
        return resp;
    }

    let ticket = services.blob.generate_upload_url();
    (StatusCode::OK, Json(ticket)).into_response()
}

pub async fn file_url(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(storage_id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "kits.read") {
        return resp;
    }

    match services.blob.get_url(&storage_id) {
        Some(url) => (StatusCode::OK, Json(json!({"url": url}))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "unknown storage id"),
    }
}
