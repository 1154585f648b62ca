use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use kitflow_core::ServiceProviderId;
use kitflow_parties::{CreateServiceProvider, UpdateServiceProvider};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_provider).get(list_providers))
        .route(
            "/:id",
            get(get_provider).put(update_provider).delete(delete_provider),
        )
}

pub async fn create_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateProviderRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let cmd = CreateServiceProvider {
        provider_id: ServiceProviderId::new(),
        name: body.name,
        service: body.service,
        contact: body.contact,
        notes: body.notes,
        occurred_at: Utc::now(),
    };

    match services.directory.create_provider(&caller, cmd) {
        Ok(provider) => (StatusCode::CREATED, Json(provider)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_providers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "directory.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.directory.list_providers())).into_response()
}

pub async fn get_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "directory.read") {
        return resp;
    }
    let provider_id: ServiceProviderId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.directory.get_provider(provider_id) {
        Ok(provider) => (StatusCode::OK, Json(provider)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProviderRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let provider_id: ServiceProviderId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = UpdateServiceProvider {
        name: body.name,
        service: body.service,
        contact: body.contact,
        notes: body.notes,
        occurred_at: Utc::now(),
    };

    match services.directory.update_provider(&caller, provider_id, cmd) {
        Ok(provider) => (StatusCode::OK, Json(provider)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let provider_id: ServiceProviderId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.directory.remove_provider(&caller, provider_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
