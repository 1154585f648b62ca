use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use kitflow_core::ClientId;
use kitflow_parties::{CreateClient, UpdateClient};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/:id/assignments", get(client_assignments))
}

pub async fn create_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateClientRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let cmd = CreateClient {
        client_id: ClientId::new(),
        name: body.name,
        organization: body.organization,
        kind: body.kind,
        contact: body.contact,
        notes: body.notes,
        occurred_at: Utc::now(),
    };

    match services.directory.create_client(&caller, cmd) {
        Ok(client) => (StatusCode::CREATED, Json(client)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "directory.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.directory.list_clients())).into_response()
}

pub async fn get_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "directory.read") {
        return resp;
    }
    let client_id: ClientId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.directory.get_client(client_id) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateClientRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let client_id: ClientId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = UpdateClient {
        name: body.name,
        organization: body.organization,
        kind: body.kind,
        contact: body.contact,
        notes: body.notes,
        occurred_at: Utc::now(),
    };

    match services.directory.update_client(&caller, client_id, cmd) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "directory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let client_id: ClientId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.directory.remove_client(&caller, client_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn client_assignments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "assignments.read") {
        return resp;
    }
    let client_id: ClientId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    (
        StatusCode::OK,
        Json(services.assignments.list_by_client(client_id)),
    )
        .into_response()
}
