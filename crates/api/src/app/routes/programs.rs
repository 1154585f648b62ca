use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;

use kitflow_core::ProgramId;
use kitflow_kits::{CreateProgram, UpdateProgram};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_program).get(list_programs))
        .route(
            "/:id",
            axum::routing::get(get_program)
                .put(update_program)
                .delete(delete_program),
        )
}

pub async fn create_program(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateProgramRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "programs.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let cmd = CreateProgram {
        program_id: ProgramId::new(),
        name: body.name,
        slug: body.slug,
        categories: body.categories,
        occurred_at: Utc::now(),
    };

    match services.programs.create(&caller, cmd) {
        Ok(program) => (StatusCode::CREATED, Json(program)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_programs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "programs.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.programs.list())).into_response()
}

pub async fn get_program(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "programs.read") {
        return resp;
    }
    let program_id: ProgramId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.programs.get(program_id) {
        Ok(program) => (StatusCode::OK, Json(program)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_program(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProgramRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "programs.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let program_id: ProgramId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = UpdateProgram {
        name: body.name,
        categories: body.categories,
        occurred_at: Utc::now(),
    };

    match services.programs.update(&caller, program_id, cmd) {
        Ok(program) => (StatusCode::OK, Json(program)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Refuses with a conflict while any kit still references the slug.
pub async fn delete_program(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "programs.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let program_id: ProgramId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.programs.remove(&caller, program_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
