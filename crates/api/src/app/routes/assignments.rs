use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::Utc;
use serde_json::json;

use kitflow_assignments::{CreateAssignment, Grade, UpdateAssignmentStatus};
use kitflow_core::{AssignmentId, ClientId, KitId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_assignment).get(list_assignments))
        .route("/:id", get(get_assignment).delete(delete_assignment))
        .route("/:id/status", post(update_status))
        .route("/dispatch-month", post(set_dispatch_month))
        .route("/dispatch-month/clear", post(clear_dispatch_month))
        .route("/pending", delete(clear_all_pending))
        .route("/all", delete(clear_all))
        .route("/by-kit/:kit_id/pending", delete(clear_pending_by_kit))
        .route("/by-kit/:kit_id", get(list_by_kit))
}

pub async fn create_assignment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateAssignmentRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "assignments.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let kit_id: KitId = match dto::parse_id(&body.kit_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let client_id: ClientId = match dto::parse_id(&body.client_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let grade = match body.grade.map(Grade::new).transpose() {
        Ok(grade) => grade,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let cmd = CreateAssignment {
        assignment_id: AssignmentId::new(),
        kit_id,
        client_id,
        quantity: body.quantity,
        grade,
        notes: body.notes,
        idempotency_key: body.idempotency_key,
        occurred_at: Utc::now(),
    };

    match services.assignments.create(&caller, cmd) {
        Ok(assignment) => {
            services.publish(
                "assignments.changed",
                json!({"assignment_id": assignment.id, "kit_id": assignment.kit_id}),
            );
            (StatusCode::CREATED, Json(assignment)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_assignments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "assignments.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.assignments.list())).into_response()
}

pub async fn get_assignment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "assignments.read") {
        return resp;
    }
    let assignment_id: AssignmentId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.assignments.get(assignment_id) {
        Ok(assignment) => (StatusCode::OK, Json(assignment)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_by_kit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(kit_id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "assignments.read") {
        return resp;
    }
    let kit_id: KitId = match dto::parse_id(&kit_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    (StatusCode::OK, Json(services.assignments.list_by_kit(kit_id))).into_response()
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "assignments.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let assignment_id: AssignmentId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = UpdateAssignmentStatus {
        assignment_id,
        status: body.status,
        occurred_at: Utc::now(),
    };

    match services.assignments.update_status(&caller, cmd) {
        Ok(assignment) => {
            services.publish(
                "assignments.changed",
                json!({"assignment_id": assignment.id, "status": assignment.status}),
            );
            (StatusCode::OK, Json(assignment)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Bulk-set dispatch dates for a client's calendar month. Zero matches is
/// a successful no-op.
pub async fn set_dispatch_month(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::SetDispatchDateRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "assignments.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let client_id: ClientId = match dto::parse_id(&body.client_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let month = match dto::parse_month(&body.month) {
        Ok(month) => month,
        Err(resp) => return resp,
    };
    let grade_filter = match dto::grade_filter(body.grade) {
        Ok(filter) => filter,
        Err(resp) => return resp,
    };

    let affected = services.assignments.set_dispatch_date_for_client_month(
        &caller,
        client_id,
        month,
        body.dispatched_at,
        grade_filter,
        body.mark_dispatched,
    );

    services.publish("assignments.changed", json!({"client_id": client_id}));
    (StatusCode::OK, Json(json!({"affected": affected}))).into_response()
}

pub async fn clear_dispatch_month(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::ClearDispatchDateRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "assignments.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let client_id: ClientId = match dto::parse_id(&body.client_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let month = match dto::parse_month(&body.month) {
        Ok(month) => month,
        Err(resp) => return resp,
    };
    let grade_filter = match dto::grade_filter(body.grade) {
        Ok(filter) => filter,
        Err(resp) => return resp,
    };

    let affected = services.assignments.clear_dispatch_date_for_client_month(
        &caller,
        client_id,
        month,
        grade_filter,
        body.revert_status,
        Utc::now(),
    );

    services.publish("assignments.changed", json!({"client_id": client_id}));
    (StatusCode::OK, Json(json!({"affected": affected}))).into_response()
}

pub async fn delete_assignment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "assignments.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let assignment_id: AssignmentId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.assignments.remove(&caller, assignment_id, Utc::now()) {
        Ok(()) => {
            services.publish("assignments.changed", json!({"assignment_id": assignment_id}));
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Admin housekeeping: delete every non-dispatched assignment and restore
/// kit stock for each.
pub async fn clear_all_pending(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "assignments.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.assignments.clear_all_pending(&caller, Utc::now()) {
        Ok(deleted) => {
            services.publish("assignments.changed", json!({"cleared": deleted}));
            (StatusCode::OK, Json(json!({"deleted": deleted}))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Admin housekeeping: delete every assignment; stock is restored only for
/// the non-dispatched ones.
pub async fn clear_all(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "assignments.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.assignments.clear_all(&caller, Utc::now()) {
        Ok(deleted) => {
            services.publish("assignments.changed", json!({"cleared": deleted}));
            (StatusCode::OK, Json(json!({"deleted": deleted}))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn clear_pending_by_kit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(kit_id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "assignments.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let kit_id: KitId = match dto::parse_id(&kit_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services
        .assignments
        .clear_pending_by_kit(&caller, kit_id, Utc::now())
    {
        Ok((deleted, restored)) => {
            services.publish("assignments.changed", json!({"kit_id": kit_id}));
            (
                StatusCode::OK,
                Json(json!({"deleted": deleted, "restored": restored})),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
