use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

use crate::app::services::AppServices;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "principal_id": principal.principal_id().to_string(),
            "roles": principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

/// Relay a one-time sign-in code through the email collaborator. Failures
/// are hard errors — the caller must know the code never went out.
pub async fn send_code(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::SendCodeRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "*") {
        return resp;
    }

    match services
        .mailer
        .send_one_time_code(&body.email, &body.code)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::mail_error_to_response(e),
    }
}
