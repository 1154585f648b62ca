use std::sync::Arc;

use axum::{
    Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::post,
};
use serde_json::json;

use kitflow_infra::ai::chat_context;

use crate::app::dto;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/", post(ask))
}

/// Forward a message to the assistant with a snapshot of current state.
/// Provider failures never surface: the relay answers with its fixed
/// apology instead.
pub async fn ask(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::ChatRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "chat.use") {
        return resp;
    }

    let context = chat_context(&services.store);
    let reply = services.chat.ask(&context, &body.message).await;

    (StatusCode::OK, Json(json!({"reply": reply}))).into_response()
}
