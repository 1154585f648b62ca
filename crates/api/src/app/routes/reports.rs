use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use kitflow_core::ClientId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/summary", get(summary))
        .route("/low-stock", get(low_stock))
        .route("/clients/:id/months", get(client_months))
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "reports.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.reports.inventory_summary())).into_response()
}

pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "reports.read") {
        return resp;
    }
    (StatusCode::OK, Json(services.reports.low_stock())).into_response()
}

pub async fn client_months(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "reports.read") {
        return resp;
    }
    let client_id: ClientId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let buckets = services.reports.client_month_breakdown(client_id);
    let body: Vec<_> = buckets
        .into_iter()
        .map(|bucket| {
            json!({
                "month": bucket.month.to_string(),
                "assignment_count": bucket.assignment_count,
                "total_quantity": bucket.total_quantity,
                "grades": bucket.grades,
            })
        })
        .collect();

    (StatusCode::OK, Json(body)).into_response()
}
