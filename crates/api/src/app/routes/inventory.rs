use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;

use kitflow_core::InventoryItemId;
use kitflow_inventory::{
    AdjustQuantity, CategoryEntryId, CreateInventoryItem, InventoryCategory, ItemCategory,
    UpdateInventoryItem,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/items", post(create_item).get(list_items))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/items/:id/adjust", post(adjust_quantity))
        .route("/categories", post(add_category).get(list_categories))
        .route("/categories/:id", axum::routing::delete(delete_category))
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<ItemCategory>,
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateInventoryItemRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "inventory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let cmd = CreateInventoryItem {
        item_id: InventoryItemId::new(),
        name: body.name,
        category: body.category,
        subcategory: body.subcategory,
        unit: body.unit,
        quantity: body.quantity,
        notes: body.notes,
        occurred_at: Utc::now(),
    };

    match services.inventory.create(&caller, cmd) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<CategoryQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "inventory.read") {
        return resp;
    }
    let items = match query.category {
        Some(category) => services.inventory.list_by_category(category),
        None => services.inventory.list(),
    };
    (StatusCode::OK, Json(items)).into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "inventory.read") {
        return resp;
    }
    let item_id: InventoryItemId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.inventory.get(item_id) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateInventoryItemRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "inventory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let item_id: InventoryItemId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = UpdateInventoryItem {
        name: body.name,
        subcategory: body.subcategory,
        unit: body.unit,
        notes: body.notes,
        occurred_at: Utc::now(),
    };

    match services.inventory.update(&caller, item_id, cmd) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn adjust_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustQuantityRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "inventory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let item_id: InventoryItemId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = AdjustQuantity {
        item_id,
        delta: body.delta,
        occurred_at: Utc::now(),
    };

    match services.inventory.adjust_quantity(&caller, cmd) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "inventory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let item_id: InventoryItemId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.inventory.remove(&caller, item_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn add_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::AddCategoryRequest>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "inventory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let entry = match InventoryCategory::create(
        CategoryEntryId::new(),
        body.category,
        body.value,
        Utc::now(),
    ) {
        Ok(entry) => entry,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.inventory.add_category(&caller, entry) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<CategoryQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, "inventory.read") {
        return resp;
    }
    (
        StatusCode::OK,
        Json(services.inventory.list_categories(query.category)),
    )
        .into_response()
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let caller = match authz::require(&principal, "inventory.write") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let entry_id: CategoryEntryId = match dto::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.inventory.remove_category(&caller, entry_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
