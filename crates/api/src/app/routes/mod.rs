use axum::Router;
use axum::routing::{get, post};

pub mod assignments;
pub mod chat;
pub mod clients;
pub mod events;
pub mod files;
pub mod inventory;
pub mod kits;
pub mod programs;
pub mod providers;
pub mod reports;
pub mod system;
pub mod vendors;

/// All protected routes (auth middleware is layered on by `build_app`).
pub fn router() -> Router {
    Router::new()
        .nest("/kits", kits::router())
        .nest("/programs", programs::router())
        .nest("/clients", clients::router())
        .nest("/vendors", vendors::router())
        .nest("/providers", providers::router())
        .nest("/inventory", inventory::router())
        .nest("/assignments", assignments::router())
        .nest("/reports", reports::router())
        .nest("/chat", chat::router())
        .nest("/files", files::router())
        .route("/events", get(events::stream))
        .route("/whoami", get(system::whoami))
        .route("/auth/code", post(system::send_code))
}
