use kitflow_api::app::{AppConfig, build_app};

#[tokio::main]
async fn main() {
    kitflow_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let config = AppConfig {
        jwt_secret,
        chat_api_key: std::env::var("CHAT_API_KEY").ok(),
        chat_base_url: std::env::var("CHAT_BASE_URL").ok(),
        smtp_url: std::env::var("SMTP_URL").ok(),
        mail_from: std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "kitflow <no-reply@kitflow.invalid>".to_string()),
    };

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let app = build_app(config).await;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    match listener.local_addr() {
        Ok(addr) => tracing::info!("listening on {addr}"),
        Err(e) => tracing::warn!("listening (local_addr unavailable: {e})"),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server exited with error: {e}");
    }
}
