use std::sync::Arc;

use tokio::sync::broadcast;

use kitflow_ai::ChatRelay;
use kitflow_infra::ai::AnthropicChatProvider;
use kitflow_infra::{
    AssignmentService, BlobStore, Datastore, DirectoryService, InMemoryBlobStore, InMemoryMailer,
    InventoryService, KitService, Mailer, ProgramService, ReportingService, SmtpMailer,
};

/// Process configuration, read from the environment by `main.rs`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub chat_api_key: Option<String>,
    pub chat_base_url: Option<String>,
    pub smtp_url: Option<String>,
    pub mail_from: String,
}

impl AppConfig {
    /// Dev/test config: shared secret, no outbound collaborators.
    pub fn dev(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            chat_api_key: None,
            chat_base_url: None,
            smtp_url: None,
            mail_from: "kitflow <no-reply@kitflow.invalid>".to_string(),
        }
    }
}

/// Realtime message broadcast to SSE subscribers on record mutations.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Everything the route handlers need, wired once at startup.
pub struct AppServices {
    pub kits: KitService,
    pub programs: ProgramService,
    pub directory: DirectoryService,
    pub inventory: InventoryService,
    pub assignments: AssignmentService,
    pub reports: ReportingService,
    pub store: Arc<Datastore>,
    pub blob: Arc<dyn BlobStore>,
    pub mailer: Arc<dyn Mailer>,
    pub chat: ChatRelay<AnthropicChatProvider>,
    pub realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    /// Broadcast a change notification (lossy; no backpressure on the core).
    pub fn publish(&self, topic: &str, payload: serde_json::Value) {
        let _ = self.realtime_tx.send(RealtimeMessage {
            topic: topic.to_string(),
            payload,
        });
    }
}

pub fn build_services(config: &AppConfig) -> AppServices {
    let store = Arc::new(Datastore::new());

    let mailer: Arc<dyn Mailer> = match &config.smtp_url {
        Some(url) => match SmtpMailer::from_url(url, &config.mail_from) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                tracing::warn!("SMTP misconfigured ({e}); falling back to in-memory mailer");
                Arc::new(InMemoryMailer::new())
            }
        },
        None => Arc::new(InMemoryMailer::new()),
    };

    let mut provider = AnthropicChatProvider::new(config.chat_api_key.clone());
    if let Some(base_url) = &config.chat_base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    let (realtime_tx, _) = broadcast::channel(256);

    AppServices {
        kits: KitService::new(store.clone()),
        programs: ProgramService::new(store.clone()),
        directory: DirectoryService::new(store.clone()),
        inventory: InventoryService::new(store.clone()),
        assignments: AssignmentService::new(store.clone()),
        reports: ReportingService::new(store.clone()),
        store,
        blob: Arc::new(InMemoryBlobStore::default()),
        mailer,
        chat: ChatRelay::new(provider),
        realtime_tx,
    }
}
