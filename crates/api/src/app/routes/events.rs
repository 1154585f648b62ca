use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::Extension;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::app::services::AppServices;

/// SSE change feed: one event per record mutation (lossy broadcast, no
/// backpressure on the store).
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|msg| {
        let msg = msg.ok()?;
        let data = serde_json::to_string(&msg).ok()?;
        Some(Ok(SseEvent::default().event(msg.topic.clone()).data(data)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
