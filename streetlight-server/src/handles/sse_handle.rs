use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use axum::{Router, middleware};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

use crate::middlewares::{TokenState, auth};
use crate::services::RefreshService;

#[derive(Clone)]
pub struct SSEState {
    pub refresh_service: Arc<RefreshService>,
}

pub fn sse_router(sse_state: SSEState, token_state: TokenState) -> Router {
    Router::new()
        .route("/api/events", get(sse_handler))
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(sse_state)
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "streetlight",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Stream of `snapshot` events, one per refresh cycle"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn sse_handler(
    State(state): State<SSEState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.refresh_service.subscribe();

    let stream = WatchStream::new(receiver).filter_map(|view| {
        match Event::default().event("snapshot").json_data(view.to_response()) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::error!("failed to encode snapshot event: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
