use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::error;

use crate::server::{app_state::AppState, error::ServerError};

pub fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/detailed", get(health_detailed))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    "OK".into_response()
}

async fn health_detailed(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let platform = true;

    let (store_status, questions) = match state.get_store().count().await {
        Ok(count) => (true, count),
        Err(e) => {
            error!("Failed question store health check: {}", e);
            (false, 0)
        }
    };

    let json = json!({
        "platform": platform,
        "store": store_status,
        "questions": questions,
        "remote_storage": state.get_media().is_remote(),
        "sessions": state.get_sessions().len(),
    });

    Ok((StatusCode::OK, Json(json)))
}
