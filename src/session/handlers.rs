use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};

use crate::{
    server::{app_state::AppState, error::ServerError},
    session::models::CreateSessionResponse,
};

pub fn session_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create_session))
        .with_state(state)
}

async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let session_id = state.get_sessions().create();
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}
