use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    server::{app_state::AppState, error::ServerError},
    session::models::SessionId,
};

pub static SESSION_HEADER: &str = "X-Session-Id";

pub async fn session_mw(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(header) = extract_header(SESSION_HEADER, req.headers()) else {
        return Err(ServerError::UnknownSession);
    };

    let session_id = to_uuid(header)?;
    if !state.get_sessions().contains(&session_id) {
        debug!("Request with unknown session {}", session_id);
        return Err(ServerError::UnknownSession);
    }

    req.extensions_mut().insert(SessionId(session_id));
    Ok(next.run(req).await)
}

fn to_uuid(value: String) -> Result<Uuid, ServerError> {
    value.parse().map_err(|_| {
        ServerError::Api(
            StatusCode::UNAUTHORIZED,
            "Session id is invalid format".into(),
        )
    })
}

pub fn extract_header(key: &str, header_map: &HeaderMap) -> Option<String> {
    header_map
        .get(key)
        .and_then(|header| header.to_str().ok())
        .map(|s| s.to_owned())
}
