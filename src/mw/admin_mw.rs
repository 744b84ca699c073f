use std::sync::Arc;

use axum::{
    Extension,
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    admin::models::AdminError,
    server::{app_state::AppState, error::ServerError},
    session::models::SessionId,
};

/// Lets a request through only for a tab whose admin console is logged in.
pub async fn admin_mw(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    state
        .get_sessions()
        .update(&session_id, |session| {
            session
                .admin()
                .and_then(|admin| admin.require_login())
                .map_err(|_| AdminError::NotLoggedIn)
        })
        .ok_or(ServerError::UnknownSession)??;

    Ok(next.run(req).await)
}
