use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
};

use crate::{
    admin::handlers::{admin_data_routes, admin_routes},
    health::handlers::health_routes,
    mw::{admin_mw::admin_mw, request_mw::request_mw, session_mw::session_mw},
    quiz::handlers::quiz_routes,
    server::app_state::AppState,
    session::handlers::session_routes,
};

pub fn app_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .nest("/health", health_routes(state.clone()))
        .nest("/session", session_routes(state.clone()));

    let admin = admin_routes(state.clone()).merge(
        admin_data_routes(state.clone()).layer(from_fn_with_state(state.clone(), admin_mw)),
    );

    let session_routes = Router::new()
        .nest("/quiz", quiz_routes(state.clone()))
        .nest("/admin", admin)
        .layer(from_fn_with_state(state.clone(), session_mw));

    Router::new()
        .merge(session_routes)
        .merge(public_routes)
        .layer(from_fn(request_mw))
}
