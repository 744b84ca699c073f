use std::time::Duration;

use dotenv::dotenv;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::FmtSubscriber;

use crate::{config::config::CONFIG, server::app_state::AppState, server::router::app_router};

mod admin;
mod config;
mod health;
mod mw;
mod question;
mod quiz;
mod server;
mod session;
mod storage;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state
    let state = AppState::from_config(&CONFIG).unwrap_or_else(|e| panic!("{}", e));
    state.spawn_cleanup(Duration::from_secs(CONFIG.session.sweep_interval_secs));

    // Initialize routes
    let app = app_router(state);

    // Initialize webserver
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", CONFIG.server.address, CONFIG.server.port))
            .await
            .unwrap_or_else(|e| panic!("Failed to bind listener: {}", e));

    info!(
        "Server listening on address: {}",
        listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".into())
    );

    if let Err(e) = axum::serve(listener, app).await {
        panic!("Server stopped: {}", e);
    }
}
