use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};

use crate::{
    question::models::Question,
    quiz::{
        models::{QuizAction, QuizView},
        session::QuizSession,
    },
    server::{app_state::AppState, error::ServerError},
    session::models::SessionId,
};

pub fn quiz_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(get_quiz_view))
        .route("/action", post(apply_quiz_action))
        .with_state(state)
}

async fn get_quiz_view(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
) -> Result<impl IntoResponse, ServerError> {
    let session = state
        .get_sessions()
        .snapshot(&session_id)
        .ok_or(ServerError::UnknownSession)?;

    let view = render_view(&state, &session.quiz).await;
    Ok((StatusCode::OK, Json(view)))
}

async fn apply_quiz_action(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(action): Json<QuizAction>,
) -> Result<impl IntoResponse, ServerError> {
    // Read before taking the session entry, no lock is held across the await.
    let pool: Vec<Question> = match action.needs_questions() {
        true => state.get_store().get_all().await?,
        false => Vec::new(),
    };

    let name = action.name();
    let per_game = state.get_questions_per_game();
    let quiz = state
        .get_sessions()
        .update(&session_id, |session| {
            session
                .apply_quiz(action, &pool, per_game)
                .map(|_| session.quiz.clone())
        })
        .ok_or(ServerError::UnknownSession)??;

    info!("Session {} applied {} -> {}", session_id, name, quiz.phase());
    let view = render_view(&state, &quiz).await;
    Ok((StatusCode::OK, Json(view)))
}

pub async fn render_view(state: &AppState, quiz: &QuizSession) -> QuizView {
    let media_url = match quiz.displayed_question() {
        Some(question) if question.kind.needs_media() && !question.content_url.is_empty() => {
            resolve_media(state, &question.content_url).await
        }
        _ => None,
    };

    quiz.view(media_url, state.get_feedback_policy())
}

/// A media link that cannot be signed is left out rather than failing the view.
pub async fn resolve_media(state: &AppState, reference: &str) -> Option<String> {
    match state
        .get_media()
        .resolve(state.get_client(), reference)
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Failed to resolve media {}: {}", reference, e);
            None
        }
    }
}
