use std::{collections::HashSet, sync::Arc};

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    admin::{
        models::{
            AdminAction, AdminError, AdminView, DeleteQuestionsRequest, DeleteQuestionsResponse,
            QuestionDetail, QuestionForm, QuestionSummary, UploadQuery, UploadResponse,
        },
        session::{AdminSession, build_question},
    },
    question::db,
    quiz::handlers::resolve_media,
    server::{app_state::AppState, error::ServerError},
    session::models::SessionId,
};

/// Console navigation, reachable before login.
pub fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/action", post(apply_admin_action))
        .with_state(state)
}

/// Question management, only for a logged in console.
pub fn admin_data_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(add_question))
        .route("/questions/delete", post(delete_questions))
        .route(
            "/questions/{question_id}",
            get(get_question).put(edit_question),
        )
        .route("/media", post(upload_media))
        .with_state(state)
}

fn with_admin<R>(
    state: &AppState,
    session_id: &Uuid,
    f: impl FnOnce(&mut AdminSession) -> Result<R, AdminError>,
) -> Result<R, ServerError> {
    let result = state
        .get_sessions()
        .update(session_id, |session| session.admin_mut().and_then(f))
        .ok_or(ServerError::UnknownSession)?;

    Ok(result?)
}

async fn apply_admin_action(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(action): Json<AdminAction>,
) -> Result<impl IntoResponse, ServerError> {
    if let AdminAction::Open { question_id } = &action {
        with_admin(&state, &session_id, |admin| admin.require_login())?;
        if db::get_question_by_id(state.get_store(), question_id)
            .await?
            .is_none()
        {
            return Err(ServerError::NotFound(format!(
                "Question {} not found",
                question_id
            )));
        }
    }

    let name = action.name();
    let view = state
        .get_sessions()
        .update(&session_id, |session| {
            session
                .apply_admin(action, state.get_admin_code())
                .map(|_| AdminView::from_admin(session.admin.as_ref()))
        })
        .ok_or(ServerError::UnknownSession)??;

    info!("Session {} applied admin action {}", session_id, name);
    Ok((StatusCode::OK, Json(view)))
}

async fn list_questions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let summaries: Vec<QuestionSummary> = state
        .get_store()
        .get_all()
        .await?
        .into_iter()
        .map(|q| QuestionSummary {
            id: q.id,
            question: q.question,
            category: q.category,
            difficulty: q.difficulty,
        })
        .collect();

    Ok((StatusCode::OK, Json(summaries)))
}

async fn get_question(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let question = db::get_question_by_id(state.get_store(), &question_id)
        .await?
        .ok_or(ServerError::NotFound(format!(
            "Question {} not found",
            question_id
        )))?;

    let media_url = match question.kind.needs_media() && !question.content_url.is_empty() {
        true => resolve_media(&state, &question.content_url).await,
        false => None,
    };

    Ok((StatusCode::OK, Json(QuestionDetail { question, media_url })))
}

async fn add_question(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(form): Json<QuestionForm>,
) -> Result<impl IntoResponse, ServerError> {
    let pending = with_admin(&state, &session_id, |admin| {
        admin.require_add_form()?;
        Ok(admin.pending_media().map(str::to_string))
    })?;

    let question = build_question(form, pending.as_deref(), None)?;
    db::insert_question(state.get_store(), question.clone()).await?;

    with_admin(&state, &session_id, |admin| {
        admin.question_added();
        Ok(())
    })?;

    Ok((StatusCode::CREATED, Json(question)))
}

async fn edit_question(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Path(question_id): Path<String>,
    Json(form): Json<QuestionForm>,
) -> Result<impl IntoResponse, ServerError> {
    let pending = with_admin(&state, &session_id, |admin| {
        admin.require_editing(&question_id)?;
        Ok(admin.pending_media().map(str::to_string))
    })?;

    let not_found = || ServerError::NotFound(format!("Question {} not found", question_id));
    let existing = db::get_question_by_id(state.get_store(), &question_id)
        .await?
        .ok_or_else(not_found)?;

    let question = build_question(form, pending.as_deref(), Some(&existing))?;
    if !db::update_question(state.get_store(), question.clone()).await? {
        return Err(not_found());
    }

    with_admin(&state, &session_id, |admin| {
        admin.question_saved();
        Ok(())
    })?;

    Ok((StatusCode::OK, Json(question)))
}

async fn delete_questions(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(request): Json<DeleteQuestionsRequest>,
) -> Result<impl IntoResponse, ServerError> {
    with_admin(&state, &session_id, |admin| admin.require_delete_list())?;

    if request.ids.is_empty() {
        return Err(AdminError::Validation("Select at least one question to delete".into()).into());
    }

    let ids: HashSet<String> = request.ids.into_iter().collect();
    let removed = db::delete_questions(state.get_store(), &ids).await?;

    with_admin(&state, &session_id, |admin| {
        admin.questions_deleted();
        Ok(())
    })?;

    Ok((StatusCode::OK, Json(DeleteQuestionsResponse { removed })))
}

async fn upload_media(
    State(state): State<Arc<AppState>>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    with_admin(&state, &session_id, |admin| admin.require_upload())?;

    if body.is_empty() {
        return Err(AdminError::Validation("The uploaded file is empty".into()).into());
    }

    let reference = state
        .get_media()
        .store_media(state.get_client(), body.to_vec(), &query.filename)
        .await?;
    let preview_url = resolve_media(&state, &reference).await;

    with_admin(&state, &session_id, |admin| {
        admin.remember_upload(reference.clone());
        Ok(())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            reference,
            preview_url,
        }),
    ))
}
