use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::{
    admin::models::AdminError,
    question::store::StoreError,
    quiz::models::QuizError,
    storage::error::StorageError,
};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Api error: {0} - {1}")]
    Api(StatusCode, String),

    #[error("{0}")]
    NotFound(String),

    #[error("Missing or unknown session")]
    UnknownSession,

    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Admin(#[from] AdminError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Api(status, _) => *status,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::UnknownSession => StatusCode::UNAUTHORIZED,
            ServerError::Http(_) => StatusCode::BAD_GATEWAY,
            ServerError::Store(e) => match e {
                StoreError::Storage(inner) => storage_status(inner),
                StoreError::Io(_) | StoreError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Storage(e) => storage_status(e),
            ServerError::Quiz(e) => match e {
                QuizError::UnknownAnswer(_) => StatusCode::BAD_REQUEST,
                QuizError::EmptyStore
                | QuizError::InvalidTransition { .. }
                | QuizError::NotAnswered(_)
                | QuizError::Suspended => StatusCode::CONFLICT,
            },
            ServerError::Admin(e) => match e {
                AdminError::WrongCode => StatusCode::FORBIDDEN,
                AdminError::NotLoggedIn => StatusCode::UNAUTHORIZED,
                AdminError::Validation(_) => StatusCode::BAD_REQUEST,
                AdminError::NotAdminMode
                | AdminError::GameInProgress
                | AdminError::InvalidTransition { .. } => StatusCode::CONFLICT,
            },
        }
    }
}

fn storage_status(error: &StorageError) -> StatusCode {
    match error {
        StorageError::UnsupportedMedia(_) | StorageError::InvalidReference(_) => {
            StatusCode::BAD_REQUEST
        }
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::Http(_) | StorageError::ApiError(..) => StatusCode::BAD_GATEWAY,
        StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!("Request failed: {}", message);
        } else {
            warn!("Request rejected: {} - {}", status, message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
