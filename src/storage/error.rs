use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Api error: {0} - {1}")]
    ApiError(StatusCode, String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Not an object reference: {0}")]
    InvalidReference(String),

    #[error("Unsupported media file: {0}")]
    UnsupportedMedia(String),

    #[error("Failed to write local media: {0}")]
    Io(#[from] std::io::Error),
}
