#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Class not found: {0}")]
    ClassNotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid index: {0}")]
    InvalidIndex(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
