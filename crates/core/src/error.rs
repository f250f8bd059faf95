use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("invalid record document: {0}")]
    InvalidRecord(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T, E = MatchError> = std::result::Result<T, E>;
