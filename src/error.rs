use thiserror::Error;

use crate::types::WordCategory;

#[derive(Debug, Error)]
pub enum ClueError {
    #[error("word not found in taxonomy: {0}")]
    WordNotFound(String),
    #[error("'{entry}' not found in {category} words")]
    NotFound {
        category: WordCategory,
        entry: String,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("malformed taxonomy: {0}")]
    Taxonomy(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClueError>;
