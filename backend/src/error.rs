use std::time::Duration;
use thiserror::Error;

/// Fatal problems while building the player catalog at startup
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog data: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("catalog contains no players")]
    Empty,

    #[error("embedding for `{name}` has dimension {found}, expected {expected}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("failed to embed player names: {0}")]
    Embedding(#[from] EmbedError),
}

/// Failures computing a text embedding
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("embedding service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    Malformed(String),

    #[error("embedding has dimension {found}, catalog uses {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Failures of the best-effort text rewrite service
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("rewrite request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rewrite service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed rewrite response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("rewrite service returned no content")]
    Empty,

    #[error("rewrite timed out after {0:?}")]
    Timeout(Duration),
}
