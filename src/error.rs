use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {excerpt}")]
    HttpStatus {
        url: String,
        status: u16,
        excerpt: String,
    },

    #[error("Could not extract bearer token: {0}")]
    Extraction(String),

    #[error("Malformed JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} '{label}' not found")]
    NotFound { kind: &'static str, label: String },

    #[error("Ad {ad_id} skipped: {reason}")]
    Row { ad_id: String, reason: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
