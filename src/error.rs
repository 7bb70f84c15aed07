use std::path::PathBuf;

use thiserror::Error;

/// Load failure for the static email source. Surfaced to the caller as a
/// load-failure state; never retried automatically.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch data: {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed email data: {0}")]
    Decode(#[from] serde_json::Error),
}
