use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures while acquiring or decoding an audio source.
///
/// The estimator itself never fails; everything here happens before it runs.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Only HTTPS URLs are allowed")]
    InsecureScheme,

    #[error("Invalid audio URL - must start with {prefix}")]
    NotAllowed { prefix: String },

    #[error("{0} not configured")]
    MissingConfig(&'static str),

    #[error("Failed to fetch audio file: {status}")]
    Status { status: reqwest::StatusCode },

    #[error("Failed to fetch audio file: timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Failed to fetch audio file: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode audio: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("No audio tracks found")]
    NoTrack,
}
