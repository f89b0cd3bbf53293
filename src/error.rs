//! Error types for the upload pipeline.
//!
//! Three families, matching how the pipeline reacts to them:
//! - [`MetadataError`]: bad input in the document's front matter (fatal)
//! - [`ApiError`]: transport or status failures talking to DevJourney (fatal)
//! - [`PublishError`]: everything the pipeline can abort with
//!
//! Per-reference resolution problems are not errors here; they are logged and
//! reported as skipped references.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(String),

    /// `time-spent` absent or empty. Checked before any duration parsing.
    #[error("time spent is required in the metadata")]
    MissingTimeSpent,

    #[error("invalid duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("invalid date {value:?} (expected YYYY-MM-DD): {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bad status from {endpoint}: {status} (response body: {body:?})")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to decode response from {endpoint}: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to read document {}: {source}", .path.display())]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no project with slug {0:?} is accessible with this API key")]
    ProjectNotFound(String),
}
