//! Error types for manifest resolution, image fetches and local persistence.
//!
//! Manifest errors are fatal to a run and surface before any download starts.
//! Fetch and write errors belong to a single item and end up inside that
//! item's `DownloadOutcome::Failed`.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the list of images from a manifest. Aborts the run.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest could not be retrieved (non-2xx status or transport failure).
    #[error("failed to fetch manifest {url}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// Manifest body is not JSON, or lacks the sequence/canvas structure.
    #[error("failed to parse manifest {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Failure of a single HTTP GET.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed at all.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Scheme is neither `http` nor `https`.
    #[error("unsupported URL scheme {scheme:?} in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    /// Server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },

    /// libcurl reported an error (timeout, connection, TLS, ...).
    #[error("GET {url} failed")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// The transfer was stopped because cancellation was requested.
    #[error("GET {url} cancelled")]
    Cancelled { url: String },
}

impl FetchError {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled { .. })
    }
}

/// Failure to persist downloaded bytes.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move temp file into {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single download item failed.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// The run was cancelled before this item was written.
    #[error("cancelled")]
    Cancelled,
}

impl ItemError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            ItemError::Cancelled => true,
            ItemError::Fetch(e) => e.is_cancelled(),
            ItemError::Write(_) => false,
        }
    }
}

/// `err` followed by each of its sources, joined with `: `.
pub fn display_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
