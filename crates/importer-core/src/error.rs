use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sleep importer.
///
/// Row-level problems (short rows, unparsable dates, absent optional
/// fields) are deliberately *not* represented here: they are handled by
/// dropping the row or treating the field as absent, and only show up as
/// a lower final record count.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The export file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sink refused authorization for the requested categories.
    ///
    /// Fatal to the whole run; no parsing or writing happens after this.
    #[error("Health store authorization denied")]
    AuthorizationDenied,

    /// A single sink write failed.
    ///
    /// Surfaced by sinks; the orchestrator logs and counts these rather
    /// than aborting the run.
    #[error("Sink write failed: {0}")]
    SinkWrite(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the importer crates.
pub type Result<T> = std::result::Result<T, ImportError>;
