//! Error types shared by the history extraction and replay pipeline.
//!
//! Every failure aborts the import; nothing here is recovered locally.
//! The CLI layer converts these into `anyhow::Error` at the process boundary.

use std::io;
use thiserror::Error;

/// Failures raised while listing history, fetching revisions or replaying
/// them into a store.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The `git` binary could not be run at all.
    #[error("your system doesn't seem to have git installed: {0}")]
    PrerequisiteMissing(String),

    /// A git invocation exited non-zero. The message is the captured stderr, verbatim.
    #[error("{stderr}")]
    CommandFailed { stderr: String },

    /// A `git log` line did not have the `<40-char hash> <title>` shape.
    #[error("malformed history line {line_no}: {line:?}")]
    MalformedHistoryLine { line_no: usize, line: String },

    /// The dataset store rejected a version.
    #[error("saving version failed: {0}")]
    StoreSaveFailed(#[from] StoreError),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid import target: {0}")]
    InvalidTarget(String),
}

/// Failures raised by a [`DatasetStore`](crate::store::DatasetStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid dataset reference {0:?}: expected <peername>/<name>")]
    InvalidRef(String),

    #[error("invalid dataset name {0:?}: names must start with a letter and contain only a-z, 0-9, '_' or '-'")]
    InvalidName(String),

    #[error("title must be a single line: {0:?}")]
    InvalidTitle(String),

    #[error("body is required")]
    MissingBody,

    #[error("unsupported body format {0:?}: expected a .csv or .json body path")]
    UnsupportedBodyFormat(String),

    #[error("dataset not found: {0}")]
    NotFound(String),

    #[error("version {index} not found in {reference} ({len} versions)")]
    VersionNotFound {
        reference: String,
        index: usize,
        len: usize,
    },

    #[error("store io error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt dataset log: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type ImportResult<T> = Result<T, ImportError>;
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_displays_stderr_verbatim() {
        let e = ImportError::CommandFailed {
            stderr: "fatal: not a git repository\n".to_string(),
        };
        assert_eq!(e.to_string(), "fatal: not a git repository\n");

        let empty = ImportError::CommandFailed {
            stderr: String::new(),
        };
        assert_eq!(empty.to_string(), "");
    }

    #[test]
    fn store_errors_convert_into_save_failures() {
        let e: ImportError = StoreError::MissingBody.into();
        assert!(matches!(e, ImportError::StoreSaveFailed(StoreError::MissingBody)));
    }
}
