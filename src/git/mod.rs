//! Git integration layer.
//!
//! Everything here shells out to the `git` binary through a
//! [`CommandExecutor`], so the rest of the crate never spawns processes
//! directly and tests can substitute canned output.
//!
//! - [`history`] lists the commits that touched one file (oldest first, following renames).
//! - [`revision`] reads a file's bytes as recorded at one commit.

mod exec;
mod history;
mod revision;

use std::path::Path;
use tracing::debug;

use crate::error::{ImportError, ImportResult};

pub use exec::{CommandExecutor, SystemExecutor};
pub use history::{CommitRecord, HASH_LEN, parse_history, parse_path_history};
pub use revision::FileRevision;

/// Name of the version-control binary every command is run through.
pub const GIT_BIN: &str = "git";

/// Handle to the `git` binary, generic over how commands are executed.
#[derive(Debug, Clone)]
pub struct Git<E> {
    exec: E,
}

impl<E: CommandExecutor> Git<E> {
    pub fn new(exec: E) -> Self {
        Self { exec }
    }

    /// Check that `git` can be run at all.
    ///
    /// Runs `git --version` in the current directory. Any failure, whether the
    /// binary is missing or it refuses to start, is reported as
    /// [`ImportError::PrerequisiteMissing`].
    pub fn ensure_available(&self) -> ImportResult<()> {
        let out = self
            .exec
            .run(Path::new("."), GIT_BIN, &["--version".to_string()])
            .map_err(|e| ImportError::PrerequisiteMissing(e.to_string()))?;
        debug!(version = %String::from_utf8_lossy(&out).trim(), "found git");
        Ok(())
    }

    /// Run `git <cmd> <args...>` inside `dir` and return its stdout.
    pub fn run(&self, dir: &Path, cmd: &str, args: &[String]) -> ImportResult<Vec<u8>> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(cmd.to_string());
        full.extend(args.iter().cloned());
        self.exec.run(dir, GIT_BIN, &full)
    }
}
