use std::path::Path;

use super::{CommandExecutor, Git};
use crate::error::ImportResult;

/// A file's exact bytes as recorded at one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRevision {
    pub commit_id: String,
    pub content: Vec<u8>,
}

impl<E: CommandExecutor> Git<E> {
    /// Read `file` as it was at `commit` via `git show <commit>:<file>`.
    ///
    /// Content is passed through unmodified. Fails with
    /// [`CommandFailed`](crate::ImportError::CommandFailed) when the path did
    /// not exist at that commit or the commit is unknown.
    pub fn file_at_commit(&self, dir: &Path, commit: &str, file: &str) -> ImportResult<FileRevision> {
        let content = self.run(dir, "show", &[format!("{}:{}", commit, file)])?;
        Ok(FileRevision {
            commit_id: commit.to_string(),
            content,
        })
    }
}
