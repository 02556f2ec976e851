use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::{CommandExecutor, Git};
use crate::error::{ImportError, ImportResult};

/// Width of a full commit hash as printed by `%H`.
pub const HASH_LEN: usize = 40;

/// One commit that touched the tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full 40-character commit hash.
    pub id: String,
    /// First line of the commit message. May be empty.
    pub title: String,
}

impl CommitRecord {
    /// Abbreviated hash used in progress output.
    pub fn short_id(&self) -> &str {
        &self.id[..7.min(self.id.len())]
    }
}

impl<E: CommandExecutor> Git<E> {
    /// List the commits that modified `file`, oldest first, following renames.
    ///
    /// git ignores `--follow` when combined with `--reverse`, so the log is
    /// read newest first and reversed here. A file with no history yields an
    /// empty list rather than an error.
    pub fn list_file_commits(&self, dir: &Path, file: &str) -> ImportResult<Vec<CommitRecord>> {
        let out = self.run(
            dir,
            "log",
            &[
                "--format=%H %s".to_string(),
                "--follow".to_string(),
                "--".to_string(),
                file.to_string(),
            ],
        )?;
        let mut commits = parse_history(&out)?;
        commits.reverse();
        debug!(file, count = commits.len(), "listed file history");
        Ok(commits)
    }

    /// Map each commit in the file's history to the path the file had in it.
    ///
    /// Used to fetch pre-rename revisions under their old name. Paths are
    /// relative to the repository root. `core.quotePath` is turned off so
    /// non-ASCII names come back verbatim.
    pub fn path_history(&self, dir: &Path, file: &str) -> ImportResult<HashMap<String, String>> {
        let out = self.run(
            dir,
            "-c",
            &[
                "core.quotePath=false".to_string(),
                "log".to_string(),
                "--follow".to_string(),
                "--name-only".to_string(),
                "--format=%x00%H".to_string(),
                "--".to_string(),
                file.to_string(),
            ],
        )?;
        Ok(parse_path_history(&out))
    }
}

/// Parse `git log --format="%H %s"` output into commit records, in output order.
///
/// Each line must be a 40 hex-digit hash, one space, then the title. A stray
/// carriage return inside a subject becomes a space. Lines
/// that are too short or do not start with a hash fail with
/// [`ImportError::MalformedHistoryLine`]; nothing is sliced before the
/// shape is checked.
pub fn parse_history(out: &[u8]) -> ImportResult<Vec<CommitRecord>> {
    let text = String::from_utf8_lossy(out);
    let mut commits = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let bytes = line.as_bytes();
        let well_formed = bytes.len() > HASH_LEN
            && bytes[..HASH_LEN].iter().all(u8::is_ascii_hexdigit)
            && bytes[HASH_LEN] == b' ';
        if !well_formed {
            return Err(ImportError::MalformedHistoryLine {
                line_no: idx + 1,
                line: line.to_string(),
            });
        }
        // the first HASH_LEN bytes are ASCII, so both offsets are char boundaries
        let (id, rest) = line.split_at(HASH_LEN);
        commits.push(CommitRecord {
            id: id.to_string(),
            title: rest[1..].replace('\r', " "),
        });
    }
    Ok(commits)
}

/// Parse `git log --name-only --format=%x00%H` output into `hash -> path`.
///
/// Commit lines start with a NUL byte. Paths git still had to quote (tabs,
/// newlines, quotes) are skipped, so callers fall back to the path they
/// asked about.
pub fn parse_path_history(out: &[u8]) -> HashMap<String, String> {
    let text = String::from_utf8_lossy(out);
    let mut paths = HashMap::new();
    let mut current: Option<&str> = None;
    for line in text.lines() {
        if let Some(hash) = line.strip_prefix('\0') {
            current = Some(hash.trim());
            continue;
        }
        if line.is_empty() || line.starts_with('"') {
            continue;
        }
        if let Some(hash) = current {
            paths.insert(hash.to_string(), line.to_string());
        }
    }
    paths
}
