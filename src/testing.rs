//! Test doubles for the git executor and the dataset store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{ImportError, ImportResult, StoreError, StoreResult};
use crate::git::{CommandExecutor, GIT_BIN};
use crate::store::{DatasetStore, SaveParams, Version};

/// Answers git invocations from canned data and records every call.
#[derive(Default)]
pub struct FakeExecutor {
    missing_git: bool,
    history: Option<Result<Vec<u8>, String>>,
    paths: Vec<u8>,
    blobs: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_git(mut self) -> Self {
        self.missing_git = true;
        self
    }

    /// Canned `log` output for commits given oldest first; emitted newest
    /// first like git prints it.
    pub fn with_history(self, commits: &[(&str, &str)]) -> Self {
        let out: String = commits
            .iter()
            .rev()
            .map(|(id, title)| format!("{id} {title}\n"))
            .collect();
        self.with_raw_history(out.into_bytes())
    }

    pub fn with_raw_history(mut self, out: Vec<u8>) -> Self {
        self.history = Some(Ok(out));
        self
    }

    pub fn with_history_failure(mut self, stderr: &str) -> Self {
        self.history = Some(Err(stderr.to_string()));
        self
    }

    /// Canned `--name-only` output, newest commit first like git prints it.
    pub fn with_paths(mut self, paths: &[(&str, &str)]) -> Self {
        let out: String = paths
            .iter()
            .rev()
            .map(|(id, path)| format!("\0{id}\n\n{path}\n"))
            .collect();
        self.paths = out.into_bytes();
        self
    }

    pub fn with_blob(mut self, commit: &str, path: &str, content: &[u8]) -> Self {
        self.blobs
            .insert(format!("{commit}:{path}"), content.to_vec());
        self
    }

    /// Arguments of every call, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|(_, a)| a.clone()).collect()
    }

    /// Working directory of every call, in order.
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.calls.borrow().iter().map(|(d, _)| d.clone()).collect()
    }
}

impl CommandExecutor for FakeExecutor {
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> ImportResult<Vec<u8>> {
        assert_eq!(program, GIT_BIN);
        self.calls
            .borrow_mut()
            .push((dir.to_path_buf(), args.to_vec()));

        if self.missing_git {
            return Err(ImportError::Spawn {
                program: program.to_string(),
                source: io::ErrorKind::NotFound.into(),
            });
        }

        let failed = |stderr: String| ImportError::CommandFailed { stderr };
        let args = match args {
            [flag, _, rest @ ..] if flag == "-c" => rest,
            _ => args,
        };
        match args.first().map(String::as_str) {
            Some("--version") => Ok(b"git version 2.43.0\n".to_vec()),
            Some("log") if args.iter().any(|a| a == "--name-only") => Ok(self.paths.clone()),
            Some("log") => match &self.history {
                Some(Ok(out)) => Ok(out.clone()),
                Some(Err(stderr)) => Err(failed(stderr.clone())),
                None => Ok(Vec::new()),
            },
            Some("show") => {
                let spec = args.get(1).cloned().unwrap_or_default();
                self.blobs.get(&spec).cloned().ok_or_else(|| {
                    failed(format!("fatal: path '{spec}' does not exist\n"))
                })
            }
            _ => Err(failed(format!("unexpected git call: {args:?}"))),
        }
    }
}

/// Store that keeps every save request, optionally failing on the n-th one.
#[derive(Default)]
pub struct RecordingStore {
    pub saves: Vec<SaveParams>,
    fail_at: Option<(usize, StoreError)>,
}

impl RecordingStore {
    pub fn failing_at(index: usize, err: StoreError) -> Self {
        RecordingStore {
            saves: Vec::new(),
            fail_at: Some((index, err)),
        }
    }
}

impl DatasetStore for RecordingStore {
    fn save(&mut self, params: SaveParams) -> StoreResult<Version> {
        if matches!(self.fail_at, Some((i, _)) if i == self.saves.len()) {
            if let Some((_, err)) = self.fail_at.take() {
                return Err(err);
            }
        }
        let body = params.body.clone().unwrap_or_default();
        let version = Version {
            path: format!("v{}", self.saves.len()),
            previous: self.saves.len().checked_sub(1).map(|i| format!("v{i}")),
            title: params.title.clone(),
            body_path: params.body_path.clone(),
            body_hash: String::new(),
            body_size: body.len() as u64,
            timestamp: Utc::now(),
        };
        self.saves.push(params);
        Ok(version)
    }
}
