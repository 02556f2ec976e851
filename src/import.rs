//! Replays a file's git history into a dataset store, one version per commit.

use anyhow::Context;
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ImportError, ImportResult};
use crate::git::{CommandExecutor, Git, SystemExecutor};
use crate::paths::gitds_home;
use crate::progress::{err_style, ok_style, spinner_style};
use crate::settings::Settings;
use crate::store::{DatasetStore, FsStore, SaveParams, Version};

/// What to import and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub dataset_name: String,
    /// Git working directory the history is read from.
    pub source_dir: PathBuf,
    /// Path of the tracked file, relative to `source_dir`.
    pub body_file: String,
}

impl ImportTarget {
    /// # Errors
    /// Fails with [`ImportError::InvalidTarget`] if any field is empty.
    pub fn new(
        dataset_name: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        body_file: impl Into<String>,
    ) -> ImportResult<Self> {
        let t = ImportTarget {
            dataset_name: dataset_name.into(),
            source_dir: source_dir.into(),
            body_file: body_file.into(),
        };
        if t.dataset_name.trim().is_empty() {
            return Err(ImportError::InvalidTarget("dataset name is empty".into()));
        }
        if t.source_dir.as_os_str().is_empty() {
            return Err(ImportError::InvalidTarget("source directory is empty".into()));
        }
        if t.body_file.trim().is_empty() {
            return Err(ImportError::InvalidTarget("body file path is empty".into()));
        }
        Ok(t)
    }
}

/// Outcome of a completed import.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub reference: String,
    /// Saved versions, in commit order.
    pub versions: Vec<Version>,
}

/// Drives the replay: list commits, fetch each revision, save it.
///
/// Strictly sequential. The first failure aborts the run and leaves the
/// store holding whatever prefix of history was already saved. Nothing is
/// deduplicated, so importing twice submits every commit twice.
pub struct Importer<E, S> {
    git: Git<E>,
    store: S,
    settings: Settings,
    progress: ProgressBar,
}

impl<E: CommandExecutor, S: DatasetStore> Importer<E, S> {
    /// Build an importer, failing with [`ImportError::PrerequisiteMissing`]
    /// if `git` cannot be run.
    pub fn new(git: Git<E>, store: S, settings: Settings) -> ImportResult<Self> {
        git.ensure_available()?;
        Ok(Importer {
            git,
            store,
            settings,
            progress: ProgressBar::hidden(),
        })
    }

    /// Report progress on `pb` instead of a hidden bar.
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = pb;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Import every revision of `target.body_file` as a new dataset version.
    pub fn import_file_history(&mut self, target: &ImportTarget) -> ImportResult<ImportReport> {
        let dir = target.source_dir.as_path();
        let commits = self.git.list_file_commits(dir, &target.body_file)?;
        let reference = self.settings.reference(&target.dataset_name);
        if commits.is_empty() {
            warn!(file = %target.body_file, "file has no history, nothing to import");
            return Ok(ImportReport {
                reference,
                versions: Vec::new(),
            });
        }

        // pre-rename commits are fetched under the name they had back then
        let paths: HashMap<String, String> = self.git.path_history(dir, &target.body_file)?;

        let fallback = worktree_relative(&target.body_file);

        let total = commits.len();
        let mut versions = Vec::with_capacity(total);
        for (idx, cm) in commits.iter().enumerate() {
            let path = paths
                .get(&cm.id)
                .map(String::as_str)
                .unwrap_or(fallback.as_str());
            let rev = self.git.file_at_commit(dir, &cm.id, path)?;

            self.progress
                .suspend(|| println!("importing {} {}", cm.short_id(), cm.title));
            self.progress
                .set_message(format!("[{}/{}] {} {}", idx + 1, total, reference, cm.short_id()));
            debug!(commit = %cm.id, path, bytes = rev.content.len(), "saving revision");

            let version = self.store.save(SaveParams {
                reference: reference.clone(),
                title: cm.title.clone(),
                body_path: self.settings.body_path.clone(),
                body: Some(rev.content),
                replace: true,
            })?;
            versions.push(version);
        }

        Ok(ImportReport {
            reference,
            versions,
        })
    }
}

/// `<rev>:<path>` is read from the repository root unless the path starts
/// with `./` or `../`, so user paths are anchored to the working directory.
fn worktree_relative(file: &str) -> String {
    if file.starts_with("./") || file.starts_with("../") {
        file.to_string()
    } else {
        format!("./{}", file)
    }
}

/// CLI command: import the history of `file` (relative to the current
/// directory, which must be inside a git working tree) into `dataset`.
///
/// # Errors
/// Any git, store or configuration failure aborts the import.
pub fn cmd_import(dataset: &str, file: &str) -> anyhow::Result<()> {
    let settings = Settings::load(gitds_home()?)?;
    let store = FsStore::open(&settings.store_root)
        .with_context(|| format!("failed to open store at {}", settings.store_root.display()))?;
    let cwd = env::current_dir().context("cannot resolve current directory")?;
    let target = ImportTarget::new(dataset, cwd, file)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("reading history of {}", file));

    let res = Importer::new(Git::new(SystemExecutor), store, settings)
        .and_then(|imp| imp.with_progress(pb.clone()).import_file_history(&target));

    match res {
        Ok(report) => {
            pb.set_style(ok_style());
            pb.finish_with_message(format!(
                "imported {} versions into {}",
                report.versions.len(),
                report.reference
            ));
            Ok(())
        }
        Err(e) => {
            pb.set_style(err_style());
            pb.finish_with_message(format!("importing {} (error)", file));
            Err(e).with_context(|| format!("import of {} failed", file))
        }
    }
}
