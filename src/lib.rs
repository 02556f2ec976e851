//! Crate entry point for **gitds**.
//!
//! gitds replays the git history of a single file into a versioned dataset
//! store: one dataset version per commit that touched the file, oldest
//! first, titled with the commit's subject line.
//!
//! Each submodule encapsulates one responsibility (git access, storage,
//! replay, settings). The `pub use` re-exports make the pipeline and the CLI
//! commands reachable from the crate root.

mod error;
mod git;
mod import;
mod inspect;
mod paths;
mod progress;
mod settings;
mod store;
#[cfg(test)]
mod testing;

pub use error::{ImportError, ImportResult, StoreError, StoreResult};
pub use git::{
    CommandExecutor, CommitRecord, FileRevision, GIT_BIN, Git, HASH_LEN, SystemExecutor,
    parse_history, parse_path_history,
};
pub use import::{ImportReport, ImportTarget, Importer, cmd_import};
pub use inspect::{cmd_log, cmd_show};
pub use paths::{ROOT_ENV, gitds_home};
pub use settings::Settings;
pub use store::{DatasetRef, DatasetStore, FsStore, SaveParams, Version};
