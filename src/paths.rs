use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use std::env;

/// Environment variable that selects the store root.
pub const ROOT_ENV: &str = "GITDS_PATH";

#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
    pub blobs: PathBuf,
    pub datasets: PathBuf,
    pub config: PathBuf,
}

impl Paths {
    pub fn under(root: &Path) -> Self {
        Paths {
            root: root.to_path_buf(),
            blobs: root.join("blobs"),
            datasets: root.join("datasets"),
            config: root.join("config.toml"),
        }
    }
}

/// Resolve the store root: `$GITDS_PATH`, falling back to `$HOME/.gitds`.
pub fn gitds_home() -> Result<PathBuf> {
    if let Some(p) = env::var_os(ROOT_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let home = env::var_os("HOME").filter(|h| !h.is_empty());
    match home {
        Some(h) => Ok(PathBuf::from(h).join(".gitds")),
        None => bail!("cannot locate store root: neither {} nor HOME is set", ROOT_ENV),
    }
}
