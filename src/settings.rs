use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::paths::Paths;

pub const DEFAULT_PEERNAME: &str = "me";
pub const DEFAULT_BODY_PATH: &str = "body.csv";

/// Optional `config.toml` at the store root.
///
/// Example TOML:
/// ```toml
/// [import]
/// peername  = "me"
/// body_path = "body.csv"
/// ```
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    import: ImportSection,
}

#[derive(Debug, Default, Deserialize)]
struct ImportSection {
    #[serde(default)]
    peername: Option<String>,
    #[serde(default)]
    body_path: Option<String>,
}

/// Everything the importer needs to know about where and how to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_root: PathBuf,
    /// Namespace half of every dataset reference.
    pub peername: String,
    /// Logical body path recorded on each version.
    pub body_path: String,
}

impl Settings {
    /// Defaults for a store rooted at `store_root`.
    pub fn new(store_root: PathBuf) -> Self {
        Settings {
            store_root,
            peername: DEFAULT_PEERNAME.to_string(),
            body_path: DEFAULT_BODY_PATH.to_string(),
        }
    }

    /// Load settings for `store_root`, applying `config.toml` if present.
    ///
    /// # Errors
    /// - Returns an error if `config.toml` exists but cannot be read.
    /// - Returns an error if parsing the TOML fails.
    pub fn load(store_root: PathBuf) -> Result<Self> {
        let p = Paths::under(&store_root);
        let cfg: FileConfig = match fs::read_to_string(&p.config) {
            Ok(txt) => toml::from_str(&txt)
                .with_context(|| format!("failed to parse {}", p.config.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => FileConfig::default(),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", p.config.display()))?,
        };

        let mut s = Settings::new(store_root);
        if let Some(peer) = cfg.import.peername.filter(|v| !v.trim().is_empty()) {
            s.peername = peer;
        }
        if let Some(body) = cfg.import.body_path.filter(|v| !v.trim().is_empty()) {
            s.body_path = body;
        }
        Ok(s)
    }

    /// Full dataset reference for `dataset_name`.
    pub fn reference(&self, dataset_name: &str) -> String {
        format!("{}/{}", self.peername, dataset_name)
    }
}
