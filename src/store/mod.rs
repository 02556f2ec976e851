//! Versioned dataset storage.
//!
//! The importer only ever needs one capability from a store: accept a save
//! and append one immutable version. That capability is the
//! [`DatasetStore`] trait. [`FsStore`] is the local, content-addressed
//! implementation used by the CLI.

mod fs_store;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{StoreError, StoreResult};

pub use fs_store::FsStore;

/// Longest dataset name the store accepts.
pub const MAX_NAME_LEN: usize = 144;

/// One save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveParams {
    /// Destination, `<peername>/<name>`.
    pub reference: String,
    /// Commit title of the new version.
    pub title: String,
    /// Logical path the body is recorded under, e.g. `body.csv`.
    pub body_path: String,
    /// Raw body bytes. `None` only makes sense when `replace` is false.
    pub body: Option<Vec<u8>>,
    /// Take the submitted dataset as complete instead of merging it onto the
    /// previous version. Passed through to the store unchanged.
    pub replace: bool,
}

/// An immutable, committed dataset version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Content address of this version record.
    pub path: String,
    /// Content address of the version it was saved on top of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub title: String,
    pub body_path: String,
    /// SHA-256 of the body bytes.
    pub body_hash: String,
    pub body_size: u64,
    pub timestamp: DateTime<Utc>,
}

impl Version {
    pub fn short_path(&self) -> &str {
        &self.path[..7.min(self.path.len())]
    }
}

/// Anything that can accept one versioned save.
pub trait DatasetStore {
    /// Append one new version built from `params`.
    ///
    /// Stores never rewrite committed versions: calling `save` twice with the
    /// same params yields two versions.
    fn save(&mut self, params: SaveParams) -> StoreResult<Version>;
}

impl<S: DatasetStore + ?Sized> DatasetStore for &mut S {
    fn save(&mut self, params: SaveParams) -> StoreResult<Version> {
        (**self).save(params)
    }
}

/// A parsed `<peername>/<name>` dataset reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetRef {
    pub peername: String,
    pub name: String,
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("valid name regex"))
}

/// Check a dataset (or peer) name against the store's naming rules.
pub fn validate_name(name: &str) -> StoreResult<()> {
    if name.len() > MAX_NAME_LEN || !name_re().is_match(name) {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl DatasetRef {
    pub fn new(peername: &str, name: &str) -> StoreResult<Self> {
        validate_name(peername)?;
        validate_name(name)?;
        Ok(Self {
            peername: peername.to_string(),
            name: name.to_string(),
        })
    }
}

impl FromStr for DatasetRef {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        let (peer, name) = s
            .split_once('/')
            .ok_or_else(|| StoreError::InvalidRef(s.to_string()))?;
        if peer.is_empty() || name.is_empty() || name.contains('/') {
            return Err(StoreError::InvalidRef(s.to_string()));
        }
        Self::new(peer, name)
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.peername, self.name)
    }
}
