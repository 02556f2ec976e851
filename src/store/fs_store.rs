use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{DatasetRef, DatasetStore, SaveParams, Version};
use crate::error::{StoreError, StoreResult};
use crate::paths::Paths;

/// Body formats the store can record.
const TABULAR_EXTENSIONS: [&str; 2] = ["csv", "json"];

/// On-disk history of one dataset, oldest version first.
#[derive(Debug, Serialize, Deserialize)]
struct DatasetLog {
    reference: String,
    versions: Vec<Version>,
}

/// Local versioned dataset store.
///
/// Layout under the root:
/// - `blobs/<sha256>`: body bytes, written once per distinct content
/// - `datasets/<peername>/<name>.json`: append-only version log
///
/// Logs are rewritten through a temp file and rename, so a reader never sees
/// a half-written log.
#[derive(Debug, Clone)]
pub struct FsStore {
    paths: Paths,
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = path
        .parent()
        .ok_or_else(|| StoreError::Io(ErrorKind::InvalidInput.into()))?;
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn check_body_path(body_path: &str) -> StoreResult<()> {
    let ext = Path::new(body_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext {
        Some(e) if TABULAR_EXTENSIONS.contains(&e.as_str()) => Ok(()),
        _ => Err(StoreError::UnsupportedBodyFormat(body_path.to_string())),
    }
}

/// Content address of a version: the SHA-256 of its JSON encoding with an
/// empty `path`.
fn version_address(v: &Version) -> StoreResult<String> {
    let unaddressed = Version {
        path: String::new(),
        ..v.clone()
    };
    Ok(sha256_hex(&serde_json::to_vec(&unaddressed)?))
}

impl FsStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: &Path) -> StoreResult<Self> {
        let paths = Paths::under(root);
        fs::create_dir_all(&paths.blobs)?;
        fs::create_dir_all(&paths.datasets)?;
        debug!(root = %root.display(), "opened dataset store");
        Ok(Self { paths })
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    fn log_path(&self, r: &DatasetRef) -> PathBuf {
        self.paths
            .datasets
            .join(&r.peername)
            .join(format!("{}.json", r.name))
    }

    fn read_log(&self, r: &DatasetRef) -> StoreResult<Option<DatasetLog>> {
        match fs::read(self.log_path(r)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_log(&self, r: &DatasetRef, log: &DatasetLog) -> StoreResult<()> {
        write_atomic(&self.log_path(r), &serde_json::to_vec_pretty(log)?)
    }

    fn put_blob(&self, body: &[u8]) -> StoreResult<String> {
        let hash = sha256_hex(body);
        let path = self.paths.blobs.join(&hash);
        if !path.exists() {
            write_atomic(&path, body)?;
        }
        Ok(hash)
    }

    /// All committed versions of `reference`, oldest first.
    pub fn log(&self, reference: &str) -> StoreResult<Vec<Version>> {
        let r: DatasetRef = reference.parse()?;
        self.read_log(&r)?
            .map(|l| l.versions)
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))
    }

    /// Body bytes of version `index` (0 = oldest), or of the latest version.
    pub fn body(&self, reference: &str, index: Option<usize>) -> StoreResult<Vec<u8>> {
        let versions = self.log(reference)?;
        let len = versions.len();
        let idx = index.unwrap_or(len.saturating_sub(1));
        let v = versions.get(idx).ok_or(StoreError::VersionNotFound {
            reference: reference.to_string(),
            index: idx,
            len,
        })?;
        Ok(fs::read(self.paths.blobs.join(&v.body_hash))?)
    }
}

impl DatasetStore for FsStore {
    fn save(&mut self, params: SaveParams) -> StoreResult<Version> {
        let r: DatasetRef = params.reference.parse()?;
        check_body_path(&params.body_path)?;
        if params.title.contains(['\n', '\r']) {
            return Err(StoreError::InvalidTitle(params.title));
        }

        let mut log = self.read_log(&r)?.unwrap_or_else(|| DatasetLog {
            reference: r.to_string(),
            versions: Vec::new(),
        });
        let prev = log
            .versions
            .last()
            .map(|p| (p.path.clone(), p.body_hash.clone(), p.body_size));

        let (body_hash, body_size) = match (params.body, &prev) {
            (Some(body), _) => (self.put_blob(&body)?, body.len() as u64),
            (None, Some((_, hash, size))) if !params.replace => (hash.clone(), *size),
            (None, _) => return Err(StoreError::MissingBody),
        };

        let title = match (params.title.trim().is_empty(), &prev) {
            (false, _) => params.title,
            (true, None) => "created dataset".to_string(),
            (true, Some(_)) => "updated dataset".to_string(),
        };

        let mut version = Version {
            path: String::new(),
            previous: prev.map(|(path, _, _)| path),
            title,
            body_path: params.body_path,
            body_hash,
            body_size,
            timestamp: Utc::now(),
        };
        version.path = version_address(&version)?;

        log.versions.push(version.clone());
        self.write_log(&r, &log)?;
        info!(
            reference = %r,
            version = log.versions.len(),
            path = version.short_path(),
            "saved version"
        );
        Ok(version)
    }
}
