//! File-based save store for the persistent root.
//!
//! Each save is one `{name}.sav` file:
//!
//! ```text
//! magic (8 bytes) | state root (32 bytes) | bincode(PlayerData)
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-write never leaves a truncated save behind. Loads recompute the state
//! root and reject files whose digest does not match.

use std::fs;
use std::path::{Path, PathBuf};

use survival_core::{PlayerData, StateError};

const MAGIC: &[u8; 8] = b"SURVSAV1";
const HEADER_LEN: usize = MAGIC.len() + 32;
const EXTENSION: &str = "sav";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("invalid save name '{0}'")]
    InvalidName(String),

    #[error("{} is not a save file", .0.display())]
    BadHeader(PathBuf),

    #[error("save digest mismatch (header {expected}, content {actual})")]
    DigestMismatch { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, SaveError>;

/// Directory of named save files.
pub struct SaveStore {
    base_dir: PathBuf,
}

impl SaveStore {
    /// Opens the store, creating the directory when needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn save_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
        if !valid {
            return Err(SaveError::InvalidName(name.to_owned()));
        }
        Ok(self.base_dir.join(format!("{name}.{EXTENSION}")))
    }

    /// Writes `state` under `name`, replacing any previous save. Returns the
    /// state root recorded in the header.
    pub fn save(&self, name: &str, state: &PlayerData) -> Result<[u8; 32]> {
        let path = self.save_path(name)?;
        let temp_path = path.with_extension("sav.tmp");

        let body = state.encode()?;
        let root = state.state_root()?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&root);
        bytes.extend_from_slice(&body);

        fs::write(&temp_path, &bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::info!(name, root = %hex::encode(root), bytes = bytes.len(), "saved state");
        Ok(root)
    }

    /// Reads the save named `name`. `None` when it does not exist.
    pub fn load(&self, name: &str) -> Result<Option<PlayerData>> {
        let path = self.save_path(name)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        if bytes.len() < HEADER_LEN || !bytes.starts_with(MAGIC) {
            return Err(SaveError::BadHeader(path));
        }
        let (header, body) = bytes.split_at(HEADER_LEN);
        let expected = &header[MAGIC.len()..];

        let state = PlayerData::decode(body)?;
        let actual = state.state_root()?;
        if actual.as_slice() != expected {
            return Err(SaveError::DigestMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }

        tracing::debug!(name, root = %hex::encode(actual), "loaded state");
        Ok(Some(state))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.save_path(name).is_ok_and(|path| path.exists())
    }

    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.save_path(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        tracing::debug!(name, "deleted save");
        Ok(true)
    }

    /// Names of every save in the store, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            {
                names.push(stem.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}
