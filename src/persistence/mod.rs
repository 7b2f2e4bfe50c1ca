//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Backup rotation (tmp → save, old save → backup)
//! - Corruption detection and recovery from the backup

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Current envelope format version
pub const ENVELOPE_VERSION: u32 = 1;

/// Versioned wrapper around persisted data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            data,
        }
    }
}

#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    UnsupportedVersion { found: u32 },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Parse(err) => write!(f, "corrupt save data: {err}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported save version {found} (expected {ENVELOPE_VERSION})")
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Backup file kept next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

/// Decode an envelope, rejecting unknown versions
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T, PersistError> {
    let envelope: Envelope<T> = serde_json::from_str(json)?;
    if envelope.version != ENVELOPE_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    Ok(envelope.data)
}

/// Encode data in the current envelope
pub fn encode<T: Serialize>(data: &T) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&Envelope::new(data))?)
}

/// Write `data` to `path`: tmp file first, previous save rotated to the backup
pub fn save<T: Serialize>(path: &Path, data: &T) -> Result<(), PersistError> {
    let json = encode(data)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let tmp = sibling(path, ".tmp");
    fs::write(&tmp, json)?;
    if path.exists() {
        fs::rename(path, backup_path(path))?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read `path`, falling back to its backup if the main file is missing or corrupt
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let primary = fs::read_to_string(path)
        .map_err(PersistError::from)
        .and_then(|json| decode(&json));

    match primary {
        Ok(data) => Ok(data),
        Err(err) => {
            let backup = backup_path(path);
            if !backup.exists() {
                return Err(err);
            }
            log::warn!("{}: {err}; trying backup", path.display());
            decode(&fs::read_to_string(backup)?)
        }
    }
}
