//! JSON file persistence
//!
//! Settings and high scores are plain pretty-printed JSON. Writes go to a
//! sibling `.tmp` file first and are renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        PersistError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;

/// Read a JSON file; `Ok(None)` when it does not exist
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistError::io(path, e)),
    };
    let value = serde_json::from_str(&content).map_err(|e| PersistError::json(path, e))?;
    Ok(Some(value))
}

/// Write a value as pretty JSON, replacing the file atomically
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value).map_err(|e| PersistError::json(path, e))?;
    fs::write(&tmp_path, json).map_err(|e| PersistError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| PersistError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Sample {
        name: String,
        level: u32,
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let loaded: Option<Sample> = load_json(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_atomic_write_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");
        let sample = Sample {
            name: "run".to_string(),
            level: 12,
        };

        save_json(&path, &sample).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let loaded: Option<Sample> = load_json(&path).unwrap();
        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_json::<Sample>(&path).unwrap_err();
        assert!(matches!(err, PersistError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
