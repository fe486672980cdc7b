// storefront/src/client/storage.rs

//! Client-local key/value storage, the stand-in for the browser's localStorage.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("Storage I/O failed: {0}")]
  Io(#[from] io::Error),

  #[error("Storage data is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
}

pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
  fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
  fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    Ok(self.entries.lock().get(key).cloned())
  }

  fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
    self.entries.lock().insert(key.to_string(), value);
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    self.entries.lock().remove(key);
    Ok(())
  }
}

/// All keys live in one JSON object on disk. Writes go to a temp file first
/// and are renamed into place.
#[derive(Debug)]
pub struct FileStorage {
  path: PathBuf,
  lock: Mutex<()>,
}

impl FileStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      lock: Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self) -> Result<HashMap<String, String>, StorageError> {
    match fs::read(&self.path) {
      Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
      Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
      Err(e) => Err(e.into()),
    }
  }

  fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    let tmp = self.path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_vec(entries)?)?;
    fs::rename(&tmp, &self.path)?;
    Ok(())
  }
}

impl KeyValueStore for FileStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    let _guard = self.lock.lock();
    Ok(self.load()?.remove(key))
  }

  fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
    let _guard = self.lock.lock();
    let mut entries = self.load()?;
    entries.insert(key.to_string(), value);
    self.save(&entries)
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    let _guard = self.lock.lock();
    let mut entries = self.load()?;
    if entries.remove(key).is_some() {
      self.save(&entries)?;
    }
    Ok(())
  }
}
