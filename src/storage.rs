//! Durable key/value slots and values persisted through them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::StorageError;

pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per slot inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(path.display().to_string(), e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::Io(self.dir.display().to_string(), e))?;
        fs::write(&path, value).map_err(|e| StorageError::Io(path.display().to_string(), e))
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for std::rc::Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// A value mirrored into a storage slot: read once, written on every change.
pub struct Persisted<T> {
    storage: Box<dyn Storage>,
    key: String,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    /// Reads the slot, falling back to `initial` when it is empty or unreadable.
    pub fn load(storage: Box<dyn Storage>, key: &str, initial: T) -> Self {
        let value = match read_slot(storage.as_ref(), key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("no stored value for {}", key);
                initial
            }
            Err(e) => {
                warn!("{}; starting from scratch", e);
                initial
            }
        };

        Persisted {
            storage,
            key: key.to_string(),
            value,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replaces the value, writing it through if it changed.
    pub fn set(&mut self, value: T) -> bool {
        if value == self.value {
            return false;
        }
        self.value = value;
        self.flush();
        true
    }

    pub fn update(&mut self, f: impl FnOnce(&T) -> T) -> bool {
        let value = f(&self.value);
        self.set(value)
    }

    fn flush(&self) {
        let result = serde_json::to_string(&self.value)
            .map_err(|e| StorageError::Malformed(self.key.clone(), e))
            .and_then(|json| self.storage.write(&self.key, &json));
        if let Err(e) = result {
            warn!("failed to persist {}: {}", self.key, e);
        }
    }
}

fn read_slot<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.read(key)? else {
        return Ok(None);
    };
    // a slot that was never initialised may hold `null`
    if raw.trim().is_empty() || raw.trim() == "null" {
        return Ok(None);
    }
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Malformed(key.to_string(), e))
}
