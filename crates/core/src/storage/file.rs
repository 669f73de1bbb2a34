//! File-backed storage
//!
//! Each store is a single JSON object on disk, rewritten on every mutation.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use jiff::Timestamp;
use serde::{Serialize, de::DeserializeOwned};

use crate::storage::{Cookie, CookieJar, LocalStorage, StorageError};

#[derive(Debug)]
struct JsonFile<V> {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, V>>,
}

impl<V: Serialize + DeserializeOwned + Clone> JsonFile<V> {
    fn open(path: &Path) -> Result<Self, StorageError> {
        let entries = match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn update(&self, mutate: impl FnOnce(&mut BTreeMap<String, V>)) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = entries.clone();
        mutate(&mut next);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&next)?)?;

        *entries = next;

        Ok(())
    }
}

/// Local storage persisted to a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    file: JsonFile<String>,
}

impl FileStorage {
    /// Open (or lazily create) storage at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Ok(Self {
            file: JsonFile::open(path.as_ref())?,
        })
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.file.get(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.file.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.file.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Cookie jar persisted to a JSON file.
#[derive(Debug)]
pub struct FileCookieJar {
    file: JsonFile<Cookie>,
}

impl FileCookieJar {
    /// Open (or lazily create) a cookie jar at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Ok(Self {
            file: JsonFile::open(path.as_ref())?,
        })
    }
}

impl CookieJar for FileCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let now = Timestamp::now();

        self.file
            .get(name)
            .filter(|cookie| !cookie.is_expired_at(now))
            .map(|cookie| cookie.value)
    }

    fn set(&self, cookie: Cookie) -> Result<(), StorageError> {
        self.file.update(|entries| {
            entries.insert(cookie.name.clone(), cookie);
        })
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.file.update(|entries| {
            entries.remove(name);
        })
    }
}
