//! Local storage: a flat string key/value map that survives page loads.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const PENDING_NOTIFICATION_KEY: &str = "pendingNotification";

const STORAGE_FILE: &str = "storage.json";

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    version: u32,

    #[serde(default)]
    items: BTreeMap<String, String>,
}

/// File-backed store shared by every process pointed at the same data dir.
///
/// The file is re-read on every access and replaced atomically on every write. There
/// is no locking: two processes writing the same key race, and the last rename wins.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("create data dir {}", data_dir.display()))?;
        Ok(Self {
            path: data_dir.join(STORAGE_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<StorageFile> {
        if !self.path.exists() {
            return Ok(StorageFile {
                version: 1,
                items: BTreeMap::new(),
            });
        }
        let bytes = fs::read(&self.path).with_context(|| format!("read {}", STORAGE_FILE))?;
        let file: StorageFile =
            serde_json::from_slice(&bytes).with_context(|| format!("parse {}", STORAGE_FILE))?;
        if file.version != 1 {
            anyhow::bail!("unsupported storage version {}", file.version);
        }
        Ok(file)
    }

    fn write_file(&self, file: &StorageFile) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(file).context("serialize storage")?;
        write_atomic(&self.path, &bytes).with_context(|| format!("write {}", STORAGE_FILE))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_file()?.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut file = self.read_file()?;
        file.items.insert(key.to_string(), value.to_string());
        self.write_file(&file)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut file = self.read_file()?;
        if file.items.remove(key).is_none() {
            return Ok(());
        }
        self.write_file(&file)
    }
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/storage_tests.rs"]
mod tests;
