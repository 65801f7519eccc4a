use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

/// A key-value store holding serialized text.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Keys become file names, so only a conservative character set is allowed
fn check_key(key: &str) -> Result<()> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        bail!("Invalid storage key: {:?}", key);
    }
    Ok(())
}

/// Persistent storage: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// When the item was last written, or `None` if it does not exist
    pub fn stored_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.item_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time: {}", key))?;
        Ok(Some(DateTime::<Utc>::from(modified)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage item: {}", key))?;
        Ok(Some(contents))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        // Write then rename so a reader never sees a half-written value
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .with_context(|| format!("Failed to write storage item: {}", key))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace storage item: {}", key))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove storage item: {}", key))?;
        }
        Ok(())
    }
}

/// Process-scoped storage. Clones share the same items.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_items<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> Result<T> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| anyhow::anyhow!("Session storage lock poisoned"))?;
        Ok(f(&mut items))
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        self.with_items(|items| items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.with_items(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        check_key(key)?;
        self.with_items(|items| {
            items.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("users").is_ok());
        assert!(check_key("users_v2-backup").is_ok());

        assert!(check_key("").is_err());
        assert!(check_key("../users").is_err());
        assert!(check_key("a/b").is_err());
        assert!(check_key("users.json").is_err());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("local")).unwrap();

        assert_eq!(storage.get_item("users").unwrap(), None);
        assert_eq!(storage.stored_at("users").unwrap(), None);

        storage.set_item("users", "[1,2]").unwrap();
        assert_eq!(storage.get_item("users").unwrap().as_deref(), Some("[1,2]"));
        assert!(storage.stored_at("users").unwrap().is_some());

        // Last write wins
        storage.set_item("users", "[3]").unwrap();
        assert_eq!(storage.get_item("users").unwrap().as_deref(), Some("[3]"));

        storage.remove_item("users").unwrap();
        assert_eq!(storage.get_item("users").unwrap(), None);
        // Removing a missing item is not an error
        storage.remove_item("users").unwrap();
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::new(dir.path().to_path_buf())
            .unwrap()
            .set_item("users", "[]")
            .unwrap();

        let reopened = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get_item("users").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_storage_clones_share_items() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set_item("users", "[]").unwrap();
        assert_eq!(other.get_item("users").unwrap().as_deref(), Some("[]"));

        other.remove_item("users").unwrap();
        assert_eq!(storage.get_item("users").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_fresh_instances_are_empty() {
        let storage = MemoryStorage::new();
        storage.set_item("users", "[]").unwrap();
        assert_eq!(MemoryStorage::new().get_item("users").unwrap(), None);
    }
}
