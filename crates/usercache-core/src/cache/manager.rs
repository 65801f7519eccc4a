use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::User;

use super::storage::{FileStorage, MemoryStorage, Storage};

/// Key the user list is stored under, in both storage areas
pub const USERS_KEY: &str = "users";

/// Format an age in minutes as "just now", "5m ago", "2h ago" or "3d ago".
pub fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        // Negative ages come from clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        let remaining_mins = minutes % 60;
        if remaining_mins >= 30 {
            // Round up: 1h 30m+ becomes 2h
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        let remaining_hours = (minutes % 1440) / 60;
        if remaining_hours >= 12 {
            // Round up: 1d 12h+ becomes 2d
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Writes the user list to local and session storage and reads it back.
/// Clone is cheap; clones share the session area.
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
    local: FileStorage,
    session: MemoryStorage,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        let local = FileStorage::new(cache_dir.clone())?;
        Ok(Self {
            cache_dir,
            local,
            session: MemoryStorage::new(),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    // ===== Users =====

    /// Serialize the list once and write the same text to both areas.
    pub fn save_users(&self, users: &[User]) -> Result<()> {
        let contents = serde_json::to_string(users).context("Failed to serialize users")?;
        self.local.set_item(USERS_KEY, &contents)?;
        self.session.set_item(USERS_KEY, &contents)?;
        debug!(count = users.len(), bytes = contents.len(), "Users cached");
        Ok(())
    }

    /// Raw cached text from the local area only
    pub fn load_users_text(&self) -> Result<Option<String>> {
        self.local.get_item(USERS_KEY)
    }

    /// Raw cached text from the session area
    pub fn session_users_text(&self) -> Result<Option<String>> {
        self.session.get_item(USERS_KEY)
    }

    // ===== Cache Age Information =====

    pub fn users_cached_at(&self) -> Result<Option<DateTime<Utc>>> {
        self.local.stored_at(USERS_KEY)
    }

    /// Age of the local user list for display, `None` if nothing is cached
    pub fn users_age(&self) -> Option<String> {
        match self.users_cached_at() {
            Ok(Some(at)) => Some(format_age((Utc::now() - at).num_minutes())),
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, "Failed to read cache age");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, CacheManager) {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().join("cache")).unwrap();
        (dir, cache)
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(-5), "just now");
        assert_eq!(format_age(0), "just now");
        assert_eq!(format_age(5), "5m ago");
        assert_eq!(format_age(59), "59m ago");
        assert_eq!(format_age(60), "1h ago");
        assert_eq!(format_age(90), "2h ago");
        assert_eq!(format_age(1439), "24h ago");
        assert_eq!(format_age(1440), "1d ago");
        assert_eq!(format_age(1440 + 12 * 60), "2d ago");
    }

    #[test]
    fn test_save_users_writes_identical_text_to_both_areas() {
        let (_dir, cache) = manager();
        let users = vec![User::new("George", "Bluth"), User::new("Janet", "Weaver")];

        cache.save_users(&users).unwrap();

        let local = cache.load_users_text().unwrap().expect("local entry");
        let session = cache.session_users_text().unwrap().expect("session entry");
        assert_eq!(local, session);

        let parsed: Vec<User> = serde_json::from_str(&local).unwrap();
        assert_eq!(parsed, users);
    }

    #[test]
    fn test_empty_cache() {
        let (_dir, cache) = manager();
        assert_eq!(cache.load_users_text().unwrap(), None);
        assert_eq!(cache.session_users_text().unwrap(), None);
        assert_eq!(cache.users_age(), None);
    }

    #[test]
    fn test_users_age_after_save() {
        let (_dir, cache) = manager();
        cache.save_users(&[]).unwrap();
        assert_eq!(cache.users_age().as_deref(), Some("just now"));
    }

    #[test]
    fn test_session_area_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        CacheManager::new(dir.path().to_path_buf())
            .unwrap()
            .save_users(&[User::new("Emma", "Wong")])
            .unwrap();

        let reopened = CacheManager::new(dir.path().to_path_buf()).unwrap();
        assert!(reopened.load_users_text().unwrap().is_some());
        assert_eq!(reopened.session_users_text().unwrap(), None);
    }
}
