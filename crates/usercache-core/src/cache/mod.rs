//! Local caching module for offline data access.
//!
//! This module provides key-value text storage with two areas and the
//! `CacheManager` that writes the user list to both:
//!
//! - local: file-backed, survives restarts
//! - session: in-memory, lives as long as the process

pub mod manager;
pub mod storage;

pub use manager::{CacheManager, USERS_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage};
