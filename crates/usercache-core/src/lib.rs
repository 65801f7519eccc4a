//! Core library for usercache.
//!
//! Fetches a user list from a remote HTTP API, validates its shape, and keeps
//! the last good list in local storage so it can be shown again offline.
//!
//! - `api`: HTTP client for the users endpoint
//! - `models`: the `User` record and its shape checks
//! - `cache`: key-value text storage (local + session) and the `CacheManager`
//! - `directory`: the fetch and load-cached operations
//! - `config`: persisted application configuration

pub mod api;
pub mod cache;
pub mod config;
pub mod directory;
pub mod models;

pub use directory::{UserDirectory, UsersError};
pub use models::User;
