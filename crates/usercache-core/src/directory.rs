//! The two user list operations: fetch from the API and load from cache.
//!
//! Both return the users in source order or a `UsersError`. The fetch path
//! caches what it returns; the cache path never touches the network.

use anyhow::Result as AnyResult;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::cache::CacheManager;
use crate::config::Config;
use crate::models::{users_from_records, User};

#[derive(Error, Debug)]
pub enum UsersError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid data structure")]
    MalformedPayload,

    #[error("User data does not match expectations")]
    InvalidUsers,

    #[error("No cached data")]
    NoCachedData,

    #[error("Cached data is invalid")]
    InvalidCache,

    #[error("Cache error: {0}")]
    Cache(String),
}

impl UsersError {
    /// Status text for a failed fetch
    pub fn fetch_status(&self) -> String {
        format!("Error: {}", self)
    }

    /// Status text for a failed cache load
    pub fn cache_status(&self) -> String {
        match self {
            UsersError::NoCachedData => self.to_string(),
            _ => format!("Error loading cache: {}", self),
        }
    }

    fn from_cache(e: anyhow::Error) -> Self {
        UsersError::Cache(format!("{:#}", e))
    }
}

/// Extract and validate the user list from an API payload of shape
/// `{ "data": [ { "first_name": ..., "last_name": ... }, ... ] }`.
pub fn parse_users_payload(payload: Value) -> Result<Vec<User>, UsersError> {
    let records = match payload {
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(records)) => records,
            _ => return Err(UsersError::MalformedPayload),
        },
        _ => return Err(UsersError::MalformedPayload),
    };
    users_from_records(records).ok_or(UsersError::InvalidUsers)
}

/// Parse and validate the cached text, a JSON array of user records.
pub fn parse_cached_users(text: &str) -> Result<Vec<User>, UsersError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(records)) => users_from_records(records).ok_or(UsersError::InvalidCache),
        _ => Err(UsersError::InvalidCache),
    }
}

/// API client plus cache. Clone is cheap, so a copy can move into a task.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    api: ApiClient,
    cache: CacheManager,
}

impl UserDirectory {
    pub fn new(api: ApiClient, cache: CacheManager) -> Self {
        Self { api, cache }
    }

    /// Build the client and cache described by a config
    pub fn from_config(config: &Config) -> AnyResult<Self> {
        let mut api = ApiClient::new(config.api_url(), config.request_timeout())?;
        if let Some(ref key) = config.api_key {
            api = api.with_api_key(key.clone());
        }
        let cache = CacheManager::new(config.cache_dir()?)?;
        Ok(Self::new(api, cache))
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Fetch the list, validate it, and cache it in both storage areas.
    pub async fn fetch_users(&self) -> Result<Vec<User>, UsersError> {
        info!(url = %self.api.users_url(), "Fetching users from API");

        let payload = self.api.fetch_users_payload().await?;
        let users = parse_users_payload(payload)?;

        self.cache.save_users(&users).map_err(|e| {
            warn!(error = %e, "Failed to cache users");
            UsersError::from_cache(e)
        })?;

        info!(count = users.len(), "Users fetched and cached");
        Ok(users)
    }

    /// Load the list from local storage. Never touches the network.
    pub fn load_cached_users(&self) -> Result<Vec<User>, UsersError> {
        info!("Loading cached users");

        let text = self
            .cache
            .load_users_text()
            .map_err(UsersError::from_cache)?
            .filter(|text| !text.is_empty())
            .ok_or(UsersError::NoCachedData)?;
        let users = parse_cached_users(&text)?;

        info!(count = users.len(), "Cached users loaded");
        Ok(users)
    }
}
