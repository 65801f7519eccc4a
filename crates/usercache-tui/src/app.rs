//! Application state management for usercache.
//!
//! This module contains the core `App` struct that owns the rendered user
//! list, the error/status text, and the channel that background fetches
//! report back on.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use usercache_core::config::Config;
use usercache_core::models::render_user_list;
use usercache_core::{User, UserDirectory, UsersError};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Where the currently rendered list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    Api,
    Cache,
}

impl ListSource {
    pub fn label(&self) -> &'static str {
        match self {
            ListSource::Api => "API",
            ListSource::Cache => "cache",
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background tasks back to the main loop.
enum LoadResult {
    /// A fetch from the API finished
    Fetched(Result<Vec<User>, UsersError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,
    directory: UserDirectory,

    pub state: AppState,

    // Rendered list
    pub users: Vec<User>,
    pub list_source: Option<ListSource>,
    pub selection: usize,

    /// Error area text; empty after a successful load
    pub error_message: Option<String>,
    /// Transient status text shown in the status bar
    pub status_message: Option<String>,
    /// Age of the local cache for the status bar
    pub cache_age: Option<String>,

    pub fetch_in_progress: bool,

    // Background task channel
    result_rx: mpsc::Receiver<LoadResult>,
    result_tx: mpsc::Sender<LoadResult>,
}

impl App {
    /// Create a new application instance from the saved config
    pub fn new(config: Config) -> Result<Self> {
        let directory = UserDirectory::from_config(&config)?;
        debug!(cache_dir = ?directory.cache().cache_dir(), "Cache directory configured");
        Ok(Self::with_directory(config, directory))
    }

    pub fn with_directory(config: Config, directory: UserDirectory) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let cache_age = directory.cache().users_age();

        Self {
            config,
            directory,
            state: AppState::Normal,
            users: Vec::new(),
            list_source: None,
            selection: 0,
            error_message: None,
            status_message: None,
            cache_age,
            fetch_in_progress: false,
            result_rx: rx,
            result_tx: tx,
        }
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Spawn a background fetch from the API
    pub fn start_fetch(&mut self) {
        if self.fetch_in_progress {
            self.status_message = Some("Fetch already in progress...".to_string());
            return;
        }
        info!("Requesting users from API");

        let directory = self.directory.clone();
        let tx = self.result_tx.clone();

        tokio::spawn(async move {
            let result = directory.fetch_users().await;
            if let Err(e) = tx.send(LoadResult::Fetched(result)).await {
                error!(error = %e, "Failed to send fetch result - channel closed");
            }
        });

        self.fetch_in_progress = true;
        self.status_message = Some("Fetching users...".to_string());
    }

    /// Load the list from local storage. Runs inline; no network involved.
    pub fn load_cached(&mut self) {
        info!("Trying to load cached users");
        match self.directory.load_cached_users() {
            Ok(users) => {
                info!(count = users.len(), "Cached users loaded");
                self.show_users(users, ListSource::Cache);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load cached users");
                self.show_error(e.cache_status());
            }
        }
    }

    // =========================================================================
    // Background Results
    // =========================================================================

    /// Apply any results that background tasks have sent
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.process_load_result(result);
        }
    }

    fn process_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::Fetched(outcome) => {
                self.fetch_in_progress = false;
                self.status_message = None;
                match outcome {
                    Ok(users) => {
                        info!(count = users.len(), "Users fetched and saved");
                        self.show_users(users, ListSource::Api);
                        self.cache_age = self.directory.cache().users_age();
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to fetch users");
                        self.show_error(e.fetch_status());
                    }
                }
            }
        }
    }

    /// Replace the rendered list and clear the error area
    fn show_users(&mut self, users: Vec<User>, source: ListSource) {
        self.users = users;
        self.list_source = Some(source);
        self.selection = 0;
        self.error_message = None;
    }

    /// Show an error, leaving the rendered list untouched
    fn show_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The rendered list items, "First Last" each
    pub fn list_items(&self) -> Vec<String> {
        render_user_list(&self.users)
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selection)
    }

    pub fn cache_age_display(&self) -> String {
        self.cache_age.clone().unwrap_or_else(|| "never".to_string())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn select_next(&mut self) {
        if self.selection + 1 < self.users.len() {
            self.selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        let last = self.users.len().saturating_sub(1);
        self.selection = (self.selection + PAGE_SCROLL_SIZE).min(last);
    }

    pub fn page_up(&mut self) {
        self.selection = self.selection.saturating_sub(PAGE_SCROLL_SIZE);
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
    }

    pub fn select_last(&mut self) {
        self.selection = self.users.len().saturating_sub(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
