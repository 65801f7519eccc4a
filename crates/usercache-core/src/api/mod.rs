//! REST API client module for the users endpoint.
//!
//! This module provides the `ApiClient` for fetching the raw user list
//! payload. Shape validation happens in `directory`, not here.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
