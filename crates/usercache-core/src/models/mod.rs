//! Data models for usercache.
//!
//! - `User`: one record of the remote user list, with its shape checks

pub mod user;

pub use user::{render_user_list, users_from_records, validate_user_data, User};
