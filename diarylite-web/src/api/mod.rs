//! HTTP API handlers for diarylite-web

pub mod account;
pub mod auth;
pub mod health;
pub mod home;
pub mod log;
pub mod memories;
pub mod prefs;

pub use account::{login, logout, register};
pub use auth::{require_session, CurrentUser};
pub use health::health_routes;
pub use home::{delete_all_entries, home};
pub use log::{get_log_form, submit_log};
pub use memories::search_memories;
pub use prefs::{get_prefs, update_prefs};
