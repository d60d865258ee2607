//! Database access layer for diarylite-web
//!
//! One module per table group. Schema creation lives in
//! `diarylite_common::db`.

pub mod entries;
pub mod prefs;
pub mod sessions;
pub mod users;
