//! # DiaryLite Common Library
//!
//! Shared code for the DiaryLite journaling service:
//! - Database schema initialization and row models
//! - Item catalog (the kinds of things a daily log can hold)
//! - Account validation and password hashing
//! - Memory search date parsing
//! - Configuration loading

pub mod accounts;
pub mod config;
pub mod db;
pub mod error;
pub mod items;
pub mod memories;

pub use error::{Error, Result};
pub use items::ItemKind;
