//! Database models

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub log_date: NaiveDate,
    pub logged_at: NaiveDateTime,
}

/// One item of an entry; `content` is still base64 encoded
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub entry_id: i64,
    pub category: i64,
    pub content: Option<String>,
}
