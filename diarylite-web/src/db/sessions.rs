//! Login session database operations
//!
//! A session is an opaque random token mapped to a user id. Sessions older
//! than [`SESSION_MAX_AGE_DAYS`] no longer authenticate and are pruned on
//! the next login.

use diarylite_common::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Lifetime of a session, counted from its creation
pub const SESSION_MAX_AGE_DAYS: i64 = 30;

/// SQLite `datetime('now', ?)` modifier for the expiry cutoff
fn expiry_modifier() -> String {
    format!("-{} days", SESSION_MAX_AGE_DAYS)
}

pub async fn create_session(pool: &SqlitePool, token: &str, user_id: i64) -> Result<()> {
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES (?, ?)")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// User id owning `token`, if the session exists and has not expired
pub async fn find_user_for_token(pool: &SqlitePool, token: &str) -> Result<Option<i64>> {
    let user_id: Option<i64> = sqlx::query_scalar(
        "SELECT user_id FROM sessions WHERE token = ? AND created_at >= datetime('now', ?)",
    )
    .bind(token)
    .bind(expiry_modifier())
    .fetch_optional(pool)
    .await?;

    Ok(user_id)
}

/// Remove a session; returns whether it existed
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every expired session; returns how many were removed
pub async fn prune_expired(pool: &SqlitePool) -> Result<u64> {
    let pruned = sqlx::query("DELETE FROM sessions WHERE created_at < datetime('now', ?)")
        .bind(expiry_modifier())
        .execute(pool)
        .await?
        .rows_affected();

    if pruned > 0 {
        debug!("Pruned {} expired session(s)", pruned);
    }

    Ok(pruned)
}
