//! Diary entry and item database operations

use chrono::{NaiveDate, NaiveDateTime};
use diarylite_common::db::{encode_content, Entry, Item};
use diarylite_common::{ItemKind, Result};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of saving the daily log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedLog {
    pub entry_id: i64,
    /// True when this save created the day's entry
    pub created: bool,
}

pub async fn find_entry_for_date(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Option<Entry>> {
    let entry = sqlx::query_as::<_, Entry>(
        "SELECT id, user_id, log_date, logged_at FROM entries WHERE user_id = ? AND log_date = ?",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

pub async fn items_for_entry(pool: &SqlitePool, entry_id: i64) -> Result<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        "SELECT id, entry_id, category, content FROM items WHERE entry_id = ? ORDER BY category",
    )
    .bind(entry_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Items logged on `date`, or `None` when there is no entry that day
pub async fn items_for_date(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Option<Vec<Item>>> {
    match find_entry_for_date(pool, user_id, date).await? {
        Some(entry) => Ok(Some(items_for_entry(pool, entry.id).await?)),
        None => Ok(None),
    }
}

/// Create or update the entry for `date`
///
/// Every preferred kind gets an item holding the submitted content (empty
/// when the kind was not submitted). Items of kinds that are no longer
/// preferred keep their row but lose their content.
pub async fn save_daily_log(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    now: NaiveDateTime,
    preferred: &[ItemKind],
    contents: &HashMap<ItemKind, String>,
) -> Result<SavedLog> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO entries (user_id, log_date, logged_at)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, log_date) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let entry_id: i64 =
        sqlx::query_scalar("SELECT id FROM entries WHERE user_id = ? AND log_date = ?")
            .bind(user_id)
            .bind(date)
            .fetch_one(&mut *tx)
            .await?;

    let created = inserted > 0;
    if !created {
        sqlx::query("UPDATE items SET content = NULL WHERE entry_id = ?")
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;
    }

    for kind in preferred {
        let content = contents.get(kind).map(String::as_str).unwrap_or("");
        sqlx::query(
            r#"
            INSERT INTO items (entry_id, category, content)
            VALUES (?, ?, ?)
            ON CONFLICT (entry_id, category) DO UPDATE SET content = excluded.content
            "#,
        )
        .bind(entry_id)
        .bind(kind.category())
        .bind(encode_content(content))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    debug!(
        "Saved {} item(s) for user {} on {} (entry {})",
        preferred.len(),
        user_id,
        date,
        entry_id
    );

    Ok(SavedLog { entry_id, created })
}

/// Delete every entry and item belonging to a user
///
/// Returns `(entries_deleted, items_deleted)`.
pub async fn delete_all_for_user(pool: &SqlitePool, user_id: i64) -> Result<(u64, u64)> {
    let mut tx = pool.begin().await?;

    let items = sqlx::query(
        "DELETE FROM items WHERE entry_id IN (SELECT id FROM entries WHERE user_id = ?)",
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let entries = sqlx::query("DELETE FROM entries WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    info!(
        "Deleted {} entries and {} items for user {}",
        entries, items, user_id
    );

    Ok((entries, items))
}
