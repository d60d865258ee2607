//! Item preference database operations
//!
//! Preferences decide which item kinds appear in a user's daily log form.

use diarylite_common::{ItemKind, Result};
use sqlx::SqlitePool;
use tracing::warn;

/// The user's preferred item kinds, in category order
///
/// Categories that are no longer in the catalog are skipped.
pub async fn list_preferred(pool: &SqlitePool, user_id: i64) -> Result<Vec<ItemKind>> {
    let categories: Vec<i64> =
        sqlx::query_scalar("SELECT category FROM prefs WHERE user_id = ? ORDER BY category")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(categories
        .into_iter()
        .filter_map(|category| {
            let kind = ItemKind::from_category(category);
            if kind.is_none() {
                warn!("User {} has preference for unknown category {}", user_id, category);
            }
            kind
        })
        .collect())
}

/// Replace all of a user's preferences
pub async fn replace_preferred(pool: &SqlitePool, user_id: i64, kinds: &[ItemKind]) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM prefs WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for kind in kinds {
        sqlx::query("INSERT OR IGNORE INTO prefs (user_id, category) VALUES (?, ?)")
            .bind(user_id)
            .bind(kind.category())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
