//! Database initialization and schema constraints

use diarylite_common::db::{init_database, SCHEMA_VERSION};
use sqlx::SqlitePool;

async fn fresh_pool() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("diarylite.db")).await.unwrap();
    (dir, pool)
}

async fn insert_user(pool: &SqlitePool, email: &str) -> i64 {
    sqlx::query(
        "INSERT INTO users (firstname, lastname, email, password_hash, password_salt, created_at)
         VALUES ('ada', 'lovelace', ?, 'h', 's', '2023-06-15 09:00:00')",
    )
    .bind(email)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("sub").join("diarylite.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("diarylite.db");

    let pool1 = init_database(&db_path).await.unwrap();
    insert_user(&pool1, "ada@example.com").await;
    pool1.close().await;

    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1, "Existing data should survive re-initialization");
}

#[tokio::test]
async fn test_all_tables_created() {
    let (_dir, pool) = fresh_pool().await;

    for table in ["schema_version", "users", "entries", "items", "prefs", "sessions"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists, "table {} missing", table);
    }

    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[tokio::test]
async fn test_email_is_unique() {
    let (_dir, pool) = fresh_pool().await;
    insert_user(&pool, "ada@example.com").await;

    let duplicate = sqlx::query(
        "INSERT INTO users (firstname, lastname, email, password_hash, password_salt, created_at)
         VALUES ('a', 'b', 'ada@example.com', 'h', 's', '2023-06-15 09:00:00')",
    )
    .execute(&pool)
    .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_one_entry_per_user_per_day() {
    let (_dir, pool) = fresh_pool().await;
    let user_id = insert_user(&pool, "ada@example.com").await;

    let insert = "INSERT INTO entries (user_id, log_date, logged_at) VALUES (?, '2023-06-15', '2023-06-15 10:00:00')";
    sqlx::query(insert).bind(user_id).execute(&pool).await.unwrap();
    assert!(sqlx::query(insert).bind(user_id).execute(&pool).await.is_err());
}

#[tokio::test]
async fn test_deleting_user_cascades() {
    let (_dir, pool) = fresh_pool().await;
    let user_id = insert_user(&pool, "ada@example.com").await;

    let entry_id = sqlx::query(
        "INSERT INTO entries (user_id, log_date, logged_at) VALUES (?, '2023-06-15', '2023-06-15 10:00:00')",
    )
    .bind(user_id)
    .execute(&pool)
    .await
    .unwrap()
    .last_insert_rowid();
    sqlx::query("INSERT INTO items (entry_id, category, content) VALUES (?, 1, 'aGk=')")
        .bind(entry_id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO prefs (user_id, category) VALUES (?, 1)")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    for table in ["entries", "items", "prefs"] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{} rows should cascade with the user", table);
    }
}
