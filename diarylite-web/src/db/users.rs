//! User account database operations

use chrono::NaiveDateTime;
use diarylite_common::accounts::PasswordHash;
use diarylite_common::db::User;
use diarylite_common::items::DEFAULT_CATEGORIES;
use diarylite_common::Result;
use sqlx::SqlitePool;

/// Fields for a new account, already validated
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub email: &'a str,
    pub password: &'a PasswordHash,
    pub created_at: NaiveDateTime,
}

/// Insert a user together with the default item preferences
///
/// Both happen in one transaction so a user never exists without prefs.
pub async fn create_user(pool: &SqlitePool, user: &NewUser<'_>) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let user_id = sqlx::query(
        r#"
        INSERT INTO users (firstname, lastname, email, password_hash, password_salt, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.firstname)
    .bind(user.lastname)
    .bind(user.email)
    .bind(&user.password.hash)
    .bind(&user.password.salt)
    .bind(user.created_at)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for category in DEFAULT_CATEGORIES {
        sqlx::query("INSERT INTO prefs (user_id, category) VALUES (?, ?)")
            .bind(user_id)
            .bind(category)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(user_id)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, firstname, lastname, email, password_hash, password_salt, created_at
         FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, firstname, lastname, email, password_hash, password_salt, created_at
         FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}
