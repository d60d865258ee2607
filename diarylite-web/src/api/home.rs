//! Home dashboard and bulk entry deletion

use axum::{extract::State, Extension, Json};
use chrono::Local;
use serde::Serialize;

use super::auth::CurrentUser;
use crate::db::{entries, users};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub firstname: String,
    /// Account was created today
    pub first_time: bool,
    /// An entry already exists for today
    pub has_logged: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteEntriesResponse {
    pub deleted_entries: u64,
    pub deleted_items: u64,
}

/// First character uppercase, the rest lowercase
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// GET /api/home
pub async fn home(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<HomeResponse>> {
    let account = users::find_by_id(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", user.id)))?;

    let today = Local::now().date_naive();
    let has_logged = entries::find_entry_for_date(&state.db, user.id, today)
        .await?
        .is_some();

    Ok(Json(HomeResponse {
        firstname: capitalize(&account.firstname),
        first_time: account.created_at.date() == today,
        has_logged,
    }))
}

/// DELETE /api/entries
///
/// Removes every entry the user has logged, with their items.
pub async fn delete_all_entries(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<DeleteEntriesResponse>> {
    let (deleted_entries, deleted_items) = entries::delete_all_for_user(&state.db, user.id).await?;

    Ok(Json(DeleteEntriesResponse {
        deleted_entries,
        deleted_items,
    }))
}

#[cfg(test)]
mod tests {
    use super::capitalize;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ada"), "Ada");
        assert_eq!(capitalize("mARY"), "Mary");
        assert_eq!(capitalize("élodie"), "Élodie");
        assert_eq!(capitalize(""), "");
    }
}
