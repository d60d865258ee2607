//! Daily log form
//!
//! The form shows the user's preferred item kinds. Submitting it creates
//! today's entry or updates it in place.

use axum::{extract::State, Extension, Json};
use chrono::Local;
use diarylite_common::db::decode_content;
use diarylite_common::memories::readable_date;
use diarylite_common::ItemKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use super::auth::CurrentUser;
use crate::db::{entries, prefs};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

/// One field of the log form
#[derive(Debug, Serialize)]
pub struct LogField {
    pub category: i64,
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    /// Content already logged today, if any
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogFormResponse {
    pub date: String,
    pub has_logged: bool,
    pub items: Vec<LogField>,
}

/// Submitted log, keyed by item slug
#[derive(Debug, Deserialize)]
pub struct LogRequest {
    #[serde(default)]
    pub items: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub message: String,
    pub entry_id: i64,
}

/// GET /api/log
pub async fn get_log_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<LogFormResponse>> {
    let today = Local::now().date_naive();
    let preferred = prefs::list_preferred(&state.db, user.id).await?;

    let logged = entries::items_for_date(&state.db, user.id, today).await?;
    let has_logged = logged.is_some();
    let logged: HashMap<i64, Option<String>> = logged
        .unwrap_or_default()
        .into_iter()
        .map(|item| (item.category, item.content.as_deref().map(decode_content)))
        .collect();

    let items = preferred
        .into_iter()
        .map(|kind| LogField {
            category: kind.category(),
            name: kind.name(),
            slug: kind.slug(),
            description: kind.description(),
            content: logged.get(&kind.category()).cloned().flatten(),
        })
        .collect();

    Ok(Json(LogFormResponse {
        date: readable_date(today),
        has_logged,
        items,
    }))
}

/// POST /api/log
///
/// Fields for kinds outside the catalog, or not preferred, are ignored.
pub async fn submit_log(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(request): ApiJson<LogRequest>,
) -> ApiResult<Json<LogResponse>> {
    let now = Local::now().naive_local();
    let preferred = prefs::list_preferred(&state.db, user.id).await?;

    let mut contents: HashMap<ItemKind, String> = HashMap::new();
    for (slug, content) in request.items {
        match ItemKind::from_slug(&slug) {
            Some(kind) if preferred.contains(&kind) => {
                kind.validate_content(&content).map_err(ApiError::BadRequest)?;
                contents.insert(kind, content);
            }
            _ => debug!("Ignoring log field '{}'", slug),
        }
    }

    let saved = entries::save_daily_log(
        &state.db,
        user.id,
        now.date(),
        now,
        &preferred,
        &contents,
    )
    .await?;

    let message = if saved.created {
        info!("User {} logged new entry {}", user.id, saved.entry_id);
        "Logged new journal entry."
    } else {
        info!("User {} updated entry {}", user.id, saved.entry_id);
        "Updated journal entry."
    };

    Ok(Json(LogResponse {
        message: message.to_string(),
        entry_id: saved.entry_id,
    }))
}
