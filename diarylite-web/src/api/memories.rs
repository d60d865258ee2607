//! Memory search
//!
//! Looks up the entry for a typed date together with the entries of the
//! day before and the day after.

use axum::{extract::State, Extension, Json};
use chrono::{Local, NaiveDate};
use diarylite_common::db::{decode_content, Item};
use diarylite_common::memories::{parse_memory_query, readable_date};
use diarylite_common::ItemKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::auth::CurrentUser;
use crate::db::entries;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MemorySearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct MemoryItem {
    pub category: i64,
    pub name: &'static str,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MemorySearchResponse {
    pub date: String,
    pub items: Vec<MemoryItem>,
    pub previous_day: Option<Vec<MemoryItem>>,
    pub next_day: Option<Vec<MemoryItem>>,
}

fn to_memory_items(items: Vec<Item>) -> Vec<MemoryItem> {
    items
        .into_iter()
        .filter_map(|item| match ItemKind::from_category(item.category) {
            Some(kind) => Some(MemoryItem {
                category: item.category,
                name: kind.name(),
                content: item.content.as_deref().map(decode_content),
            }),
            None => {
                warn!("Skipping item {} with unknown category {}", item.id, item.category);
                None
            }
        })
        .collect()
}

async fn adjacent_day(
    state: &AppState,
    user_id: i64,
    date: Option<NaiveDate>,
) -> ApiResult<Option<Vec<MemoryItem>>> {
    match date {
        Some(date) => Ok(entries::items_for_date(&state.db, user_id, date)
            .await?
            .map(to_memory_items)),
        None => Ok(None),
    }
}

/// POST /api/memories/search
pub async fn search_memories(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(request): ApiJson<MemorySearchRequest>,
) -> ApiResult<Json<MemorySearchResponse>> {
    let today = Local::now().date_naive();
    let date = parse_memory_query(&request.query, today)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    debug!("User {} searching memories for {}", user.id, date);

    let items = entries::items_for_date(&state.db, user.id, date)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No log entry available for that date. Try a different date.".to_string())
        })?;

    let previous_day = adjacent_day(&state, user.id, date.pred_opt()).await?;
    let next_day = adjacent_day(&state, user.id, date.succ_opt()).await?;

    Ok(Json(MemorySearchResponse {
        date: readable_date(date),
        items: to_memory_items(items),
        previous_day,
        next_day,
    }))
}
