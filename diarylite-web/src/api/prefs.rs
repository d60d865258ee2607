//! Item preferences

use axum::{extract::State, Extension, Json};
use diarylite_common::ItemKind;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::CurrentUser;
use crate::db::prefs;
use crate::error::{ApiJson, ApiResult};
use crate::AppState;

/// A catalog entry with the user's choice
#[derive(Debug, Serialize)]
pub struct PrefItem {
    pub category: i64,
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct PrefsResponse {
    pub items: Vec<PrefItem>,
}

/// Slugs of the kinds to enable; everything else is disabled
#[derive(Debug, Deserialize)]
pub struct UpdatePrefsRequest {
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdatePrefsResponse {
    pub message: String,
    pub categories: Vec<i64>,
}

/// GET /api/prefs
pub async fn get_prefs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<PrefsResponse>> {
    let preferred = prefs::list_preferred(&state.db, user.id).await?;

    let items = ItemKind::all()
        .into_iter()
        .map(|kind| PrefItem {
            category: kind.category(),
            name: kind.name(),
            slug: kind.slug(),
            description: kind.description(),
            enabled: preferred.contains(&kind),
        })
        .collect();

    Ok(Json(PrefsResponse { items }))
}

/// POST /api/prefs
///
/// Unknown slugs are ignored and duplicates collapse.
pub async fn update_prefs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(request): ApiJson<UpdatePrefsRequest>,
) -> ApiResult<Json<UpdatePrefsResponse>> {
    let selected: Vec<ItemKind> = ItemKind::all()
        .into_iter()
        .filter(|kind| {
            request
                .items
                .iter()
                .any(|slug| ItemKind::from_slug(slug) == Some(*kind))
        })
        .collect();

    prefs::replace_preferred(&state.db, user.id, &selected).await?;

    let categories: Vec<i64> = selected.iter().map(|kind| kind.category()).collect();
    info!("User {} preferences now {:?}", user.id, categories);

    Ok(Json(UpdatePrefsResponse {
        message: "Updated Preferences".to_string(),
        categories,
    }))
}
