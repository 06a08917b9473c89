//! Gallery API endpoints
//!
//! Thin wrappers: each handler parses query parameters, runs one query
//! engine call on the blocking pool (a read may trigger a synchronous
//! rescan) and serialises the result. No filtering or pagination logic
//! lives here.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::index::{FolderRecord, ImageRecord};
use crate::query::{Page, PageRequest, DEFAULT_PAGE_SIZE};
use super::AppState;
use super::error::ApiError;

/// Query parameters for the random image endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomParams {
    /// Restrict the draw to one folder (exact, case-insensitive)
    pub folder: Option<String>,
    /// Comma-separated tag list; any match qualifies
    pub tags: Option<String>,
}

/// Query parameters for the paginated gallery endpoint
///
/// Pagination values are signed so that out-of-range input, negative
/// included, is clamped rather than rejected by deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryParams {
    /// 1-based page number, defaults to 1
    pub page: Option<i64>,
    /// Items per page, defaults to 20, clamped to [1,100]
    pub page_size: Option<i64>,
    pub folder: Option<String>,
    pub tags: Option<String>,
}

/// Query parameters for the folder listing endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderParams {
    pub tags: Option<String>,
}

/// Response body for the health endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub built_at: DateTime<Utc>,
    pub image_count: usize,
    pub folder_count: usize,
}

/// Split a comma-separated tag parameter, dropping blank segments
fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map_or_else(Vec::new, |value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}

/// Run one engine call on the blocking pool
async fn run_query<T, F>(state: &Arc<AppState>, query: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&crate::query::QueryEngine) -> T + Send + 'static,
{
    let engine = state.engine.clone();
    tokio::task::spawn_blocking(move || query(&engine))
        .await
        .map_err(|_| ApiError::internal("query task failed"))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let snapshot = run_query(&state, |engine| engine.snapshot()).await?;
    Ok(Json(HealthResponse {
        status: "ok",
        built_at: snapshot.built_at,
        image_count: snapshot.images.len(),
        folder_count: snapshot.folders.len(),
    }))
}

pub async fn random_image(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomParams>,
) -> Result<Json<ImageRecord>, ApiError> {
    let image = run_query(&state, move |engine| {
        let tags = parse_tags(params.tags.as_deref());
        engine.random_image(params.folder.as_deref(), &tags)
    })
    .await?;

    image
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no image matches the requested filters"))
}

pub async fn gallery(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GalleryParams>,
) -> Result<Json<Page<ImageRecord>>, ApiError> {
    let page = run_query(&state, move |engine| {
        let request = PageRequest::new(
            usize::try_from(params.page.unwrap_or(1)).unwrap_or(1),
            usize::try_from(params.page_size.unwrap_or(DEFAULT_PAGE_SIZE as i64)).unwrap_or(1),
        );
        let tags = parse_tags(params.tags.as_deref());
        engine.images(request, params.folder.as_deref(), &tags)
    })
    .await?;

    Ok(Json(page))
}

pub async fn folders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FolderParams>,
) -> Result<Json<Vec<FolderRecord>>, ApiError> {
    let folders = run_query(&state, move |engine| {
        let tags = parse_tags(params.tags.as_deref());
        engine.folders(&tags)
    })
    .await?;

    Ok(Json(folders))
}

pub async fn all_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let tags = run_query(&state, |engine| engine.all_tags()).await?;
    Ok(Json(tags))
}
