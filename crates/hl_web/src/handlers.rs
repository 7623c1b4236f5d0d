use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use hl_core::{Article, Note, PopulatedArticle};

use crate::error::ApiError;
use crate::AppState;

/// Run one ingest cycle against the configured source, then send the caller
/// back to the listing. Failures are logged, never rendered.
pub async fn scrape(State(state): State<Arc<AppState>>) -> Redirect {
    if let Err(e) = state.pipeline.scrape_and_ingest(&state.source_url).await {
        warn!("scrape failed: {}", e);
    }
    Redirect::to("/")
}

/// The home listing: articles not yet saved by the user.
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.articles.find_by_saved(false).await?))
}

/// Saved articles, notes populated.
pub async fn saved(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PopulatedArticle>>, ApiError> {
    let mut populated = Vec::new();
    for article in state.articles.find_by_saved(true).await? {
        populated.push(state.articles.find_populated(&article.id).await?);
    }
    Ok(Json(populated))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.articles.find_all().await?))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PopulatedArticle>, ApiError> {
    Ok(Json(state.articles.find_populated(&id).await?))
}

pub async fn save_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.articles.update_saved(&id, true, false).await?))
}

/// "Delete" from the user's point of view: un-save and detach all notes.
/// The document itself stays until the next scrape cycle clears it.
pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.articles.update_saved(&id, false, true).await?))
}

#[derive(Debug, Deserialize)]
pub struct NotePayload {
    pub text: String,
}

pub async fn save_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<NotePayload>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.relations.attach_note(&id, &payload.text).await?))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path((note_id, article_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.relations.detach_note(&note_id, &article_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
