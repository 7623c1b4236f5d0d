use std::sync::Arc;

use hl_core::{ArticleStore, NoteStore, RelationService};
use hl_scraper::IngestPipeline;

/// Shared handles for the request handlers. Built once at startup from the
/// selected storage backend and the configured source URL.
pub struct AppState {
    pub articles: Arc<dyn ArticleStore>,
    pub notes: Arc<dyn NoteStore>,
    pub relations: RelationService,
    pub pipeline: IngestPipeline,
    pub source_url: String,
}

impl AppState {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        notes: Arc<dyn NoteStore>,
        source_url: impl Into<String>,
    ) -> Self {
        let relations = RelationService::new(articles.clone(), notes.clone());
        let pipeline = IngestPipeline::new(articles.clone());
        Self {
            articles,
            notes,
            relations,
            pipeline,
            source_url: source_url.into(),
        }
    }
}
