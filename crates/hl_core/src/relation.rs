use std::sync::Arc;

use tracing::warn;

use crate::storage::{ArticleStore, NoteStore};
use crate::types::Note;
use crate::Result;

/// Keeps the article ↔ note relationship consistent across both stores.
///
/// Both operations are strict two-step sequences. There is no transaction
/// around the steps, so a failure between them leaves the documented
/// inconsistency window.
#[derive(Clone)]
pub struct RelationService {
    articles: Arc<dyn ArticleStore>,
    notes: Arc<dyn NoteStore>,
}

impl RelationService {
    pub fn new(articles: Arc<dyn ArticleStore>, notes: Arc<dyn NoteStore>) -> Self {
        Self { articles, notes }
    }

    /// Create a note, then append its id to the owning article's note list.
    ///
    /// If the append fails the note is left orphaned; the failure is logged,
    /// not retried, and the created note is still returned.
    pub async fn attach_note(&self, article_id: &str, body: &str) -> Result<Note> {
        let note = self.notes.insert(body, article_id).await?;
        if let Err(e) = self.articles.append_note(article_id, &note.id).await {
            warn!(
                "failed to reference note {} on article {}: {}",
                note.id, article_id, e
            );
        }
        Ok(note)
    }

    /// Delete a note, then pull its id from the owning article's note list.
    ///
    /// A failed delete aborts without touching the article.
    pub async fn detach_note(&self, note_id: &str, article_id: &str) -> Result<()> {
        self.notes.delete_by_id(note_id).await?;
        self.articles.remove_note_ref(article_id, note_id).await?;
        Ok(())
    }
}
