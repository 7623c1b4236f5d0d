use async_trait::async_trait;

use crate::types::{Article, NewArticle, Note, PopulatedArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Persist a new article and assign its identity. Structurally identical
    /// duplicates are allowed.
    async fn insert(&self, article: NewArticle) -> Result<Article>;

    /// Get every stored article, saved or not
    async fn find_all(&self) -> Result<Vec<Article>>;

    /// Get all articles matching the saved flag
    async fn find_by_saved(&self, saved: bool) -> Result<Vec<Article>>;

    /// Get one article with its note references resolved
    async fn find_populated(&self, id: &str) -> Result<PopulatedArticle>;

    /// Bulk-delete every unsaved article, returning how many went away
    async fn delete_unsaved(&self) -> Result<u64>;

    /// Flip the saved flag; with `clear_notes` the note list is emptied too
    async fn update_saved(&self, id: &str, saved: bool, clear_notes: bool) -> Result<Article>;

    /// Append a note id to the article's note list
    async fn append_note(&self, article_id: &str, note_id: &str) -> Result<Article>;

    /// Pull a note id out of the article's note list
    async fn remove_note_ref(&self, article_id: &str, note_id: &str) -> Result<Article>;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note referencing its owning article. Does not touch the
    /// article's note list.
    async fn insert(&self, body: &str, article_id: &str) -> Result<Note>;

    /// Get one note by id
    async fn find_by_id(&self, id: &str) -> Result<Note>;

    /// Delete one note by id
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}
