use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use hl_core::{
    Article, ArticleStore, Error, NewArticle, Note, NoteStore, PopulatedArticle, Result,
};

#[derive(Default)]
struct Inner {
    articles: Vec<Article>,
    notes: Vec<Note>,
}

/// Keeps both collections in process memory. The default backend for tests
/// and one-shot runs.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryStorage {
    async fn insert(&self, article: NewArticle) -> Result<Article> {
        let article = Article {
            id: Uuid::new_v4().to_string(),
            title: article.title,
            summary: article.summary,
            link: article.link,
            image: article.image,
            saved: false,
            notes: Vec::new(),
        };
        self.inner.write().await.articles.push(article.clone());
        Ok(article)
    }

    async fn find_all(&self) -> Result<Vec<Article>> {
        Ok(self.inner.read().await.articles.clone())
    }

    async fn find_by_saved(&self, saved: bool) -> Result<Vec<Article>> {
        Ok(self
            .inner
            .read()
            .await
            .articles
            .iter()
            .filter(|a| a.saved == saved)
            .cloned()
            .collect())
    }

    async fn find_populated(&self, id: &str) -> Result<PopulatedArticle> {
        let inner = self.inner.read().await;
        let article = inner
            .articles
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("article {}", id)))?;
        // Dangling references resolve to nothing and are skipped.
        let notes = article
            .notes
            .iter()
            .filter_map(|note_id| inner.notes.iter().find(|n| n.id == *note_id).cloned())
            .collect();
        Ok(PopulatedArticle { article, notes })
    }

    async fn delete_unsaved(&self) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.articles.len();
        inner.articles.retain(|a| a.saved);
        Ok((before - inner.articles.len()) as u64)
    }

    async fn update_saved(&self, id: &str, saved: bool, clear_notes: bool) -> Result<Article> {
        let mut inner = self.inner.write().await;
        let article = inner
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("article {}", id)))?;
        article.saved = saved;
        if clear_notes {
            article.notes.clear();
        }
        Ok(article.clone())
    }

    async fn append_note(&self, article_id: &str, note_id: &str) -> Result<Article> {
        let mut inner = self.inner.write().await;
        let article = inner
            .articles
            .iter_mut()
            .find(|a| a.id == article_id)
            .ok_or_else(|| Error::NotFound(format!("article {}", article_id)))?;
        article.notes.push(note_id.to_string());
        Ok(article.clone())
    }

    async fn remove_note_ref(&self, article_id: &str, note_id: &str) -> Result<Article> {
        let mut inner = self.inner.write().await;
        let article = inner
            .articles
            .iter_mut()
            .find(|a| a.id == article_id)
            .ok_or_else(|| Error::NotFound(format!("article {}", article_id)))?;
        article.notes.retain(|n| n != note_id);
        Ok(article.clone())
    }
}

#[async_trait]
impl NoteStore for MemoryStorage {
    async fn insert(&self, body: &str, article_id: &str) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            body: body.to_string(),
            article: article_id.to_string(),
        };
        self.inner.write().await.notes.push(note.clone());
        Ok(note)
    }

    async fn find_by_id(&self, id: &str) -> Result<Note> {
        self.inner
            .read()
            .await
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("note {}", id)))
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        let before = inner.notes.len();
        inner.notes.retain(|n| n.id != id);
        if inner.notes.len() == before {
            return Err(Error::NotFound(format!("note {}", id)));
        }
        Ok(())
    }
}
