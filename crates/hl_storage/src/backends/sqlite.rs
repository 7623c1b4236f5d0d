use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use hl_core::{
    Article, ArticleStore, Error, NewArticle, Note, NoteStore, PopulatedArticle, Result,
};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        summary TEXT NOT NULL,
        link TEXT NOT NULL,
        image TEXT,
        saved INTEGER NOT NULL DEFAULT 0,
        notes TEXT NOT NULL DEFAULT '[]'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY,
        body TEXT NOT NULL,
        article TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

/// Durable backend over a single sqlite database. The article's note-id list
/// is persisted as a JSON string column, like the document it models.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect to `url` (e.g. `sqlite:headlines.db`), creating the database
    /// file if missing, and run migrations.
    pub async fn new_with_url(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| Error::Storage(format!("invalid database url {}: {}", url, e)))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("failed to connect to {}: {}", url, e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }

    async fn fetch_article(&self, id: &str) -> Result<Article> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to load article: {}", e)))?;
        match row {
            Some(row) => article_from_row(&row),
            None => Err(Error::NotFound(format!("article {}", id))),
        }
    }

    async fn persist_note_list(&self, id: &str, notes: &[String]) -> Result<()> {
        let notes = serde_json::to_string(notes)?;
        sqlx::query("UPDATE articles SET notes = ? WHERE id = ?")
            .bind(notes)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to update note list: {}", e)))?;
        Ok(())
    }
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    let notes: String = row.get("notes");
    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        summary: row.get("summary"),
        link: row.get("link"),
        image: row.get("image"),
        saved: row.get("saved"),
        notes: serde_json::from_str(&notes)?,
    })
}

fn note_from_row(row: &SqliteRow) -> Note {
    Note {
        id: row.get("id"),
        body: row.get("body"),
        article: row.get("article"),
    }
}

#[async_trait]
impl ArticleStore for SqliteStorage {
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
        sqlx::query(
            r#"
            INSERT INTO articles (id, title, summary, link, image, saved, notes)
            VALUES (?, ?, ?, ?, ?, ?, '[]')
            "#,
        )
        .bind(&article.id)
        .bind(&article.title)
        .bind(&article.summary)
        .bind(&article.link)
        .bind(article.image.as_deref())
        .bind(article.saved)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to insert article: {}", e)))?;
        Ok(article)
    }

    async fn find_all(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query("SELECT * FROM articles")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to list articles: {}", e)))?;
        rows.iter().map(article_from_row).collect()
    }

    async fn find_by_saved(&self, saved: bool) -> Result<Vec<Article>> {
        let rows = sqlx::query("SELECT * FROM articles WHERE saved = ?")
            .bind(saved)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to list articles: {}", e)))?;
        rows.iter().map(article_from_row).collect()
    }

    async fn find_populated(&self, id: &str) -> Result<PopulatedArticle> {
        let article = self.fetch_article(id).await?;
        let rows = sqlx::query("SELECT * FROM notes WHERE article = ?")
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to load notes: {}", e)))?;
        let owned: Vec<Note> = rows.iter().map(note_from_row).collect();
        // The article's list is authoritative; dangling ids are skipped.
        let notes = article
            .notes
            .iter()
            .filter_map(|note_id| owned.iter().find(|n| n.id == *note_id).cloned())
            .collect();
        Ok(PopulatedArticle { article, notes })
    }

    async fn delete_unsaved(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE saved = 0")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to delete unsaved articles: {}", e)))?;
        Ok(result.rows_affected())
    }

    async fn update_saved(&self, id: &str, saved: bool, clear_notes: bool) -> Result<Article> {
        let query = if clear_notes {
            sqlx::query("UPDATE articles SET saved = ?, notes = '[]' WHERE id = ?")
        } else {
            sqlx::query("UPDATE articles SET saved = ? WHERE id = ?")
        };
        let result = query
            .bind(saved)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to update article: {}", e)))?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("article {}", id)));
        }
        self.fetch_article(id).await
    }

    async fn append_note(&self, article_id: &str, note_id: &str) -> Result<Article> {
        let mut article = self.fetch_article(article_id).await?;
        article.notes.push(note_id.to_string());
        self.persist_note_list(article_id, &article.notes).await?;
        Ok(article)
    }

    async fn remove_note_ref(&self, article_id: &str, note_id: &str) -> Result<Article> {
        let mut article = self.fetch_article(article_id).await?;
        article.notes.retain(|n| n != note_id);
        self.persist_note_list(article_id, &article.notes).await?;
        Ok(article)
    }
}

#[async_trait]
impl NoteStore for SqliteStorage {
    async fn insert(&self, body: &str, article_id: &str) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            body: body.to_string(),
            article: article_id.to_string(),
        };
        sqlx::query("INSERT INTO notes (id, body, article) VALUES (?, ?, ?)")
            .bind(&note.id)
            .bind(&note.body)
            .bind(&note.article)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to insert note: {}", e)))?;
        Ok(note)
    }

    async fn find_by_id(&self, id: &str) -> Result<Note> {
        let row = sqlx::query("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to load note: {}", e)))?;
        row.map(|row| note_from_row(&row))
            .ok_or_else(|| Error::NotFound(format!("note {}", id)))
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to delete note: {}", e)))?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("note {}", id)));
        }
        Ok(())
    }
}
