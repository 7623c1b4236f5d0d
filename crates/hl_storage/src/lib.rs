use std::sync::Arc;

use tracing::info;

use hl_core::{ArticleStore, Error, NoteStore, Result};

pub mod backends;

pub use backends::{MemoryStorage, SqliteStorage};

/// Both store handles for one backend instance. They are clones of a single
/// struct so populate sees one set of collections.
pub type StoreHandles = (Arc<dyn ArticleStore>, Arc<dyn NoteStore>);

const DEFAULT_SQLITE_URL: &str = "sqlite:headlines.db";

/// Build the storage backend named by `kind` ("memory" or "sqlite").
pub async fn create_storage(kind: &str, url: Option<&str>) -> Result<StoreHandles> {
    match kind {
        "memory" => {
            let storage = Arc::new(MemoryStorage::new());
            let articles: Arc<dyn ArticleStore> = storage.clone();
            let notes: Arc<dyn NoteStore> = storage;
            Ok((articles, notes))
        }
        "sqlite" => {
            let url = url.unwrap_or(DEFAULT_SQLITE_URL);
            info!("connecting to {}", url);
            let storage = Arc::new(SqliteStorage::new_with_url(url).await?);
            let articles: Arc<dyn ArticleStore> = storage.clone();
            let notes: Arc<dyn NoteStore> = storage;
            Ok((articles, notes))
        }
        other => Err(Error::Storage(format!("unknown storage backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StoreHandles};
}
