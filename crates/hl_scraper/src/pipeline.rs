use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use hl_core::{ArticleStore, Error, Result};

use crate::extractor::Extractor;
use crate::validate::validate;

/// One ingest cycle: clear unsaved articles, fetch the index page, extract
/// and validate story blocks, insert what survives.
pub struct IngestPipeline {
    store: Arc<dyn ArticleStore>,
    client: reqwest::Client,
    extractor: Extractor,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn ArticleStore>) -> Self {
        Self {
            store,
            client: reqwest::Client::new(),
            extractor: Extractor::new(),
        }
    }

    /// Returns the number of accepted records whose insert was attempted.
    ///
    /// Unsaved articles from the previous cycle are deleted before the fetch,
    /// and that delete is not rolled back if the fetch fails. A failed insert
    /// of a single record is logged and does not abort the batch or lower
    /// the count.
    pub async fn scrape_and_ingest(&self, source_url: &str) -> Result<usize> {
        let removed = self.store.delete_unsaved().await?;
        info!("cleared {} unsaved articles", removed);

        let url = Url::parse(source_url)
            .map_err(|e| Error::Fetch(format!("invalid source url {}: {}", source_url, e)))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("GET {} failed: {}", source_url, e)))?;
        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "GET {} returned {}",
                source_url,
                response.status()
            )));
        }
        let body = response.text().await?;

        let mut inserted = 0;
        for record in self.extractor.extract(&body) {
            let Some(article) = validate(record) else {
                continue;
            };
            inserted += 1;
            if let Err(e) = self.store.insert(article).await {
                warn!("failed to insert article: {}", e);
            }
        }
        info!("ingested {} articles from {}", inserted, source_url);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_core::NewArticle;
    use hl_storage::MemoryStorage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const PAGE: &str = r#"
        <html><body>
        <div class="story-list-story">
            <div class="story-headline">
                <h3><a href="https://example.com/story-1">First story</a></h3>
            </div>
            <p>Something happened.</p>
            <div class="story-image">
                <img data-hi-res-src="https://example.com/1.jpg">
            </div>
        </div>
        <div class="story-list-story">
            <div class="story-headline"><h3>No link on this one</h3></div>
            <p>Still a paragraph.</p>
        </div>
        <div class="story-list-story">
            <div class="story-headline">
                <h3><a href="https://example.com/story-2">Second story</a></h3>
            </div>
            <p>More happened.</p>
        </div>
        </body></html>
    "#;

    /// Serves `body` with `status` on a local port for the lifetime of the
    /// test, one connection at a time.
    async fn serve_fixture(status: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
        format!("http://{}", addr)
    }

    fn pipeline(store: Arc<MemoryStorage>) -> IngestPipeline {
        IngestPipeline::new(store)
    }

    async fn seed_unsaved(store: &MemoryStorage) -> String {
        let article = ArticleStore::insert(
            store,
            NewArticle {
                title: "Stale".to_string(),
                summary: "From the last cycle".to_string(),
                link: "https://example.com/stale".to_string(),
                image: None,
            },
        )
        .await
        .unwrap();
        article.id
    }

    #[tokio::test]
    async fn ingests_valid_blocks_and_skips_malformed_ones() {
        let url = serve_fixture("200 OK", PAGE).await;
        let store = Arc::new(MemoryStorage::new());

        let count = pipeline(store.clone()).scrape_and_ingest(&url).await.unwrap();

        assert_eq!(count, 2);
        let articles = store.find_by_saved(false).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First story");
        assert_eq!(articles[0].image.as_deref(), Some("https://example.com/1.jpg"));
        assert_eq!(articles[1].title, "Second story");
        assert_eq!(articles[1].image, None);
        assert!(articles.iter().all(|a| !a.saved && a.notes.is_empty()));
    }

    #[tokio::test]
    async fn repeated_ingest_is_idempotent() {
        let url = serve_fixture("200 OK", PAGE).await;
        let store = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(store.clone());

        let first = pipeline.scrape_and_ingest(&url).await.unwrap();
        let second = pipeline.scrape_and_ingest(&url).await.unwrap();

        assert_eq!(first, second);
        // The second cycle cleared everything the first one inserted.
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn saved_articles_survive_the_clear() {
        let url = serve_fixture("200 OK", PAGE).await;
        let store = Arc::new(MemoryStorage::new());
        let stale_id = seed_unsaved(&store).await;
        let kept = ArticleStore::insert(
            &*store,
            NewArticle {
                title: "Keeper".to_string(),
                summary: "Saved by the user".to_string(),
                link: "https://example.com/keeper".to_string(),
                image: None,
            },
        )
        .await
        .unwrap();
        store.update_saved(&kept.id, true, false).await.unwrap();

        pipeline(store.clone()).scrape_and_ingest(&url).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert!(all.iter().any(|a| a.id == kept.id));
        assert!(all.iter().all(|a| a.id != stale_id));
    }

    #[tokio::test]
    async fn failed_fetch_reports_error_after_the_clear() {
        let url = serve_fixture("500 Internal Server Error", "boom").await;
        let store = Arc::new(MemoryStorage::new());
        seed_unsaved(&store).await;

        let result = pipeline(store.clone()).scrape_and_ingest(&url).await;

        assert!(matches!(result, Err(Error::Fetch(_))));
        // The clear already ran and nothing new was inserted.
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_source_is_a_fetch_error() {
        let store = Arc::new(MemoryStorage::new());
        let result = pipeline(store)
            .scrape_and_ingest("http://127.0.0.1:1/nothing-listens-here")
            .await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }

    #[tokio::test]
    async fn invalid_url_is_a_fetch_error() {
        let store = Arc::new(MemoryStorage::new());
        let result = pipeline(store).scrape_and_ingest("not a url").await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }
}
