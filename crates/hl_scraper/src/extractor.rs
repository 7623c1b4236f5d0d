use hl_core::RawRecord;
use scraper::{Html, Selector};

const STORY_BLOCK: &str = "div.story-list-story";
const HEADLINE: &str = "div.story-headline h3";
const HEADLINE_LINK: &str = "div.story-headline h3 a";
const SUMMARY: &str = "p";
const IMAGE: &str = ".story-image img";
const IMAGE_ATTR: &str = "data-hi-res-src";

/// Pulls story records out of an index page, one fixed structural pattern
/// per story block.
pub struct Extractor {
    block: Selector,
    headline: Selector,
    headline_link: Selector,
    summary: Selector,
    image: Selector,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            block: Selector::parse(STORY_BLOCK).unwrap(),
            headline: Selector::parse(HEADLINE).unwrap(),
            headline_link: Selector::parse(HEADLINE_LINK).unwrap(),
            summary: Selector::parse(SUMMARY).unwrap(),
            image: Selector::parse(IMAGE).unwrap(),
        }
    }

    /// One record per story block, in document order. A block with missing
    /// sub-elements comes back with empty fields instead of failing the
    /// whole batch.
    pub fn extract(&self, markup: &str) -> Vec<RawRecord> {
        let document = Html::parse_document(markup);
        document
            .select(&self.block)
            .map(|block| RawRecord {
                title: block
                    .select(&self.headline)
                    .next()
                    .map(|el| el.text().collect::<String>())
                    .unwrap_or_default(),
                summary: block
                    .select(&self.summary)
                    .next()
                    .map(|el| el.text().collect::<String>())
                    .unwrap_or_default(),
                link: block
                    .select(&self.headline_link)
                    .next()
                    .and_then(|el| el.value().attr("href"))
                    .unwrap_or_default()
                    .to_string(),
                image: block
                    .select(&self.image)
                    .next()
                    .and_then(|el| el.value().attr(IMAGE_ATTR))
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_BLOCK: &str = r#"
        <div class="story-list-story">
            <div class="story-headline">
                <h3><a href="https://example.com/story-1">First story</a></h3>
            </div>
            <p>Something happened.</p>
            <div class="story-image">
                <img data-hi-res-src="https://example.com/1.jpg" src="low.jpg">
            </div>
        </div>
    "#;

    #[test]
    fn extracts_all_fields_from_a_complete_block() {
        let records = Extractor::new().extract(GOOD_BLOCK);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "First story");
        assert_eq!(records[0].summary, "Something happened.");
        assert_eq!(records[0].link, "https://example.com/story-1");
        assert_eq!(records[0].image, "https://example.com/1.jpg");
    }

    #[test]
    fn missing_sub_elements_degrade_to_empty_fields() {
        let markup = r#"
            <div class="story-list-story">
                <div class="story-headline"><h3>No link here</h3></div>
            </div>
        "#;
        let records = Extractor::new().extract(markup);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "No link here");
        assert_eq!(records[0].summary, "");
        assert_eq!(records[0].link, "");
        assert_eq!(records[0].image, "");
    }

    #[test]
    fn preserves_document_order() {
        let markup = format!(
            r#"{}
            <div class="story-list-story">
                <div class="story-headline">
                    <h3><a href="https://example.com/story-2">Second story</a></h3>
                </div>
                <p>More happened.</p>
            </div>"#,
            GOOD_BLOCK
        );
        let records = Extractor::new().extract(&markup);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "First story");
        assert_eq!(records[1].title, "Second story");
        assert_eq!(records[1].image, "");
    }

    #[test]
    fn tolerates_markup_without_story_blocks() {
        assert!(Extractor::new().extract("<html><body>nope</body></html>").is_empty());
        assert!(Extractor::new().extract("").is_empty());
        assert!(Extractor::new().extract("<div class=\"story-list-story\"").is_empty());
    }
}
