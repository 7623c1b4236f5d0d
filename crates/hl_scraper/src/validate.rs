use hl_core::{NewArticle, RawRecord};
use tracing::debug;

/// Accepts a record iff title, summary and link are all non-empty after
/// trimming. The image rides along and may be absent; rejected records are
/// dropped, never surfaced as an error.
pub fn validate(record: RawRecord) -> Option<NewArticle> {
    let title = record.title.trim();
    let summary = record.summary.trim();
    let link = record.link.trim();

    if title.is_empty() || summary.is_empty() || link.is_empty() {
        debug!("skipping story block with missing title, summary or link");
        return None;
    }

    let image = record.image.trim();
    Some(NewArticle {
        title: title.to_string(),
        summary: summary.to_string(),
        link: link.to_string(),
        image: (!image.is_empty()).then(|| image.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, summary: &str, link: &str, image: &str) -> RawRecord {
        RawRecord {
            title: title.to_string(),
            summary: summary.to_string(),
            link: link.to_string(),
            image: image.to_string(),
        }
    }

    #[test]
    fn accepts_when_required_fields_present() {
        let article = validate(record("t", "s", "l", "i")).unwrap();
        assert_eq!(article.title, "t");
        assert_eq!(article.summary, "s");
        assert_eq!(article.link, "l");
        assert_eq!(article.image.as_deref(), Some("i"));
    }

    #[test]
    fn image_presence_does_not_affect_acceptance() {
        let article = validate(record("t", "s", "l", "")).unwrap();
        assert_eq!(article.image, None);
    }

    #[test]
    fn rejects_any_missing_required_field() {
        assert!(validate(record("", "s", "l", "")).is_none());
        assert!(validate(record("t", "", "l", "")).is_none());
        assert!(validate(record("t", "s", "", "")).is_none());
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        assert!(validate(record("  \n", "s", "l", "")).is_none());
        let article = validate(record(" t ", " s ", " l ", " ")).unwrap();
        assert_eq!(article.title, "t");
        assert_eq!(article.image, None);
    }
}
