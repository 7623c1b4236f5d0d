use serde::{Deserialize, Serialize};

/// A scraped story, optionally kept by the user past the next scrape cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub image: Option<String>,
    #[serde(default)]
    pub saved: bool,
    /// Note ids in insertion order. The authoritative membership list.
    #[serde(default)]
    pub notes: Vec<String>,
}

/// A user-authored annotation attached to one article. The `article` field
/// is a denormalized back-reference used for deletion cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub body: String,
    pub article: String,
}

/// A validated story candidate, before the store has assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub image: Option<String>,
}

/// Field values pulled out of one story block. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub image: String,
}

/// An article with its note references resolved into full records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulatedArticle {
    pub article: Article,
    pub notes: Vec<Note>,
}
