pub mod error;
pub mod relation;
pub mod storage;
pub mod types;

pub use error::Error;
pub use relation::RelationService;
pub use storage::{ArticleStore, NoteStore};
pub use types::{Article, NewArticle, Note, PopulatedArticle, RawRecord};

pub type Result<T> = std::result::Result<T, Error>;
