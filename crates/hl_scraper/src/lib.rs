pub mod extractor;
pub mod pipeline;
pub mod validate;

pub use extractor::Extractor;
pub use pipeline::IngestPipeline;
pub use validate::validate;

pub mod prelude {
    pub use super::{Extractor, IngestPipeline};
    pub use hl_core::{Article, Error, Result};
}
