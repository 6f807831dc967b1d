//! Content module - handles posts, front-matter, and markdown rendering

mod error;
mod frontmatter;
mod markdown;
mod post;
pub mod repository;

pub use error::RepositoryError;
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{excerpt, Post, PostDetail};
pub use repository::{PostLookup, PostRepository};
