//! Post model

use serde::Serialize;

use super::FrontMatter;

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Filename stem, unique within the posts directory
    pub slug: String,

    /// Post title (falls back to the slug)
    pub title: String,

    /// Publication date as written in the front-matter, or empty
    pub date: String,

    /// Raw markdown body, front-matter excluded
    pub content: String,

    /// Listing preview, only set by `PostRepository::list_posts`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl Post {
    /// Build a post from a file's slug and full text
    pub fn parse(slug: &str, source: &str) -> Self {
        let (fm, body) = FrontMatter::parse(source);
        Self {
            slug: slug.to_string(),
            title: fm
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| slug.to_string()),
            date: fm.date.unwrap_or_default(),
            content: body.to_string(),
            excerpt: None,
        }
    }

    /// Attach a listing excerpt
    pub fn with_excerpt(mut self, length: usize, marker: &str) -> Self {
        self.excerpt = Some(excerpt(&self.content, length, marker));
        self
    }
}

/// A post together with its rendered HTML, as served by the detail endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,

    #[serde(rename = "htmlContent")]
    pub html_content: String,
}

/// First `length` characters of `content` followed by `marker`.
///
/// The marker is always appended, even when nothing was cut.
pub fn excerpt(content: &str, length: usize, marker: &str) -> String {
    let mut out: String = content.chars().take(length).collect();
    out.push_str(marker);
    out
}
