//! Post repository - reads posts from a flat directory of markdown files

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Post, RepositoryError};

/// Extension of post files
const POST_EXTENSION: &str = "md";

/// Result of looking up a single post
#[derive(Debug)]
pub enum PostLookup {
    /// The post file exists and was read
    Found(Post),
    /// No file for this slug
    NotFound,
    /// The file exists but could not be read
    ReadError(RepositoryError),
}

impl PostLookup {
    /// Collapse into an optional post, discarding the failure cause
    pub fn into_option(self) -> Option<Post> {
        match self {
            PostLookup::Found(post) => Some(post),
            PostLookup::NotFound | PostLookup::ReadError(_) => None,
        }
    }
}

/// Read-only view over a directory of posts.
///
/// Nothing is cached: every call goes back to the file system.
#[derive(Debug, Clone)]
pub struct PostRepository {
    posts_dir: PathBuf,
    excerpt_length: usize,
    excerpt_marker: String,
}

impl PostRepository {
    /// Create a repository over `posts_dir` with the default excerpt settings
    pub fn new<P: AsRef<Path>>(posts_dir: P) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            excerpt_length: 200,
            excerpt_marker: "...".to_string(),
        }
    }

    /// Override how listing excerpts are cut
    pub fn with_excerpt(mut self, length: usize, marker: &str) -> Self {
        self.excerpt_length = length;
        self.excerpt_marker = marker.to_string();
        self
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Load every post, newest first.
    ///
    /// Fails as a whole if the directory or any post file cannot be read.
    pub fn list_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Broken links and other unreadable entries only matter if they are posts
                Err(e) if e.depth() > 0 && !e.path().is_some_and(is_post_file) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
                Err(e) => return Err(self.walk_error(e)),
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_post_file(path) {
                continue;
            }

            let slug = slug_of(path);
            let source = read_source(path).map_err(|source| RepositoryError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

            posts.push(
                Post::parse(&slug, &source).with_excerpt(self.excerpt_length, &self.excerpt_marker),
            );
        }

        // Stable sort keeps file-name order among equal dates
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// Load the post stored in `<slug>.md`
    pub fn get_post_by_slug(&self, slug: &str) -> PostLookup {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejected post slug {:?}", slug);
            return PostLookup::NotFound;
        }

        let path = self.post_path(slug);
        match read_source(&path) {
            Ok(source) => PostLookup::Found(Post::parse(slug, &source)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => PostLookup::NotFound,
            Err(source) => PostLookup::ReadError(RepositoryError::FileRead { path, source }),
        }
    }

    fn post_path(&self, slug: &str) -> PathBuf {
        self.posts_dir.join(format!("{}.{}", slug, POST_EXTENSION))
    }

    fn walk_error(&self, err: walkdir::Error) -> RepositoryError {
        let depth = err.depth();
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.posts_dir.clone());
        let source = io::Error::from(err);

        if depth == 0 {
            RepositoryError::DirectoryRead { path, source }
        } else {
            RepositoryError::FileRead { path, source }
        }
    }
}

/// Read a post file, replacing invalid UTF-8 sequences with U+FFFD
fn read_source(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Check if a file is a post
fn is_post_file(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(POST_EXTENSION))
}

fn slug_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A slug must name a file directly inside the posts directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_post(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn post_source(title: &str, date: &str, body: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n{}", title, date, body)
    }

    #[test]
    fn test_list_posts_sorted_by_date_desc() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "old.md", &post_source("Old", "2023-01-01", "old body"));
        write_post(&dir, "new.md", &post_source("New", "2024-06-01", "new body"));
        write_post(&dir, "mid.md", &post_source("Mid", "2023-09-15", "mid body"));

        let posts = PostRepository::new(dir.path()).list_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);

        for pair in posts.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn test_list_posts_one_per_markdown_file() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "a.md", "A");
        write_post(&dir, "b.md", "B");
        write_post(&dir, "notes.txt", "not a post");
        write_post(&dir, "c.markdown", "wrong extension");
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.md"), "deep").unwrap();

        let posts = PostRepository::new(dir.path()).list_posts().unwrap();
        let mut slugs: Vec<_> = posts.iter().map(|p| p.slug.clone()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[test]
    fn test_list_posts_equal_dates_keep_file_name_order() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "b.md", "B");
        write_post(&dir, "a.md", "A");
        write_post(&dir, "c.md", &post_source("C", "2024-01-01", "C"));

        let posts = PostRepository::new(dir.path()).list_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_list_posts_computes_excerpt() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "long.md", &"x".repeat(300));
        write_post(&dir, "short.md", "tiny");

        let posts = PostRepository::new(dir.path()).list_posts().unwrap();
        let long = posts.iter().find(|p| p.slug == "long").unwrap();
        let short = posts.iter().find(|p| p.slug == "short").unwrap();
        assert_eq!(long.excerpt.as_ref().unwrap().chars().count(), 203);
        assert_eq!(short.excerpt.as_deref(), Some("tiny..."));
    }

    #[test]
    fn test_list_posts_custom_excerpt() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "p.md", "abcdefgh");

        let posts = PostRepository::new(dir.path())
            .with_excerpt(3, " [more]")
            .list_posts()
            .unwrap();
        assert_eq!(posts[0].excerpt.as_deref(), Some("abc [more]"));
    }

    #[test]
    fn test_list_posts_empty_directory() {
        let dir = TempDir::new().unwrap();
        let posts = PostRepository::new(dir.path()).list_posts().unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_list_posts_missing_directory() {
        let dir = TempDir::new().unwrap();
        let repo = PostRepository::new(dir.path().join("missing"));
        let err = repo.list_posts().unwrap_err();
        assert!(matches!(err, RepositoryError::DirectoryRead { .. }));
    }

    #[test]
    fn test_get_post_by_slug() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "hello.md", &post_source("Hello", "2024-02-02", "# Hi\n"));

        let post = match PostRepository::new(dir.path()).get_post_by_slug("hello") {
            PostLookup::Found(post) => post,
            other => panic!("expected post, got {:?}", other),
        };
        assert_eq!(post.slug, "hello");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.date, "2024-02-02");
        assert_eq!(post.content, "# Hi\n");
        assert_eq!(post.excerpt, None);
    }

    #[test]
    fn test_get_post_without_frontmatter() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "plain.md", "No metadata here");

        let post = PostRepository::new(dir.path())
            .get_post_by_slug("plain")
            .into_option()
            .unwrap();
        assert_eq!(post.title, "plain");
        assert_eq!(post.date, "");
        assert_eq!(post.content, "No metadata here");
    }

    #[test]
    fn test_get_post_nonexistent() {
        let dir = TempDir::new().unwrap();
        let lookup = PostRepository::new(dir.path()).get_post_by_slug("nonexistent");
        assert!(matches!(lookup, PostLookup::NotFound));
    }

    #[test]
    fn test_get_post_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("posts");
        fs::create_dir(&posts_dir).unwrap();
        fs::write(dir.path().join("secret.md"), "secret").unwrap();

        let repo = PostRepository::new(&posts_dir);
        for slug in ["../secret", "", ".", "..", "a\\b", "a\0b"] {
            assert!(matches!(repo.get_post_by_slug(slug), PostLookup::NotFound));
        }
    }

    #[test]
    fn test_get_post_read_error_is_distinct() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("folder.md")).unwrap();

        let lookup = PostRepository::new(dir.path()).get_post_by_slug("folder");
        assert!(matches!(
            lookup,
            PostLookup::ReadError(RepositoryError::FileRead { .. })
        ));
        assert!(lookup.into_option().is_none());
    }

    #[test]
    fn test_get_post_missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = PostRepository::new(dir.path().join("missing"));
        assert!(matches!(
            repo.get_post_by_slug("anything"),
            PostLookup::NotFound
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_posts_skips_broken_non_post_link() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "a.md", &post_source("A", "2024-01-01", "body"));
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("link.txt"))
            .unwrap();

        let posts = PostRepository::new(dir.path()).list_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_posts_broken_post_link_fails() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "a.md", "A");
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("b.md")).unwrap();

        let err = PostRepository::new(dir.path()).list_posts().unwrap_err();
        assert!(matches!(err, RepositoryError::FileRead { .. }));
    }

    #[test]
    fn test_invalid_utf8_post_is_decoded_lossily() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("latin1.md"), b"---\ntitle: Cafe\n---\ncaf\xe9").unwrap();
        let repo = PostRepository::new(dir.path());

        let posts = repo.list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Cafe");

        let post = match repo.get_post_by_slug("latin1") {
            PostLookup::Found(post) => post,
            other => panic!("expected post, got {:?}", other),
        };
        assert_eq!(post.content, "caf\u{FFFD}");
    }
}
