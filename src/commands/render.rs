//! Render a single post to HTML

use anyhow::{bail, Result};
use std::io::Write;

use crate::content::PostLookup;
use crate::Folio;

/// Print the rendered HTML of the post named `slug`
pub fn run(folio: &Folio, slug: &str) -> Result<()> {
    let stdout = std::io::stdout();
    write_post(folio, slug, &mut stdout.lock())
}

fn write_post(folio: &Folio, slug: &str, out: &mut impl Write) -> Result<()> {
    let post = match folio.repository().get_post_by_slug(slug) {
        PostLookup::Found(post) => post,
        PostLookup::NotFound => bail!("Post not found: {}", slug),
        PostLookup::ReadError(e) => return Err(e.into()),
    };

    tracing::debug!("Rendering {:?} ({} bytes of markdown)", post.slug, post.content.len());
    let html = folio.renderer().render(&post.content);
    out.write_all(html.as_bytes())?;

    Ok(())
}
