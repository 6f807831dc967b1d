//! List blog posts

use anyhow::Result;
use std::io::Write;

use crate::helpers::display_date;
use crate::Folio;

/// Print every post, newest first
pub fn run(folio: &Folio) -> Result<()> {
    let stdout = std::io::stdout();
    write_posts(folio, &mut stdout.lock())
}

fn write_posts(folio: &Folio, out: &mut impl Write) -> Result<()> {
    let posts = folio.repository().list_posts()?;

    writeln!(out, "Posts ({}):", posts.len())?;
    for post in posts {
        let date = if post.date.is_empty() {
            "(no date)".to_string()
        } else {
            display_date(&post.date, "YYYY-MM-DD")
        };
        writeln!(out, "  {} - {} [{}]", date, post.title, post.slug)?;
    }

    Ok(())
}
