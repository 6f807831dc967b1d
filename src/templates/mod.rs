//! Built-in blog page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Values are HTML-escaped except the
//! rendered post body, which is trusted markdown output.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers;
use crate::i18n::I18n;

/// Template renderer for the blog pages
pub struct TemplateRenderer {
    tera: Tera,
    config: SiteConfig,
    i18n: I18n,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("error.html", include_str!("site/error.html")),
        ])?;

        let date_format = config.date_format.clone();
        tera.register_filter(
            "display_date",
            move |value: &tera::Value, _: &HashMap<String, tera::Value>| {
                let s = tera::try_get_value!("display_date", "value", String, value);
                Ok(tera::Value::String(helpers::display_date(&s, &date_format)))
            },
        );
        tera.register_filter("date_xml", date_xml_filter);
        tera.register_filter("post_url", post_url_filter);

        Ok(Self {
            tera,
            config: config.clone(),
            i18n: I18n::new(&config.language)?,
        })
    }

    /// Blog index listing every post
    pub fn blog_index(&self, posts: &[Post]) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", posts);
        self.render("blog.html", &context)
    }

    /// Single post page
    pub fn blog_post(&self, post: &Post, html_content: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", post);
        context.insert("html_content", html_content);
        self.render("post.html", &context)
    }

    /// Page shown for a missing post
    pub fn post_not_found(&self) -> Result<String> {
        self.not_found(&self.i18n.get("post_not_found"))
    }

    /// Page shown for any other missing route
    pub fn page_not_found(&self) -> Result<String> {
        self.not_found(&self.i18n.get("page_not_found"))
    }

    /// Page shown when the posts cannot be listed
    pub fn server_error(&self) -> Result<String> {
        self.render("error.html", &self.base_context())
    }

    fn not_found(&self, message: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("message", message);
        self.render("not_found.html", &context)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.config);
        context.insert("language", self.i18n.language());
        context.insert("i18n", &self.i18n.get_all_translations());
        context
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: machine-readable date for `<time datetime>`
fn date_xml_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_xml", "value", String, value);
    Ok(tera::Value::String(helpers::date_xml(&s)))
}

/// Tera filter: page URL for a slug
fn post_url_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("post_url", "value", String, value);
    Ok(tera::Value::String(helpers::post_url(&s)))
}
