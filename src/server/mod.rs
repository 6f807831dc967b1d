//! HTTP server: JSON post API, HTML blog pages, and static files

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{
    MarkdownRenderer, Post, PostDetail, PostLookup, PostRepository, RepositoryError,
};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Server state, shared read-only across requests
pub struct AppState {
    repository: PostRepository,
    renderer: MarkdownRenderer,
    templates: TemplateRenderer,
    static_dir: PathBuf,
}

/// Why a single post could not be served
enum DetailError {
    NotFound,
    Read(RepositoryError),
}

impl AppState {
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            repository: folio.repository(),
            renderer: folio.renderer(),
            templates: TemplateRenderer::new(&folio.config)?,
            static_dir: folio.static_dir.clone(),
        })
    }

    fn post_detail(&self, slug: &str) -> Result<PostDetail, DetailError> {
        match self.repository.get_post_by_slug(slug) {
            PostLookup::Found(post) => {
                let html_content = self.renderer.render(&post.content);
                Ok(PostDetail { post, html_content })
            }
            PostLookup::NotFound => Err(DetailError::NotFound),
            PostLookup::ReadError(e) => Err(DetailError::Read(e)),
        }
    }
}

/// JSON error body, `{"error": "..."}`
struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Post not found",
        }
    }

    /// Log the cause server-side; clients only see `message`
    fn internal(message: &'static str, cause: impl std::fmt::Display) -> Self {
        tracing::error!("{}: {}", message, cause);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/:slug", get(get_post))
        .route("/api/blog", get(list_posts))
        .route("/api/blog/:slug", get(get_post))
        .route("/blog", get(blog_index))
        .route("/blog/:slug", get(blog_post))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(AppState::new(folio)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    tracing::info!("Serving posts from {:?}", folio.posts_dir);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run file-system work off the async executor
async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, tokio::task::JoinError>
where
    F: FnOnce(&AppState) -> T + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state)).await
}

async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Post>>, ApiError> {
    blocking(&state, |s| s.repository.list_posts())
        .await
        .map_err(|e| ApiError::internal("Failed to fetch posts", e))?
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch posts", e))
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, ApiError> {
    let detail = blocking(&state, move |s| s.post_detail(&slug))
        .await
        .map_err(|e| ApiError::internal("Failed to fetch post", e))?;

    match detail {
        Ok(detail) => Ok(Json(detail)),
        Err(DetailError::NotFound) => Err(ApiError::not_found()),
        Err(DetailError::Read(e)) => Err(ApiError::internal("Failed to fetch post", e)),
    }
}

async fn blog_index(State(state): State<Arc<AppState>>) -> Response {
    let listed = blocking(&state, |s| s.repository.list_posts())
        .await
        .map_err(anyhow::Error::from)
        .and_then(|posts| posts.map_err(anyhow::Error::from));

    let posts = match listed {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("Failed to list posts: {:#}", e);
            return error_page(&state);
        }
    };

    page(StatusCode::OK, state.templates.blog_index(&posts))
}

async fn blog_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let lookup_slug = slug.clone();
    let detail = match blocking(&state, move |s| s.post_detail(&lookup_slug)).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::error!("Failed to load post {:?}: {}", slug, e);
            Err(DetailError::NotFound)
        }
    };

    match detail {
        Ok(detail) => page(
            StatusCode::OK,
            state.templates.blog_post(&detail.post, &detail.html_content),
        ),
        Err(DetailError::NotFound) => {
            page(StatusCode::NOT_FOUND, state.templates.post_not_found())
        }
        Err(DetailError::Read(e)) => {
            // Shown to visitors as a plain miss
            tracing::error!("{}", e);
            page(StatusCode::NOT_FOUND, state.templates.post_not_found())
        }
    }
}

/// Fallback handler that serves the static site pages
async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.static_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => {
            page(StatusCode::NOT_FOUND, state.templates.page_not_found())
        }
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn error_page(state: &AppState) -> Response {
    page(StatusCode::INTERNAL_SERVER_ERROR, state.templates.server_error())
}

/// Turn a rendered template into a response
fn page(status: StatusCode, rendered: Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template rendering failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
