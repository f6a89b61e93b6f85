mod handler;
mod middleware;

use crate::service::BlogPostService;
use crate::store::Store;
use anyhow::Context;
use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const BLOG_POSTS_PATH: &str = "/blog-posts";

#[derive(Debug)]
pub struct AppState<S> {
    store: Arc<S>,
    blog_posts: BlogPostService<S>,
    admin_token: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            blog_posts: self.blog_posts.clone(),
            admin_token: Arc::clone(&self.admin_token),
        }
    }
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, per_page: u32, admin_token: &str) -> Self {
        let store = Arc::new(store);
        let blog_posts = BlogPostService::new(Arc::clone(&store), per_page);
        Self {
            store,
            blog_posts,
            admin_token: admin_token.into(),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
}

impl HttpServerConfig {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<S: Store>(
        state: AppState<S>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            "listening on {}",
            self.listener
                .local_addr()
                .context("Failed to read listener address")?
        );
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Received error from running server")?;
        tracing::info!("server stopped");
        Ok(())
    }
}

pub fn router<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(BLOG_POSTS_PATH) }))
        .route("/authors", get(handler::list_authors::<S>))
        .merge(admin_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes<S: Store>(state: AppState<S>) -> Router<AppState<S>> {
    Router::new()
        .route(
            BLOG_POSTS_PATH,
            get(handler::list_blog_posts::<S>).post(handler::store_blog_post::<S>),
        )
        .route(
            "/blog-posts/create",
            get(handler::create_blog_post_form::<S>),
        )
        .route(
            "/blog-posts/{id}",
            axum::routing::put(handler::update_blog_post::<S>)
                .patch(handler::update_blog_post::<S>)
                .delete(handler::destroy_blog_post::<S>),
        )
        .route(
            "/blog-posts/{id}/edit",
            get(handler::edit_blog_post_form::<S>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::require_admin_token::<S>,
        ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
