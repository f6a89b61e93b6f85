use blog_admin::config::Config;
use blog_admin::http::{AppState, HttpServer, HttpServerConfig};
use blog_admin::sqlite::Sqlite;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blog_admin::telemetry::init()?;
    let config = Config::from_env()?;

    let sqlite = Sqlite::new(config.database_url()).await?;
    let state = AppState::new(
        sqlite,
        config.blog_posts_per_page(),
        config.admin_token(),
    );
    let server_config = HttpServerConfig::new(config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
