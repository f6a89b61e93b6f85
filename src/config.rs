use crate::service::DEFAULT_PER_PAGE;
use anyhow::{Context, ensure};
use std::str::FromStr;

#[derive(Debug)]
pub struct Config {
    database_url: String,
    server_port: u16,
    admin_token: String,
    blog_posts_per_page: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = load_env("DATABASE_URL")?;
        let server_port = load_env("SERVER_PORT")?;
        let admin_token: String = load_env("ADMIN_TOKEN")?;
        let blog_posts_per_page = load_env_or("BLOG_POSTS_PER_PAGE", DEFAULT_PER_PAGE)?;

        ensure!(!admin_token.is_empty(), "ADMIN_TOKEN must not be empty");
        ensure!(
            blog_posts_per_page >= 1,
            "BLOG_POSTS_PER_PAGE must be at least 1"
        );

        Ok(Self {
            database_url,
            server_port,
            admin_token,
            blog_posts_per_page,
        })
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    #[must_use]
    pub const fn server_port(&self) -> u16 {
        self.server_port
    }

    #[must_use]
    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    #[must_use]
    pub const fn blog_posts_per_page(&self) -> u32 {
        self.blog_posts_per_page
    }
}

fn load_env<T>(key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let val =
        std::env::var(key).with_context(|| format!("Failed to load environment variable {key}"))?;
    parse_env(key, &val)
}

fn load_env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(val) => parse_env(key, &val),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to load environment variable {key}"))
        }
    }
}

fn parse_env<T>(key: &str, val: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    val.parse::<T>()
        .with_context(|| format!("Failed to parse environment variable {key}"))
}
