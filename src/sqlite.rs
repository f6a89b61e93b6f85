use crate::model::{
    Author, AuthorName, BlogPost, BlogPostFilter, BlogPostSummary, BlogPostTitle,
    CreateBlogPostError, CreateBlogPostRequest, DeleteBlogPostError, DeleteBlogPostRequest,
    FindBlogPostError, FindBlogPostRequest, ListAuthorsError, ListBlogPostsError, PageRequest,
    PostStatus, UpdateBlogPostError, UpdateBlogPostRequest,
};
use crate::store::{AuthorRepository, BlogPostRepository};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteRow};
use sqlx::{FromRow, QueryBuilder, Row, SqlitePool};
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!();

const BLOG_POST_COLUMNS: &str = "id, title, body, status, author_id";

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(path)
            .with_context(|| format!("Invalid database path {path}"))?
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePool::connect_with(opts)
            .await
            .with_context(|| format!("Failed to open database at {path}"))?;

        MIGRATOR
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self { pool })
    }

    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let name = row.try_get("name")?;

        let name = AuthorName::new_unchecked(name);
        Ok(Self::new(id, name))
    }
}

impl<'r> FromRow<'r, SqliteRow> for BlogPost {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let title = row.try_get("title")?;
        let body = row.try_get("body")?;
        let status = decode_status(row)?;
        let author_id = row.try_get("author_id")?;

        let title = BlogPostTitle::new_unchecked(title);
        Ok(Self::new(id, title, body, status, author_id))
    }
}

impl<'r> FromRow<'r, SqliteRow> for BlogPostSummary {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let title = row.try_get("title")?;
        let status = decode_status(row)?;
        let author_id = row.try_get("author_id")?;
        let author_name = row.try_get("author_name")?;

        let title = BlogPostTitle::new_unchecked(title);
        let author = Author::new(author_id, AuthorName::new_unchecked(author_name));
        Ok(Self::new(id, title, status, author))
    }
}

fn decode_status(row: &SqliteRow) -> Result<PostStatus, sqlx::Error> {
    let raw: &str = row.try_get("status")?;
    raw.parse().map_err(|err| sqlx::Error::ColumnDecode {
        index: "status".into(),
        source: Box::new(err),
    })
}

#[async_trait]
impl AuthorRepository for Sqlite {
    async fn list_authors(&self) -> Result<Vec<Author>, ListAuthorsError> {
        let authors = sqlx::query_as("SELECT id, name FROM author ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context("Failed to retrieve all authors");
                ListAuthorsError(err)
            })?;

        Ok(authors)
    }
}

#[async_trait]
impl BlogPostRepository for Sqlite {
    async fn create_blog_post(
        &self,
        req: &CreateBlogPostRequest,
    ) -> Result<BlogPost, CreateBlogPostError> {
        let query = format!(
            "INSERT INTO blog_post (title, body, status, author_id) VALUES (?, ?, ?, ?) \
             RETURNING {BLOG_POST_COLUMNS}"
        );
        let blog_post = sqlx::query_as(&query)
            .bind(req.title().as_str())
            .bind(req.body())
            .bind(req.status().as_str())
            .bind(req.author_id())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    CreateBlogPostError::UnknownAuthor {
                        author_id: req.author_id(),
                    }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to create blog post with title "{}""#,
                        req.title()
                    ));
                    CreateBlogPostError::Other(err)
                }
            })?;

        Ok(blog_post)
    }

    async fn find_blog_post(
        &self,
        req: &FindBlogPostRequest,
    ) -> Result<BlogPost, FindBlogPostError> {
        let query = format!("SELECT {BLOG_POST_COLUMNS} FROM blog_post WHERE id = ?");
        let blog_post = sqlx::query_as(&query)
            .bind(req.id())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindBlogPostError::NotFound { id: req.id() }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to retrieve blog post with id "{}""#,
                        req.id()
                    ));
                    FindBlogPostError::Other(err)
                }
            })?;

        Ok(blog_post)
    }

    async fn list_blog_posts(
        &self,
        filter: &BlogPostFilter,
        page: PageRequest,
    ) -> Result<Vec<BlogPostSummary>, ListBlogPostsError> {
        let mut qb: QueryBuilder<'_, sqlx::Sqlite> = QueryBuilder::new(
            "SELECT p.id, p.title, p.status, a.id AS author_id, a.name AS author_name \
             FROM blog_post p JOIN author a ON a.id = p.author_id WHERE 1=1",
        );
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY p.id LIMIT ")
            .push_bind(i64::from(page.per_page()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let blog_posts = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context(format!(
                    "Failed to list blog posts on page {}",
                    page.page()
                ));
                ListBlogPostsError(err)
            })?;

        Ok(blog_posts)
    }

    async fn count_blog_posts(&self, filter: &BlogPostFilter) -> Result<u64, ListBlogPostsError> {
        let mut qb: QueryBuilder<'_, sqlx::Sqlite> = QueryBuilder::new(
            "SELECT COUNT(*) FROM blog_post p JOIN author a ON a.id = p.author_id WHERE 1=1",
        );
        push_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context("Failed to count blog posts");
                ListBlogPostsError(err)
            })?;

        u64::try_from(count)
            .map_err(|err| ListBlogPostsError(anyhow!(err).context("Negative blog post count")))
    }

    async fn update_blog_post(
        &self,
        req: &UpdateBlogPostRequest,
    ) -> Result<BlogPost, UpdateBlogPostError> {
        if req.is_empty() {
            return self
                .find_blog_post(&FindBlogPostRequest::new(req.id()))
                .await
                .map_err(|err| match err {
                    FindBlogPostError::NotFound { id } => UpdateBlogPostError::NotFound { id },
                    FindBlogPostError::Other(err) => UpdateBlogPostError::Other(err),
                });
        }

        let mut qb: QueryBuilder<'_, sqlx::Sqlite> = QueryBuilder::new("UPDATE blog_post SET ");
        let mut set = qb.separated(", ");
        if let Some(title) = req.title() {
            set.push("title = ").push_bind_unseparated(title.to_string());
        }
        if let Some(body) = req.body() {
            set.push("body = ").push_bind_unseparated(body.to_string());
        }
        if let Some(status) = req.status() {
            set.push("status = ").push_bind_unseparated(status.as_str());
        }
        if let Some(author_id) = req.author_id() {
            set.push("author_id = ").push_bind_unseparated(author_id);
        }
        set.push("updated_at = CURRENT_TIMESTAMP");
        qb.push(" WHERE id = ")
            .push_bind(req.id())
            .push(format!(" RETURNING {BLOG_POST_COLUMNS}"));

        let blog_post: Option<BlogPost> = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    UpdateBlogPostError::UnknownAuthor {
                        author_id: req.author_id().unwrap_or_default(),
                    }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to update blog post with id "{}""#,
                        req.id()
                    ));
                    UpdateBlogPostError::Other(err)
                }
            })?;

        blog_post.ok_or(UpdateBlogPostError::NotFound { id: req.id() })
    }

    async fn delete_blog_post(
        &self,
        req: &DeleteBlogPostRequest,
    ) -> Result<(), DeleteBlogPostError> {
        let result = sqlx::query("DELETE FROM blog_post WHERE id = ?")
            .bind(req.id())
            .execute(&self.pool)
            .await
            .with_context(|| format!(r#"Failed to delete blog post with id "{}""#, req.id()))?;

        if result.rows_affected() == 0 {
            return Err(DeleteBlogPostError::NotFound { id: req.id() });
        }

        Ok(())
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, sqlx::Sqlite>, filter: &BlogPostFilter) {
    if let Some(search) = filter.search() {
        qb.push(" AND p.title LIKE ")
            .push_bind(like_pattern(search))
            .push(" ESCAPE '\\'");
    }
    if let Some(status) = filter.status() {
        qb.push(" AND p.status = ").push_bind(status.as_str());
    }
}

/// Builds an unanchored `LIKE` pattern that matches `search` literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_foreign_key_violation();
    }

    false
}
