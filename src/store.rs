use crate::model::{
    Author, BlogPost, BlogPostFilter, BlogPostSummary, CreateBlogPostError, CreateBlogPostRequest,
    DeleteBlogPostError, DeleteBlogPostRequest, FindBlogPostError, FindBlogPostRequest,
    ListAuthorsError, ListBlogPostsError, PageRequest, UpdateBlogPostError, UpdateBlogPostRequest,
};
use async_trait::async_trait;

#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    async fn list_authors(&self) -> Result<Vec<Author>, ListAuthorsError>;
}

#[async_trait]
pub trait BlogPostRepository: Send + Sync + 'static {
    async fn create_blog_post(
        &self,
        req: &CreateBlogPostRequest,
    ) -> Result<BlogPost, CreateBlogPostError>;

    async fn find_blog_post(&self, req: &FindBlogPostRequest)
    -> Result<BlogPost, FindBlogPostError>;

    async fn list_blog_posts(
        &self,
        filter: &BlogPostFilter,
        page: PageRequest,
    ) -> Result<Vec<BlogPostSummary>, ListBlogPostsError>;

    async fn count_blog_posts(&self, filter: &BlogPostFilter) -> Result<u64, ListBlogPostsError>;

    async fn update_blog_post(
        &self,
        req: &UpdateBlogPostRequest,
    ) -> Result<BlogPost, UpdateBlogPostError>;

    async fn delete_blog_post(&self, req: &DeleteBlogPostRequest)
    -> Result<(), DeleteBlogPostError>;
}

pub trait Store: AuthorRepository + BlogPostRepository {}

impl<T: AuthorRepository + BlogPostRepository> Store for T {}
