use crate::model::{
    BlogPost, BlogPostFilter, BlogPostPage, CreateBlogPostError, CreateBlogPostRequest,
    DeleteBlogPostError, DeleteBlogPostRequest, FindBlogPostError, FindBlogPostRequest,
    ListBlogPostsError, PageRequest, Pagination, UpdateBlogPostError, UpdateBlogPostRequest,
};
use crate::store::BlogPostRepository;
use std::sync::Arc;

pub const DEFAULT_PER_PAGE: u32 = 1;

#[derive(Debug)]
pub struct BlogPostService<BR> {
    repo: Arc<BR>,
    per_page: u32,
}

impl<BR> Clone for BlogPostService<BR> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            per_page: self.per_page,
        }
    }
}

impl<BR: BlogPostRepository> BlogPostService<BR> {
    pub fn new(repo: Arc<BR>, per_page: u32) -> Self {
        Self {
            repo,
            per_page: per_page.max(1),
        }
    }

    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_page(
        &self,
        filter: BlogPostFilter,
        page: u32,
    ) -> Result<BlogPostPage, ListBlogPostsError> {
        let req = PageRequest::new(page, self.per_page);
        let total = self.repo.count_blog_posts(&filter).await?;
        let items = if req.offset() < total {
            self.repo.list_blog_posts(&filter, req).await?
        } else {
            Vec::new()
        };

        let pagination = Pagination::new(req, total, items.len());
        Ok(BlogPostPage::new(items, pagination, filter))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find(&self, id: i64) -> Result<BlogPost, FindBlogPostError> {
        self.repo.find_blog_post(&FindBlogPostRequest::new(id)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        req: &CreateBlogPostRequest,
    ) -> Result<BlogPost, CreateBlogPostError> {
        let blog_post = self.repo.create_blog_post(req).await?;
        tracing::info!(id = blog_post.id(), "created blog post");
        Ok(blog_post)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        req: &UpdateBlogPostRequest,
    ) -> Result<BlogPost, UpdateBlogPostError> {
        self.repo.update_blog_post(req).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), DeleteBlogPostError> {
        self.repo
            .delete_blog_post(&DeleteBlogPostRequest::new(id))
            .await?;
        tracing::info!(id, "deleted blog post");
        Ok(())
    }
}
