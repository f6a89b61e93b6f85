use crate::http::{AppState, BLOG_POSTS_PATH};
use crate::model::{
    Author, BlogPost, BlogPostFilter, BlogPostSummary, BlogPostTitle, BlogPostTitleEmptyError,
    CreateBlogPostError, CreateBlogPostRequest, DeleteBlogPostError, FindBlogPostError,
    ListAuthorsError, ListBlogPostsError, PageRequest, Pagination, PostStatus, PostStatusError,
    UpdateBlogPostError, UpdateBlogPostRequest,
};
use crate::store::{AuthorRepository, Store};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug)]
pub struct PageView<T: Serialize> {
    component: &'static str,
    props: T,
}

impl<T: Serialize> PageView<T> {
    pub const fn new(component: &'static str, props: T) -> Self {
        Self { component, props }
    }
}

#[derive(Serialize)]
struct PageViewBody<'a, T: Serialize> {
    component: &'static str,
    props: &'a T,
}

impl<T: Serialize> IntoResponse for PageView<T> {
    fn into_response(self) -> axum::response::Response {
        Json(PageViewBody {
            component: self.component,
            props: &self.props,
        })
        .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    status_code: u16,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    const fn new(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    UnsupportedMediaType(String),
    UnprocessableEntity(String),
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            Self::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string()),
        };
        (status, Json(ApiResponse::new(status, msg))).into_response()
    }
}

impl ApiError {
    fn internal(cause: &anyhow::Error) -> Self {
        tracing::error!(error = ?cause, "request failed");
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => Self::UnprocessableEntity(message),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::UnsupportedMediaType(message),
            _ => Self::BadRequest(message),
        }
    }
}

impl From<ParseBlogPostHttpRequestError> for ApiError {
    fn from(err: ParseBlogPostHttpRequestError) -> Self {
        Self::UnprocessableEntity(err.to_string())
    }
}

impl From<ListAuthorsError> for ApiError {
    fn from(err: ListAuthorsError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<ListBlogPostsError> for ApiError {
    fn from(err: ListBlogPostsError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<FindBlogPostError> for ApiError {
    fn from(err: FindBlogPostError) -> Self {
        match err {
            FindBlogPostError::NotFound { .. } => Self::NotFound(err.to_string()),
            FindBlogPostError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<CreateBlogPostError> for ApiError {
    fn from(err: CreateBlogPostError) -> Self {
        match err {
            CreateBlogPostError::UnknownAuthor { .. } => Self::UnprocessableEntity(err.to_string()),
            CreateBlogPostError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<UpdateBlogPostError> for ApiError {
    fn from(err: UpdateBlogPostError) -> Self {
        match err {
            UpdateBlogPostError::NotFound { .. } => Self::NotFound(err.to_string()),
            UpdateBlogPostError::UnknownAuthor { .. } => Self::UnprocessableEntity(err.to_string()),
            UpdateBlogPostError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<DeleteBlogPostError> for ApiError {
    fn from(err: DeleteBlogPostError) -> Self {
        match err {
            DeleteBlogPostError::NotFound { .. } => Self::NotFound(err.to_string()),
            DeleteBlogPostError::Other(cause) => Self::internal(&cause),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseBlogPostHttpRequestError {
    #[error(transparent)]
    Title(#[from] BlogPostTitleEmptyError),
    #[error(transparent)]
    Status(#[from] PostStatusError),
}

/// Fields a client may set when creating a post. Any other key, `id`
/// included, is rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBlogPostHttpRequest {
    title: String,
    #[serde(default)]
    body: String,
    status: String,
    author_id: i64,
}

impl TryFrom<CreateBlogPostHttpRequest> for CreateBlogPostRequest {
    type Error = ParseBlogPostHttpRequestError;

    fn try_from(value: CreateBlogPostHttpRequest) -> Result<Self, Self::Error> {
        let title = BlogPostTitle::new(&value.title)?;
        let status = value.status.parse()?;
        Ok(Self::new(title, value.body, status, value.author_id))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBlogPostHttpRequest {
    title: Option<String>,
    body: Option<String>,
    status: Option<String>,
    author_id: Option<i64>,
}

impl UpdateBlogPostHttpRequest {
    fn into_domain(self, id: i64) -> Result<UpdateBlogPostRequest, ParseBlogPostHttpRequestError> {
        let mut req = UpdateBlogPostRequest::new(id);
        if let Some(title) = self.title {
            req.set_title(BlogPostTitle::new(&title)?);
        }
        if let Some(body) = self.body {
            req.set_body(body);
        }
        if let Some(status) = self.status {
            req.set_status(status.parse::<PostStatus>()?);
        }
        if let Some(author_id) = self.author_id {
            req.set_author_id(author_id);
        }
        Ok(req)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListBlogPostsQuery {
    search: Option<String>,
    status: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthorHttpResponse {
    id: i64,
    name: String,
}

impl From<&Author> for AuthorHttpResponse {
    fn from(value: &Author) -> Self {
        Self {
            id: value.id(),
            name: value.name().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogPostHttpResponse {
    id: i64,
    title: String,
    body: String,
    status: &'static str,
    author_id: i64,
}

impl From<BlogPost> for BlogPostHttpResponse {
    fn from(value: BlogPost) -> Self {
        Self {
            id: value.id(),
            title: value.title().to_string(),
            body: value.body().to_string(),
            status: value.status().as_str(),
            author_id: value.author_id(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogPostSummaryHttpResponse {
    id: i64,
    title: String,
    status: &'static str,
    author: AuthorHttpResponse,
}

impl From<&BlogPostSummary> for BlogPostSummaryHttpResponse {
    fn from(value: &BlogPostSummary) -> Self {
        Self {
            id: value.id(),
            title: value.title().to_string(),
            status: value.status().as_str(),
            author: value.author().into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationHttpResponse {
    current_page: u32,
    last_page: u32,
    per_page: u32,
    total: u64,
    from: Option<u64>,
    to: Option<u64>,
    first_page_url: String,
    last_page_url: String,
    prev_page_url: Option<String>,
    next_page_url: Option<String>,
}

impl PaginationHttpResponse {
    fn new(pagination: &Pagination, filters: &BlogPostFilter) -> Self {
        let current = pagination.current_page();
        Self {
            current_page: current,
            last_page: pagination.last_page(),
            per_page: pagination.per_page(),
            total: pagination.total(),
            from: pagination.first_item(),
            to: pagination.last_item(),
            first_page_url: page_url(filters, 1),
            last_page_url: page_url(filters, pagination.last_page()),
            prev_page_url: pagination
                .has_previous()
                .then(|| page_url(filters, current - 1)),
            next_page_url: pagination.has_next().then(|| page_url(filters, current + 1)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FiltersHttpResponse {
    search: Option<String>,
    status: Option<String>,
}

impl From<&BlogPostFilter> for FiltersHttpResponse {
    fn from(value: &BlogPostFilter) -> Self {
        Self {
            search: value.raw_search().map(str::to_string),
            status: value.raw_status().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogPostIndexProps {
    items: Vec<BlogPostSummaryHttpResponse>,
    pagination: PaginationHttpResponse,
    filters: FiltersHttpResponse,
}

#[derive(Debug, Serialize)]
pub struct BlogPostCreateProps {
    authors: Vec<AuthorHttpResponse>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostEditProps {
    blog_post: BlogPostHttpResponse,
    authors: Vec<AuthorHttpResponse>,
}

fn page_url(filters: &BlogPostFilter, page: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(search) = filters.raw_search().filter(|s| !s.is_empty()) {
        query.append_pair("search", search);
    }
    if let Some(status) = filters.raw_status().filter(|s| !s.is_empty()) {
        query.append_pair("status", status);
    }
    query.append_pair("page", &page.to_string());
    format!("{BLOG_POSTS_PATH}?{}", query.finish())
}

async fn author_options<S: Store>(
    state: &AppState<S>,
) -> Result<Vec<AuthorHttpResponse>, ApiError> {
    let authors = state.store.list_authors().await?;
    Ok(authors.iter().map(AuthorHttpResponse::from).collect())
}

pub async fn list_authors<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<AuthorHttpResponse>>, ApiError> {
    author_options(&state).await.map(Json)
}

pub async fn list_blog_posts<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListBlogPostsQuery>,
) -> Result<PageView<BlogPostIndexProps>, ApiError> {
    let page = PageRequest::parse_page(query.page.as_deref());
    let filter = BlogPostFilter::new(query.search, query.status);

    let (items, pagination, filters) = state.blog_posts.list_page(filter, page).await?.into_parts();

    let props = BlogPostIndexProps {
        items: items.iter().map(BlogPostSummaryHttpResponse::from).collect(),
        pagination: PaginationHttpResponse::new(&pagination, &filters),
        filters: FiltersHttpResponse::from(&filters),
    };
    Ok(PageView::new("blog_posts/Index", props))
}

pub async fn create_blog_post_form<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<PageView<BlogPostCreateProps>, ApiError> {
    let authors = author_options(&state).await?;
    Ok(PageView::new("blog_posts/Create", BlogPostCreateProps { authors }))
}

pub async fn store_blog_post<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateBlogPostHttpRequest>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let Json(body) = payload?;
    let req: CreateBlogPostRequest = body.try_into()?;
    state.blog_posts.create(&req).await?;
    Ok(Redirect::to(BLOG_POSTS_PATH))
}

pub async fn edit_blog_post_form<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<PageView<BlogPostEditProps>, ApiError> {
    let blog_post = state.blog_posts.find(id).await?;
    let authors = author_options(&state).await?;
    let props = BlogPostEditProps {
        blog_post: blog_post.into(),
        authors,
    };
    Ok(PageView::new("blog_posts/Edit", props))
}

pub async fn update_blog_post<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateBlogPostHttpRequest>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let Json(body) = payload?;
    let req = body.into_domain(id)?;
    state.blog_posts.update(&req).await?;
    Ok(Redirect::to(BLOG_POSTS_PATH))
}

pub async fn destroy_blog_post<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.blog_posts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
