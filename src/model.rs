use std::num::IntErrorKind;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(raw: &str) -> Result<Self, AuthorNameEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(AuthorNameEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Author name cannot be empty")]
pub struct AuthorNameEmptyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    id: i64,
    name: AuthorName,
}

impl Author {
    pub const fn new(id: i64, name: AuthorName) -> Self {
        Self { id, name }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ListAuthorsError(#[from] pub anyhow::Error);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostTitle(String);

impl BlogPostTitle {
    pub fn new(raw: &str) -> Result<Self, BlogPostTitleEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(BlogPostTitleEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlogPostTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Blog post title cannot be empty")]
pub struct BlogPostTitleEmptyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    Published,
    Unpublished,
}

impl PostStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Published => "Published",
            Self::Unpublished => "Unpublished",
        }
    }

    /// Interprets a raw listing filter value.
    ///
    /// Only an exact `Published` or `Unpublished` selects a status. Anything
    /// else, including a differently cased spelling, means "no status filter"
    /// and is not reported as an error.
    pub fn from_filter(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| value.parse().ok())
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = PostStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Published" => Ok(Self::Published),
            "Unpublished" => Ok(Self::Unpublished),
            other => Err(PostStatusError(other.into())),
        }
    }
}

#[derive(Error, Debug)]
#[error("\"{0}\" is not a valid status, expected Published or Unpublished")]
pub struct PostStatusError(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    id: i64,
    title: BlogPostTitle,
    body: String,
    status: PostStatus,
    author_id: i64,
}

impl BlogPost {
    pub const fn new(
        id: i64,
        title: BlogPostTitle,
        body: String,
        status: PostStatus,
        author_id: i64,
    ) -> Self {
        Self {
            id,
            title,
            body,
            status,
            author_id,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn title(&self) -> &BlogPostTitle {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub const fn status(&self) -> PostStatus {
        self.status
    }

    pub const fn author_id(&self) -> i64 {
        self.author_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostSummary {
    id: i64,
    title: BlogPostTitle,
    status: PostStatus,
    author: Author,
}

impl BlogPostSummary {
    pub const fn new(id: i64, title: BlogPostTitle, status: PostStatus, author: Author) -> Self {
        Self {
            id,
            title,
            status,
            author,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn title(&self) -> &BlogPostTitle {
        &self.title
    }

    pub const fn status(&self) -> PostStatus {
        self.status
    }

    pub const fn author(&self) -> &Author {
        &self.author
    }
}

/// Listing filters as supplied by the caller.
///
/// The raw values are kept so they can be echoed back unchanged; the
/// accessors return the filters that actually apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPostFilter {
    search: Option<String>,
    status: Option<String>,
}

impl BlogPostFilter {
    pub const fn new(search: Option<String>, status: Option<String>) -> Self {
        Self { search, status }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    pub fn status(&self) -> Option<PostStatus> {
        PostStatus::from_filter(self.status.as_deref())
    }

    pub fn raw_search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn raw_status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Reads a page number from a query string value, falling back to the
    /// first page when it is missing or not a positive integer.
    /// A number too large for a page index clamps to the last representable
    /// page, which lies past the end of any listing.
    pub fn parse_page(raw: Option<&str>) -> u32 {
        let Some(value) = raw else {
            return 1;
        };
        match value.trim().parse::<u32>() {
            Ok(page) => page.max(1),
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => u32::MAX,
            Err(_) => 1,
        }
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    last_page: u32,
    per_page: u32,
    total: u64,
    from: Option<u64>,
    to: Option<u64>,
}

impl Pagination {
    pub fn new(req: PageRequest, total: u64, item_count: usize) -> Self {
        let per_page = u64::from(req.per_page());
        let last_page = total.div_ceil(per_page).max(1);
        let (from, to) = if item_count == 0 {
            (None, None)
        } else {
            let from = req.offset() + 1;
            (Some(from), Some(from + item_count as u64 - 1))
        };
        Self {
            current_page: req.page(),
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            per_page: req.per_page(),
            total,
            from,
            to,
        }
    }

    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    pub const fn last_page(&self) -> u32 {
        self.last_page
    }

    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    pub const fn first_item(&self) -> Option<u64> {
        self.from
    }

    pub const fn last_item(&self) -> Option<u64> {
        self.to
    }

    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

#[derive(Debug, Clone)]
pub struct BlogPostPage {
    items: Vec<BlogPostSummary>,
    pagination: Pagination,
    filters: BlogPostFilter,
}

impl BlogPostPage {
    pub const fn new(
        items: Vec<BlogPostSummary>,
        pagination: Pagination,
        filters: BlogPostFilter,
    ) -> Self {
        Self {
            items,
            pagination,
            filters,
        }
    }

    pub fn items(&self) -> &[BlogPostSummary] {
        &self.items
    }

    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub const fn filters(&self) -> &BlogPostFilter {
        &self.filters
    }

    pub fn into_parts(self) -> (Vec<BlogPostSummary>, Pagination, BlogPostFilter) {
        (self.items, self.pagination, self.filters)
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ListBlogPostsError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct CreateBlogPostRequest {
    title: BlogPostTitle,
    body: String,
    status: PostStatus,
    author_id: i64,
}

impl CreateBlogPostRequest {
    pub const fn new(
        title: BlogPostTitle,
        body: String,
        status: PostStatus,
        author_id: i64,
    ) -> Self {
        Self {
            title,
            body,
            status,
            author_id,
        }
    }

    pub const fn title(&self) -> &BlogPostTitle {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub const fn status(&self) -> PostStatus {
        self.status
    }

    pub const fn author_id(&self) -> i64 {
        self.author_id
    }
}

#[derive(Error, Debug)]
pub enum CreateBlogPostError {
    #[error("Author with id \"{author_id}\" does not exist")]
    UnknownAuthor { author_id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct FindBlogPostRequest {
    id: i64,
}

impl FindBlogPostRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindBlogPostError {
    #[error("Blog post with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct UpdateBlogPostRequest {
    id: i64,
    title: Option<BlogPostTitle>,
    body: Option<String>,
    status: Option<PostStatus>,
    author_id: Option<i64>,
}

impl UpdateBlogPostRequest {
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            title: None,
            body: None,
            status: None,
            author_id: None,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn title(&self) -> Option<&BlogPostTitle> {
        self.title.as_ref()
    }

    pub fn set_title(&mut self, title: BlogPostTitle) {
        self.title = Some(title);
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn set_body(&mut self, body: String) {
        self.body = Some(body);
    }

    pub const fn status(&self) -> Option<PostStatus> {
        self.status
    }

    pub fn set_status(&mut self, status: PostStatus) {
        self.status = Some(status);
    }

    pub const fn author_id(&self) -> Option<i64> {
        self.author_id
    }

    pub fn set_author_id(&mut self, author_id: i64) {
        self.author_id = Some(author_id);
    }

    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.status.is_none()
            && self.author_id.is_none()
    }
}

#[derive(Error, Debug)]
pub enum UpdateBlogPostError {
    #[error("Blog post with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error("Author with id \"{author_id}\" does not exist")]
    UnknownAuthor { author_id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct DeleteBlogPostRequest {
    id: i64,
}

impl DeleteBlogPostRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteBlogPostError {
    #[error("Blog post with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
