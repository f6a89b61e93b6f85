use blog_admin::model::{
    BlogPostFilter, BlogPostPage, BlogPostTitle, CreateBlogPostError, CreateBlogPostRequest,
    DeleteBlogPostError, FindBlogPostError, PostStatus, UpdateBlogPostError,
    UpdateBlogPostRequest,
};
use blog_admin::service::BlogPostService;
use blog_admin::sqlite::Sqlite;
use blog_admin::store::AuthorRepository;
use sqlx::SqlitePool;
use std::sync::Arc;

async fn insert_author(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO author (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn insert_post(pool: &SqlitePool, title: &str, status: &str, author_id: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO blog_post (title, body, status, author_id) VALUES (?, '', ?, ?) RETURNING id",
    )
    .bind(title)
    .bind(status)
    .bind(author_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Go guide (Published), Go internals (Unpublished), Rust basics (Published).
async fn seed_posts(pool: &SqlitePool) -> i64 {
    let author_id = insert_author(pool, "Ada").await;
    insert_post(pool, "Go guide", "Published", author_id).await;
    insert_post(pool, "Go internals", "Unpublished", author_id).await;
    insert_post(pool, "Rust basics", "Published", author_id).await;
    author_id
}

fn service(pool: SqlitePool, per_page: u32) -> BlogPostService<Sqlite> {
    BlogPostService::new(Arc::new(Sqlite::from_pool(pool)), per_page)
}

fn filter(search: Option<&str>, status: Option<&str>) -> BlogPostFilter {
    BlogPostFilter::new(search.map(str::to_string), status.map(str::to_string))
}

fn titles(page: &BlogPostPage) -> Vec<&str> {
    page.items().iter().map(|p| p.title().as_str()).collect()
}

#[sqlx::test]
async fn search_and_status_combine(pool: SqlitePool) {
    seed_posts(&pool).await;
    let service = service(pool, 10);

    let page = service
        .list_page(filter(Some("Go"), Some("Published")), 1)
        .await
        .unwrap();

    assert_eq!(titles(&page), ["Go guide"]);
    assert_eq!(page.pagination().total(), 1);
}

#[sqlx::test]
async fn search_matches_title_substrings(pool: SqlitePool) {
    seed_posts(&pool).await;
    let service = service(pool, 10);

    let page = service.list_page(filter(Some("o"), None), 1).await.unwrap();
    assert_eq!(titles(&page), ["Go guide", "Go internals"]);

    let page = service.list_page(filter(Some("basic"), None), 1).await.unwrap();
    assert_eq!(titles(&page), ["Rust basics"]);
}

#[sqlx::test]
async fn empty_search_does_not_filter(pool: SqlitePool) {
    seed_posts(&pool).await;
    let service = service(pool, 10);

    let empty = service.list_page(filter(Some(""), None), 1).await.unwrap();
    let absent = service.list_page(filter(None, None), 1).await.unwrap();

    assert_eq!(titles(&empty), ["Go guide", "Go internals", "Rust basics"]);
    assert_eq!(titles(&empty), titles(&absent));
}

#[sqlx::test]
async fn search_wildcards_match_literally(pool: SqlitePool) {
    let author_id = insert_author(&pool, "Ada").await;
    insert_post(&pool, "100% done", "Published", author_id).await;
    insert_post(&pool, "1000 done", "Published", author_id).await;
    insert_post(&pool, "snake_case", "Published", author_id).await;
    insert_post(&pool, "snakeXcase", "Published", author_id).await;
    let service = service(pool, 10);

    let page = service.list_page(filter(Some("100%"), None), 1).await.unwrap();
    assert_eq!(titles(&page), ["100% done"]);

    let page = service.list_page(filter(Some("e_c"), None), 1).await.unwrap();
    assert_eq!(titles(&page), ["snake_case"]);
}

#[sqlx::test]
async fn unrecognized_status_is_ignored(pool: SqlitePool) {
    seed_posts(&pool).await;
    let service = service(pool, 10);
    let absent = service.list_page(filter(None, None), 1).await.unwrap();

    for status in ["Draft", "published", "UNPUBLISHED", "", " Published"] {
        let page = service
            .list_page(filter(None, Some(status)), 1)
            .await
            .unwrap();
        assert_eq!(titles(&page), titles(&absent), "status {status:?}");
        assert_eq!(page.pagination().total(), absent.pagination().total());
    }
}

#[sqlx::test]
async fn valid_status_selects_matching_posts(pool: SqlitePool) {
    seed_posts(&pool).await;
    let service = service(pool, 10);

    for status in [PostStatus::Published, PostStatus::Unpublished] {
        let page = service
            .list_page(filter(None, Some(status.as_str())), 1)
            .await
            .unwrap();
        assert!(!page.items().is_empty());
        assert!(page.items().iter().all(|p| p.status() == status));
    }
}

#[sqlx::test]
async fn items_carry_author_display_data(pool: SqlitePool) {
    let author_id = seed_posts(&pool).await;
    let service = service(pool, 10);

    let page = service.list_page(filter(None, None), 1).await.unwrap();

    for item in page.items() {
        assert_eq!(item.author().id(), author_id);
        assert_eq!(item.author().name().as_str(), "Ada");
    }
}

#[sqlx::test]
async fn one_post_per_page_by_default(pool: SqlitePool) {
    seed_posts(&pool).await;
    let service = service(pool, blog_admin::service::DEFAULT_PER_PAGE);

    let page = service.list_page(filter(None, None), 2).await.unwrap();

    assert_eq!(titles(&page), ["Go internals"]);
    let pagination = page.pagination();
    assert_eq!(pagination.current_page(), 2);
    assert_eq!(pagination.last_page(), 3);
    assert_eq!(pagination.per_page(), 1);
    assert_eq!(pagination.total(), 3);
    assert_eq!(pagination.first_item(), Some(2));
    assert_eq!(pagination.last_item(), Some(2));
}

#[sqlx::test]
async fn page_past_the_end_is_empty(pool: SqlitePool) {
    seed_posts(&pool).await;
    let service = service(pool, 1);

    let page = service
        .list_page(filter(Some("Go"), None), 3)
        .await
        .unwrap();

    assert!(page.items().is_empty());
    assert_eq!(page.pagination().total(), 2);
    assert_eq!(page.pagination().last_page(), 2);
}

#[sqlx::test]
async fn filters_are_echoed_as_supplied(pool: SqlitePool) {
    seed_posts(&pool).await;
    let service = service(pool, 1);
    let supplied = filter(Some("Go"), Some("Archived"));

    let page = service.list_page(supplied.clone(), 1).await.unwrap();

    assert_eq!(page.filters(), &supplied);
    assert_eq!(page.filters().raw_status(), Some("Archived"));
}

#[sqlx::test]
async fn create_assigns_an_id(pool: SqlitePool) {
    let author_id = insert_author(&pool, "Ada").await;
    let service = service(pool, 1);
    let req = CreateBlogPostRequest::new(
        BlogPostTitle::new("X").unwrap(),
        String::new(),
        PostStatus::Published,
        author_id,
    );

    let created = service.create(&req).await.unwrap();

    assert!(created.id() > 0);
    assert_eq!(created.title().as_str(), "X");
    assert_eq!(created.status(), PostStatus::Published);
    assert_eq!(created.author_id(), author_id);
    assert_eq!(service.find(created.id()).await.unwrap(), created);
}

#[sqlx::test]
async fn create_rejects_unknown_author(pool: SqlitePool) {
    let service = service(pool, 1);
    let req = CreateBlogPostRequest::new(
        BlogPostTitle::new("X").unwrap(),
        String::new(),
        PostStatus::Published,
        99,
    );

    let err = service.create(&req).await.unwrap_err();

    assert!(matches!(
        err,
        CreateBlogPostError::UnknownAuthor { author_id: 99 }
    ));
}

#[sqlx::test]
async fn update_missing_post_is_not_found(pool: SqlitePool) {
    let service = service(pool, 1);
    let mut req = UpdateBlogPostRequest::new(42);
    req.set_title(BlogPostTitle::new("New Title").unwrap());

    let err = service.update(&req).await.unwrap_err();

    assert!(matches!(err, UpdateBlogPostError::NotFound { id: 42 }));
}

#[sqlx::test]
async fn update_merges_supplied_fields(pool: SqlitePool) {
    let author_id = insert_author(&pool, "Ada").await;
    let id = insert_post(&pool, "Old Title", "Unpublished", author_id).await;
    let service = service(pool, 1);
    let mut req = UpdateBlogPostRequest::new(id);
    req.set_title(BlogPostTitle::new("New Title").unwrap());

    let updated = service.update(&req).await.unwrap();

    assert_eq!(updated.id(), id);
    assert_eq!(updated.title().as_str(), "New Title");
    assert_eq!(updated.status(), PostStatus::Unpublished);
    assert_eq!(updated.author_id(), author_id);
    assert_eq!(service.find(id).await.unwrap(), updated);
}

#[sqlx::test]
async fn update_without_fields_leaves_post_unchanged(pool: SqlitePool) {
    let author_id = insert_author(&pool, "Ada").await;
    let id = insert_post(&pool, "Title", "Published", author_id).await;
    let service = service(pool, 1);
    let before = service.find(id).await.unwrap();

    let after = service.update(&UpdateBlogPostRequest::new(id)).await.unwrap();

    assert_eq!(before, after);
    assert!(matches!(
        service.update(&UpdateBlogPostRequest::new(id + 1)).await,
        Err(UpdateBlogPostError::NotFound { .. })
    ));
}

#[sqlx::test]
async fn update_rejects_unknown_author(pool: SqlitePool) {
    let author_id = insert_author(&pool, "Ada").await;
    let id = insert_post(&pool, "Title", "Published", author_id).await;
    let service = service(pool, 1);
    let mut req = UpdateBlogPostRequest::new(id);
    req.set_author_id(author_id + 100);

    let err = service.update(&req).await.unwrap_err();

    assert!(matches!(err, UpdateBlogPostError::UnknownAuthor { .. }));
}

#[sqlx::test]
async fn delete_removes_post_once(pool: SqlitePool) {
    let author_id = insert_author(&pool, "Ada").await;
    let id = insert_post(&pool, "Title", "Published", author_id).await;
    let service = service(pool, 1);

    service.delete(id).await.unwrap();

    assert!(matches!(
        service.find(id).await,
        Err(FindBlogPostError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete(id).await,
        Err(DeleteBlogPostError::NotFound { .. })
    ));
}

#[sqlx::test]
async fn authors_are_sorted_by_name(pool: SqlitePool) {
    insert_author(&pool, "Zoe").await;
    insert_author(&pool, "Ada").await;
    insert_author(&pool, "Mia").await;
    let store = Sqlite::from_pool(pool);

    let authors = store.list_authors().await.unwrap();

    let names: Vec<_> = authors.iter().map(|a| a.name().as_str()).collect();
    assert_eq!(names, ["Ada", "Mia", "Zoe"]);
}
