//! Service-level tests over the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use inkwell_core::DomainError;
use inkwell_core::domain::Tag;
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    AuthError, BaseRepository, PasswordService, PostRepository, TagRepository,
};
use inkwell_core::services::{
    AuthorPostFilter, CategoryService, CommentService, PostService, TagService, UserService,
};
use inkwell_infra::database::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryRepository, InMemoryStore, InMemoryTagRepository, InMemoryUserRepository,
};
use inkwell_shared::dto::{
    CategoryCreateRequest, CommentCreateRequest, PostCreateRequest, PostUpdateRequest,
    TagCreateRequest, UserCreateRequest, UserUpdateRequest,
};

/// Reversible "hash" so tests don't pay for Argon2.
struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Tag lookups that still report tags already removed from the store.
struct StaleTags;

#[async_trait]
impl BaseRepository<Tag, Uuid> for StaleTags {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(None)
    }

    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        Ok(Vec::new())
    }

    async fn insert(&self, entity: Tag) -> Result<Tag, RepoError> {
        Ok(entity)
    }

    async fn update(&self, entity: Tag) -> Result<Tag, RepoError> {
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl TagRepository for StaleTags {
    async fn find_by_name(&self, _name: &str) -> Result<Option<Tag>, RepoError> {
        Ok(None)
    }

    async fn exists_by_name(&self, _name: &str) -> Result<bool, RepoError> {
        Ok(false)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        Ok(ids
            .iter()
            .map(|id| Tag {
                id: *id,
                ..Tag::new(format!("gone-{id}"))
            })
            .collect())
    }
}

struct App {
    users: UserService,
    posts: PostService,
    categories: CategoryService,
    tags: TagService,
    comments: CommentService,
}

fn app() -> App {
    let store = InMemoryStore::new();
    let users: Arc<InMemoryUserRepository> = Arc::new(InMemoryRepository::new(store.clone()));
    let posts: Arc<InMemoryPostRepository> = Arc::new(InMemoryRepository::new(store.clone()));
    let categories: Arc<InMemoryCategoryRepository> =
        Arc::new(InMemoryRepository::new(store.clone()));
    let tags: Arc<InMemoryTagRepository> = Arc::new(InMemoryRepository::new(store.clone()));
    let comments: Arc<InMemoryCommentRepository> = Arc::new(InMemoryRepository::new(store));

    App {
        users: UserService::new(users.clone(), posts.clone(), Arc::new(PlainPasswords)),
        posts: PostService::new(posts.clone(), users.clone(), categories.clone(), tags.clone()),
        categories: CategoryService::new(categories, posts.clone()),
        tags: TagService::new(tags),
        comments: CommentService::new(comments, posts, users),
    }
}

fn signup(username: &str) -> UserCreateRequest {
    UserCreateRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "secret123".to_string(),
        full_name: None,
    }
}

fn draft(slug: &str, category_id: Uuid) -> PostCreateRequest {
    PostCreateRequest {
        title: format!("Notes on {slug}"),
        slug: slug.to_string(),
        content: "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do.".to_string(),
        published: false,
        category_id: Some(category_id),
        tag_ids: vec![],
    }
}

async fn seed(app: &App) -> (Uuid, Uuid) {
    let author = app.users.register(signup("author01")).await.unwrap();
    let category = app
        .categories
        .create(CategoryCreateRequest {
            name: "Engineering".to_string(),
            description: None,
        })
        .await
        .unwrap();
    (author.id, category.id)
}

#[tokio::test]
async fn test_register_and_authenticate() {
    let app = app();
    let user = app.users.register(signup("writer01")).await.unwrap();

    let found = app.users.authenticate("writer01", "secret123").await.unwrap();
    assert_eq!(found.id, user.id);
    assert_ne!(found.password_hash, "secret123");

    let wrong = app.users.authenticate("writer01", "nope-nope").await;
    assert!(matches!(wrong, Err(DomainError::Unauthorized)));
    let unknown = app.users.authenticate("ghost01", "secret123").await;
    assert!(matches!(unknown, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_invalid_input() {
    let app = app();
    app.users.register(signup("writer01")).await.unwrap();

    let same_name = app.users.register(signup("writer01")).await;
    assert!(matches!(same_name, Err(DomainError::Duplicate(_))));

    let mut same_email = signup("writer02");
    same_email.email = "writer01@example.com".to_string();
    let result = app.users.register(same_email).await;
    assert!(matches!(result, Err(DomainError::Duplicate(_))));

    let short = app.users.register(signup("abc")).await;
    match short {
        Err(DomainError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.starts_with("username")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_user_list_sorted_by_username() {
    let app = app();
    app.users.register(signup("zelda01")).await.unwrap();
    app.users.register(signup("alice01")).await.unwrap();

    let names: Vec<String> = app
        .users
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, ["alice01", "zelda01"]);
}

#[tokio::test]
async fn test_user_update_is_self_only() {
    let app = app();
    let me = app.users.register(signup("writer01")).await.unwrap();
    let other = app.users.register(signup("writer02")).await.unwrap();

    let request = UserUpdateRequest {
        full_name: Some("Ada Writer".to_string()),
        ..Default::default()
    };
    let forbidden = app.users.update(other.id, me.id, request.clone()).await;
    assert!(matches!(forbidden, Err(DomainError::Forbidden(_))));

    let updated = app.users.update(me.id, me.id, request).await.unwrap();
    assert_eq!(updated.full_name.as_deref(), Some("Ada Writer"));
    assert_eq!(updated.email, "writer01@example.com");

    let taken = UserUpdateRequest {
        email: Some("writer02@example.com".to_string()),
        ..Default::default()
    };
    let result = app.users.update(me.id, me.id, taken).await;
    assert!(matches!(result, Err(DomainError::Duplicate(_))));
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let app = app();
    let me = app.users.register(signup("writer01")).await.unwrap();

    let request = UserUpdateRequest {
        password: Some("brand-new-pw".to_string()),
        ..Default::default()
    };
    app.users.update(me.id, me.id, request).await.unwrap();

    assert!(app.users.authenticate("writer01", "secret123").await.is_err());
    assert!(app.users.authenticate("writer01", "brand-new-pw").await.is_ok());
}

#[tokio::test]
async fn test_create_post_with_tags() {
    let app = app();
    let (author, category) = seed(&app).await;
    let rust = app
        .tags
        .create(TagCreateRequest { name: "rust".to_string() })
        .await
        .unwrap();
    let async_tag = app
        .tags
        .create(TagCreateRequest { name: "async".to_string() })
        .await
        .unwrap();

    let mut request = draft("first-post", category);
    request.tag_ids = vec![rust.id, async_tag.id, rust.id];
    let post = app.posts.create(author, request).await.unwrap();

    assert!(!post.published);
    assert!(post.published_at.is_none());
    assert_eq!(post.author.id, author);
    assert_eq!(post.category.id, category);
    let names: Vec<&str> = post.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["async", "rust"]);
}

#[tokio::test]
async fn test_create_post_rejects_bad_references() {
    let app = app();
    let (author, category) = seed(&app).await;

    let missing_category = app.posts.create(author, draft("first-post", Uuid::new_v4())).await;
    assert!(matches!(missing_category, Err(DomainError::NotFound { .. })));

    let mut request = draft("first-post", category);
    request.tag_ids = vec![Uuid::new_v4()];
    let missing_tag = app.posts.create(author, request).await;
    assert!(matches!(missing_tag, Err(DomainError::NotFound { entity_type: "Tag", .. })));

    let mut request = draft("first-post", category);
    request.category_id = None;
    let no_category = app.posts.create(author, request).await;
    assert!(matches!(no_category, Err(DomainError::Validation(_))));

    let short_slug = app.posts.create(author, draft("abc", category)).await;
    assert!(matches!(short_slug, Err(DomainError::Validation(_))));

    app.posts.create(author, draft("first-post", category)).await.unwrap();
    let dup = app.posts.create(author, draft("first-post", category)).await;
    assert!(matches!(dup, Err(DomainError::Duplicate(_))));
}

#[tokio::test]
async fn test_publish_and_unpublish() {
    let app = app();
    let (author, category) = seed(&app).await;
    let post = app.posts.create(author, draft("first-post", category)).await.unwrap();

    let publish = PostUpdateRequest {
        published: Some(true),
        ..Default::default()
    };
    let published = app.posts.update(author, post.id, publish).await.unwrap();
    assert!(published.published);
    assert!(published.published_at.is_some());

    let unpublish = PostUpdateRequest {
        published: Some(false),
        ..Default::default()
    };
    let hidden = app.posts.update(author, post.id, unpublish).await.unwrap();
    assert!(!hidden.published);
    assert!(hidden.published_at.is_none());
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let app = app();
    let (author, category) = seed(&app).await;
    let tag = app
        .tags
        .create(TagCreateRequest { name: "rust".to_string() })
        .await
        .unwrap();
    let mut request = draft("first-post", category);
    request.tag_ids = vec![tag.id];
    let post = app.posts.create(author, request).await.unwrap();

    let rename = PostUpdateRequest {
        title: Some("A better title".to_string()),
        ..Default::default()
    };
    let updated = app.posts.update(author, post.id, rename).await.unwrap();
    assert_eq!(updated.title, "A better title");
    assert_eq!(updated.slug, post.slug);
    assert_eq!(updated.content, post.content);
    assert_eq!(updated.tags.len(), 1);

    let clear_tags = PostUpdateRequest {
        tag_ids: Some(vec![]),
        ..Default::default()
    };
    let updated = app.posts.update(author, post.id, clear_tags).await.unwrap();
    assert!(updated.tags.is_empty());
}

#[tokio::test]
async fn test_drafts_are_private() {
    let app = app();
    let (author, category) = seed(&app).await;
    let reader = app.users.register(signup("reader01")).await.unwrap();
    let post = app.posts.create(author, draft("first-post", category)).await.unwrap();

    assert!(app.posts.get(post.id, Some(author)).await.is_ok());
    assert!(matches!(
        app.posts.get(post.id, Some(reader.id)).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(app.posts.get_by_slug("first-post", None).await.is_err());
    assert!(app.posts.list_published().await.unwrap().is_empty());

    let drafts = app
        .posts
        .list_by_author(author, AuthorPostFilter::Drafts, Some(reader.id))
        .await;
    assert!(matches!(drafts, Err(DomainError::Forbidden(_))));
    let drafts = app
        .posts
        .list_by_author(author, AuthorPostFilter::Drafts, Some(author))
        .await
        .unwrap();
    assert_eq!(drafts.len(), 1);

    // Others cannot even see the draft to edit it.
    let edit = app
        .posts
        .update(reader.id, post.id, PostUpdateRequest::default())
        .await;
    assert!(matches!(edit, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_only_author_modifies_published_post() {
    let app = app();
    let (author, category) = seed(&app).await;
    let reader = app.users.register(signup("reader01")).await.unwrap();
    let mut request = draft("first-post", category);
    request.published = true;
    let post = app.posts.create(author, request).await.unwrap();

    let edit = app
        .posts
        .update(reader.id, post.id, PostUpdateRequest::default())
        .await;
    assert!(matches!(edit, Err(DomainError::Forbidden(_))));
    let delete = app.posts.delete(reader.id, post.id).await;
    assert!(matches!(delete, Err(DomainError::Forbidden(_))));

    app.posts.delete(author, post.id).await.unwrap();
    assert!(app.posts.get(post.id, Some(author)).await.is_err());
}

#[tokio::test]
async fn test_search_and_category_listing() {
    let app = app();
    let (author, category) = seed(&app).await;
    let mut request = draft("rust-tips", category);
    request.title = "Rust Tips and Tricks".to_string();
    request.published = true;
    app.posts.create(author, request).await.unwrap();
    app.posts.create(author, draft("hidden-rust", category)).await.unwrap();

    let hits = app.posts.search("rust").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].slug, "rust-tips");

    let in_category = app.posts.list_by_category(category).await.unwrap();
    assert_eq!(in_category.len(), 1);

    let stats = app.users.post_stats(author).await.unwrap();
    assert_eq!((stats.published, stats.drafts), (1, 1));
}

#[tokio::test]
async fn test_category_rules() {
    let app = app();
    let (author, category) = seed(&app).await;

    let dup = app
        .categories
        .create(CategoryCreateRequest {
            name: "Engineering".to_string(),
            description: None,
        })
        .await;
    assert!(matches!(dup, Err(DomainError::Duplicate(_))));

    let found = app.categories.list(Some("ENGIN")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(app.categories.get_by_name("Engineering").await.is_ok());

    let post = app.posts.create(author, draft("first-post", category)).await.unwrap();
    let in_use = app.categories.delete(category).await;
    assert!(matches!(in_use, Err(DomainError::InUse(_))));

    app.posts.delete(author, post.id).await.unwrap();
    app.categories.delete(category).await.unwrap();
    assert!(app.categories.get(category).await.is_err());
}

#[tokio::test]
async fn test_deleting_tag_detaches_it() {
    let app = app();
    let (author, category) = seed(&app).await;
    let tag = app
        .tags
        .create(TagCreateRequest { name: "rust".to_string() })
        .await
        .unwrap();
    let mut request = draft("first-post", category);
    request.tag_ids = vec![tag.id];
    let post = app.posts.create(author, request).await.unwrap();

    app.tags.delete(tag.id).await.unwrap();

    let post = app.posts.get(post.id, Some(author)).await.unwrap();
    assert!(post.tags.is_empty());
    assert!(app.tags.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_flow() {
    let app = app();
    let (author, category) = seed(&app).await;
    let reader = app.users.register(signup("reader01")).await.unwrap();
    let post = app.posts.create(author, draft("first-post", category)).await.unwrap();

    let on_draft = app
        .comments
        .create(
            reader.id,
            CommentCreateRequest {
                content: "Nice read!".to_string(),
                post_id: Some(post.id),
            },
        )
        .await;
    assert!(matches!(on_draft, Err(DomainError::NotFound { .. })));

    let publish = PostUpdateRequest {
        published: Some(true),
        ..Default::default()
    };
    app.posts.update(author, post.id, publish).await.unwrap();

    let comment = app
        .comments
        .create(
            reader.id,
            CommentCreateRequest {
                content: "Nice read!".to_string(),
                post_id: Some(post.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(comment.author.username, "reader01");

    let listed = app.comments.list_for_post(post.id, None).await.unwrap();
    assert_eq!(listed.len(), 1);

    let not_mine = app.comments.delete(author, comment.id).await;
    assert!(matches!(not_mine, Err(DomainError::Forbidden(_))));
    app.comments.delete(reader.id, comment.id).await.unwrap();
    assert!(app.comments.list_for_post(post.id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_user_removes_their_content() {
    let app = app();
    let (author, category) = seed(&app).await;
    let mut request = draft("first-post", category);
    request.published = true;
    let post = app.posts.create(author, request).await.unwrap();

    app.users.delete(author, author).await.unwrap();

    assert!(app.users.get(author).await.is_err());
    assert!(app.posts.get(post.id, None).await.is_err());
    // Category is free again once the author's posts are gone.
    app.categories.delete(category).await.unwrap();
}

#[tokio::test]
async fn test_failed_tag_link_removes_new_post() {
    let store = InMemoryStore::new();
    let users: Arc<InMemoryUserRepository> = Arc::new(InMemoryRepository::new(store.clone()));
    let posts: Arc<InMemoryPostRepository> = Arc::new(InMemoryRepository::new(store.clone()));
    let categories: Arc<InMemoryCategoryRepository> =
        Arc::new(InMemoryRepository::new(store));
    let user_service = UserService::new(users.clone(), posts.clone(), Arc::new(PlainPasswords));
    let category_service = CategoryService::new(categories.clone(), posts.clone());
    let post_service = PostService::new(posts.clone(), users, categories, Arc::new(StaleTags));

    let author = user_service.register(signup("author01")).await.unwrap();
    let category = category_service
        .create(CategoryCreateRequest {
            name: "Engineering".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let mut request = draft("orphan-post", category.id);
    request.tag_ids = vec![Uuid::new_v4()];
    let result = post_service.create(author.id, request).await;

    assert!(matches!(
        result,
        Err(DomainError::Repository(RepoError::Constraint(_)))
    ));
    assert!(posts.find_by_slug("orphan-post").await.unwrap().is_none());
    // The category is not held by a leftover post.
    category_service.delete(category.id).await.unwrap();
}

#[tokio::test]
async fn test_comments_by_author() {
    let app = app();
    let (author, category) = seed(&app).await;
    let reader = app.users.register(signup("reader01")).await.unwrap();
    let hidden = app.posts.create(author, draft("draft-post", category)).await.unwrap();
    let mut request = draft("public-post", category);
    request.published = true;
    let public = app.posts.create(author, request).await.unwrap();

    let comment = |post_id| CommentCreateRequest {
        content: "Nice read!".to_string(),
        post_id: Some(post_id),
    };
    app.comments.create(author, comment(hidden.id)).await.unwrap();
    app.comments.create(author, comment(public.id)).await.unwrap();
    app.comments.create(reader.id, comment(public.id)).await.unwrap();

    let anonymous = app.comments.list_by_author(author, None).await.unwrap();
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].author.username, "author01");

    let own = app.comments.list_by_author(author, Some(author)).await.unwrap();
    assert_eq!(own.len(), 2);

    let by_reader = app.comments.list_by_author(reader.id, Some(author)).await.unwrap();
    assert_eq!(by_reader.len(), 1);
    assert_eq!(by_reader[0].author.username, "reader01");

    let unknown = app.comments.list_by_author(Uuid::new_v4(), None).await;
    assert!(matches!(unknown, Err(DomainError::NotFound { .. })));
}
