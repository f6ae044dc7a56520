use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use inkwell_core::domain::{Post, Tag};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};

use super::entity::{comment, post, tag, user};
use super::postgres_base::map_db_err;
use super::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

fn post_model(id: Uuid, slug: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id: Uuid::new_v4(),
        category_id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        slug: slug.to_owned(),
        content: "Content".to_owned(),
        published: true,
        published_at: Some(now.into()),
        created_at: now.into(),
        updated_at: None,
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, "test-post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::find_by_id(&repo, post_id)
        .await
        .unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert!(post.published_at.is_some());
}

#[tokio::test]
async fn test_find_post_by_slug_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_by_slug("nope-nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_exists_by_username_counts_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(1)]])
        .append_query_results([[count_row(0)]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    assert!(repo.exists_by_username("writer").await.unwrap());
    assert!(!repo.exists_by_username("nobody").await.unwrap());
}

#[tokio::test]
async fn test_find_user_by_email() {
    let now = Utc::now();
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id,
            username: "writer01".to_owned(),
            email: "writer01@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            full_name: None,
            created_at: now.into(),
            updated_at: None,
        }]])
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let found = repo
        .find_by_email("writer01@example.com")
        .await
        .unwrap()
        .expect("user should be found");
    assert_eq!(found.id, id);
    assert_eq!(found.username, "writer01");
    assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_published_keeps_row_order() {
    let newer = post_model(Uuid::new_v4(), "newer-post");
    let older = post_model(Uuid::new_v4(), "older-post");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![newer.clone(), older.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo.find_by_published(true).await.unwrap();
    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["newer-post", "older-post"]);
    assert!(posts.iter().all(|p| p.published));
}

#[tokio::test]
async fn test_find_comments_by_author() {
    let now = Utc::now();
    let author_id = Uuid::new_v4();
    let row = |content: &str| comment::Model {
        id: Uuid::new_v4(),
        post_id: Uuid::new_v4(),
        author_id,
        content: content.to_owned(),
        created_at: now.into(),
        updated_at: None,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row("Second"), row("First!")]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let comments = repo.find_by_author_id(author_id).await.unwrap();
    let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, ["Second", "First!"]);
    assert!(comments.iter().all(|c| c.author_id == author_id));
}

#[tokio::test]
async fn test_count_by_author_and_published() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(3)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let count = repo
        .count_by_author_id_and_published(Uuid::new_v4(), true)
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_insert_tag_returns_saved_row() {
    let tag = Tag::new("rust".into());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tag::Model {
            id: tag.id,
            name: tag.name.clone(),
            created_at: tag.created_at.into(),
            updated_at: None,
        }]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);

    let saved = BaseRepository::<Tag, Uuid>::insert(&repo, tag.clone())
        .await
        .unwrap();
    assert_eq!(saved.id, tag.id);
    assert_eq!(saved.name, "rust");
}

#[tokio::test]
async fn test_find_tags_by_empty_ids_skips_query() {
    // No results appended: any query would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresTagRepository::new(db);

    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let err = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[test]
fn test_map_db_err() {
    assert!(matches!(map_db_err(DbErr::RecordNotUpdated), RepoError::NotFound));
    assert!(matches!(
        map_db_err(DbErr::Custom("boom".into())),
        RepoError::Query(_)
    ));
}
