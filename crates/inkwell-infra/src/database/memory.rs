//! In-memory repositories - used when no database is configured, and by tests.
//!
//! All tables sit behind one async `RwLock` so that cascading deletes touch
//! several tables atomically. Unique and foreign-key rules mirror the
//! PostgreSQL schema. Data is lost on process restart.

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{Category, Comment, Post, Tag, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, TagRepository,
    UserRepository,
};

#[derive(Default)]
pub struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    categories: HashMap<Uuid, Category>,
    tags: HashMap<Uuid, Tag>,
    comments: HashMap<Uuid, Comment>,
    /// (post_id, tag_id) pairs.
    post_tags: HashSet<(Uuid, Uuid)>,
}

impl Tables {
    fn remove_post(&mut self, post_id: Uuid) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, c| c.post_id != post_id);
        self.post_tags.retain(|(p, _)| *p != post_id);
    }
}

/// Shared storage for every in-memory repository.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// A type that lives in one of the in-memory tables.
pub trait Stored: Clone + Send + Sync + 'static {
    const NAME: &'static str;

    fn id(&self) -> Uuid;

    fn table(tables: &Tables) -> &HashMap<Uuid, Self>;

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self>;

    /// Unique and foreign-key checks before a row is written.
    fn check(&self, tables: &Tables) -> Result<(), RepoError>;

    /// Remove dependent rows, or refuse the delete.
    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError>;
}

fn unique<T, F>(row: &T, tables: &Tables, field: &str, same: F) -> Result<(), RepoError>
where
    T: Stored,
    F: Fn(&T) -> bool,
{
    let clash = T::table(tables)
        .values()
        .any(|other| other.id() != row.id() && same(other));
    if clash {
        return Err(RepoError::Constraint(format!(
            "duplicate value for {}.{}",
            T::NAME,
            field
        )));
    }
    Ok(())
}

fn references<T>(table: &HashMap<Uuid, T>, id: Uuid, name: &str) -> Result<(), RepoError> {
    if !table.contains_key(&id) {
        return Err(RepoError::Constraint(format!("{name} {id} does not exist")));
    }
    Ok(())
}

impl Stored for User {
    const NAME: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.users
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        unique(self, tables, "username", |u| u.username == self.username)?;
        unique(self, tables, "email", |u| u.email == self.email)
    }

    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError> {
        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
        Ok(())
    }
}

impl Stored for Post {
    const NAME: &'static str = "posts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.posts
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.posts
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        unique(self, tables, "slug", |p| p.slug == self.slug)?;
        references(&tables.users, self.author_id, "user")?;
        references(&tables.categories, self.category_id, "category")
    }

    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError> {
        tables.remove_post(id);
        Ok(())
    }
}

impl Stored for Category {
    const NAME: &'static str = "categories";

    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.categories
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.categories
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        unique(self, tables, "name", |c| c.name == self.name)
    }

    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError> {
        if tables.posts.values().any(|p| p.category_id == id) {
            return Err(RepoError::Constraint(format!(
                "category {id} is still referenced by posts"
            )));
        }
        Ok(())
    }
}

impl Stored for Tag {
    const NAME: &'static str = "tags";

    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.tags
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.tags
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        unique(self, tables, "name", |t| t.name == self.name)
    }

    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError> {
        tables.post_tags.retain(|(_, t)| *t != id);
        Ok(())
    }
}

impl Stored for Comment {
    const NAME: &'static str = "comments";

    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.comments
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.comments
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        references(&tables.posts, self.post_id, "post")?;
        references(&tables.users, self.author_id, "user")
    }

    fn on_delete(_id: Uuid, _tables: &mut Tables) -> Result<(), RepoError> {
        Ok(())
    }
}

/// Generic in-memory repository over one table of the shared store.
pub struct InMemoryRepository<T> {
    store: Arc<InMemoryStore>,
    _entity: PhantomData<T>,
}

impl<T> InMemoryRepository<T> {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }
}

impl<T: Stored> InMemoryRepository<T> {
    async fn select<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        let tables = self.store.tables.read().await;
        T::table(&tables)
            .values()
            .filter(|row| predicate(*row))
            .cloned()
            .collect()
    }
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryCategoryRepository = InMemoryRepository<Category>;
pub type InMemoryTagRepository = InMemoryRepository<Tag>;
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;

#[async_trait]
impl<T: Stored> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(T::table(&tables).get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        Ok(self.select(|_| true).await)
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        if T::table(&tables).contains_key(&entity.id()) {
            return Err(RepoError::Constraint(format!(
                "duplicate primary key in {}",
                T::NAME
            )));
        }
        entity.check(&tables)?;
        T::table_mut(&mut tables).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !T::table(&tables).contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        entity.check(&tables)?;
        T::table_mut(&mut tables).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if !T::table(&tables).contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        T::on_delete(id, &mut tables)?;
        T::table_mut(&mut tables).remove(&id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self.select(|u| u.username == username).await.into_iter().next())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.select(|u| u.email == email).await.into_iter().next())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

impl InMemoryPostRepository {
    /// Posts matching `predicate`, newest first.
    async fn select_recent<F>(&self, predicate: F) -> Vec<Post>
    where
        F: Fn(&Post) -> bool + Send,
    {
        let mut posts = self.select(predicate).await;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self.select(|p| p.slug == slug).await.into_iter().next())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_slug(slug).await?.is_some())
    }

    async fn find_by_author_id(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self.select_recent(|p| p.author_id == author_id).await)
    }

    async fn find_by_author_id_and_published(
        &self,
        author_id: Uuid,
        published: bool,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .select_recent(|p| p.author_id == author_id && p.published == published)
            .await)
    }

    async fn count_by_author_id_and_published(
        &self,
        author_id: Uuid,
        published: bool,
    ) -> Result<u64, RepoError> {
        let posts = self
            .select(|p| p.author_id == author_id && p.published == published)
            .await;
        Ok(posts.len() as u64)
    }

    async fn find_by_category_id(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self.select_recent(|p| p.category_id == category_id).await)
    }

    async fn find_by_published_and_category_id(
        &self,
        published: bool,
        category_id: Uuid,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .select_recent(|p| p.published == published && p.category_id == category_id)
            .await)
    }

    async fn find_by_title_containing_ignore_case(
        &self,
        title: &str,
    ) -> Result<Vec<Post>, RepoError> {
        let needle = title.to_lowercase();
        Ok(self
            .select_recent(|p| p.title.to_lowercase().contains(&needle))
            .await)
    }

    async fn find_by_published(&self, published: bool) -> Result<Vec<Post>, RepoError> {
        Ok(self.select_recent(|p| p.published == published).await)
    }

    async fn find_published_ordered_by_date(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.select(|p| p.published).await;
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn find_tags(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, t)| tables.tags.get(t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn replace_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        references(&tables.posts, post_id, "post")?;
        for tag_id in tag_ids {
            references(&tables.tags, *tag_id, "tag")?;
        }

        tables.post_tags.retain(|(p, _)| *p != post_id);
        tables
            .post_tags
            .extend(tag_ids.iter().map(|tag_id| (post_id, *tag_id)));
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        Ok(self.select(|c| c.name == name).await.into_iter().next())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> Result<Vec<Category>, RepoError> {
        let needle = keyword.to_lowercase();
        let mut categories = self
            .select(|c| c.name.to_lowercase().contains(&needle))
            .await;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        Ok(self.select(|t| t.name == name).await.into_iter().next())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        Ok(self.select(|t| ids.contains(&t.id)).await)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments = self.select(|c| c.post_id == post_id).await;
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn find_by_author_id(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments = self.select(|c| c.author_id == author_id).await;
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    struct Repos {
        users: InMemoryUserRepository,
        posts: InMemoryPostRepository,
        categories: InMemoryCategoryRepository,
        tags: InMemoryTagRepository,
        comments: InMemoryCommentRepository,
    }

    fn repos() -> Repos {
        let store = InMemoryStore::new();
        Repos {
            users: InMemoryRepository::new(store.clone()),
            posts: InMemoryRepository::new(store.clone()),
            categories: InMemoryRepository::new(store.clone()),
            tags: InMemoryRepository::new(store.clone()),
            comments: InMemoryRepository::new(store),
        }
    }

    fn user(name: &str) -> User {
        User::new(name.into(), format!("{name}@example.com"), "hash".into(), None)
    }

    async fn seed_post(r: &Repos, author: &User, slug: &str) -> Post {
        let category = match r.categories.find_by_name("General").await.unwrap() {
            Some(c) => c,
            None => r
                .categories
                .insert(Category::new("General".into(), None))
                .await
                .unwrap(),
        };
        let post = Post::new(
            author.id,
            category.id,
            "Some title".into(),
            slug.into(),
            "content".into(),
        );
        r.posts.insert(post).await.unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_violation() {
        let r = repos();
        r.users.insert(user("writer")).await.unwrap();

        let mut clash = user("other");
        clash.username = "writer".into();
        let err = r.users.insert(clash).await.unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let r = repos();
        let category = r
            .categories
            .insert(Category::new("General".into(), None))
            .await
            .unwrap();

        let orphan = Post::new(
            Uuid::new_v4(),
            category.id,
            "Title".into(),
            "slug-1".into(),
            "c".into(),
        );
        let err = r.posts.insert(orphan).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let r = repos();
        let author = r.users.insert(user("author")).await.unwrap();
        let reader = r.users.insert(user("reader")).await.unwrap();
        let post = seed_post(&r, &author, "first-post").await;
        let tag = r.tags.insert(Tag::new("rust".into())).await.unwrap();
        r.posts.replace_tags(post.id, &[tag.id]).await.unwrap();
        r.comments
            .insert(Comment::new(post.id, reader.id, "Great read!".into()))
            .await
            .unwrap();

        r.users.delete(author.id).await.unwrap();

        assert!(r.posts.find_by_id(post.id).await.unwrap().is_none());
        assert!(r.comments.find_by_post_id(post.id).await.unwrap().is_empty());
        assert!(r.posts.find_tags(post.id).await.unwrap().is_empty());
        assert!(r.tags.find_by_id(tag.id).await.unwrap().is_some());
        assert!(r.users.find_by_id(reader.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_category_in_use_cannot_be_deleted() {
        let r = repos();
        let author = r.users.insert(user("author")).await.unwrap();
        let post = seed_post(&r, &author, "first-post").await;

        let err = r.categories.delete(post.category_id).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        r.posts.delete(post.id).await.unwrap();
        r.categories.delete(post.category_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_tags_overwrites_set() {
        let r = repos();
        let author = r.users.insert(user("author")).await.unwrap();
        let post = seed_post(&r, &author, "tagged-post").await;
        let rust = r.tags.insert(Tag::new("rust".into())).await.unwrap();
        let web = r.tags.insert(Tag::new("web".into())).await.unwrap();

        r.posts.replace_tags(post.id, &[rust.id, web.id]).await.unwrap();
        r.posts.replace_tags(post.id, &[web.id]).await.unwrap();

        let tags = r.posts.find_tags(post.id).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "web");
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let r = repos();
        let err = r.tags.update(Tag::new("ghost".into())).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let r = repos();
        let writer = r.users.insert(user("writer")).await.unwrap();

        let found = r.users.find_by_email("writer@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(writer.id));
        assert!(r.users.find_by_email("WRITER@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_posts_by_published_newest_first() {
        let r = repos();
        let author = r.users.insert(user("author")).await.unwrap();
        let older = seed_post(&r, &author, "older-post").await;
        let mut newer = seed_post(&r, &author, "newer-post").await;
        newer.created_at = older.created_at + Duration::minutes(5);
        newer.set_published(true);
        let newer = r.posts.update(newer).await.unwrap();
        let mut newest = seed_post(&r, &author, "newest-post").await;
        newest.created_at = older.created_at + Duration::minutes(10);
        newest.set_published(true);
        let newest = r.posts.update(newest).await.unwrap();

        let published: Vec<Uuid> = r
            .posts
            .find_by_published(true)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(published, [newest.id, newer.id]);

        let drafts = r.posts.find_by_published(false).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, older.id);
    }

    #[tokio::test]
    async fn test_find_comments_by_author_newest_first() {
        let r = repos();
        let author = r.users.insert(user("author")).await.unwrap();
        let reader = r.users.insert(user("reader")).await.unwrap();
        let post = seed_post(&r, &author, "first-post").await;

        let first = Comment::new(post.id, reader.id, "First!".into());
        let mut second = Comment::new(post.id, reader.id, "Second".into());
        second.created_at = first.created_at + Duration::minutes(1);
        r.comments.insert(second.clone()).await.unwrap();
        r.comments.insert(first.clone()).await.unwrap();
        r.comments
            .insert(Comment::new(post.id, author.id, "Thanks".into()))
            .await
            .unwrap();

        let ids: Vec<Uuid> = r
            .comments
            .find_by_author_id(reader.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, [second.id, first.id]);
    }

    #[tokio::test]
    async fn test_category_search_ignores_case() {
        let r = repos();
        for name in ["Rust", "Trust & Safety", "Go"] {
            r.categories
                .insert(Category::new(name.into(), None))
                .await
                .unwrap();
        }

        let found = r
            .categories
            .find_by_name_containing_ignore_case("RUST")
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Rust", "Trust & Safety"]);
    }
}
