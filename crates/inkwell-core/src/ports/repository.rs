use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Load every entity of this type.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;
}

/// Post repository.
///
/// Tag membership lives in a join table and is managed through
/// `find_tags` / `replace_tags` rather than on the `Post` itself.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, RepoError>;

    async fn find_by_author_id(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn find_by_author_id_and_published(
        &self,
        author_id: Uuid,
        published: bool,
    ) -> Result<Vec<Post>, RepoError>;

    async fn count_by_author_id_and_published(
        &self,
        author_id: Uuid,
        published: bool,
    ) -> Result<u64, RepoError>;

    async fn find_by_category_id(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn find_by_published_and_category_id(
        &self,
        published: bool,
        category_id: Uuid,
    ) -> Result<Vec<Post>, RepoError>;

    async fn find_by_title_containing_ignore_case(
        &self,
        title: &str,
    ) -> Result<Vec<Post>, RepoError>;

    async fn find_by_published(&self, published: bool) -> Result<Vec<Post>, RepoError>;

    /// Published posts, most recently published first.
    async fn find_published_ordered_by_date(&self) -> Result<Vec<Post>, RepoError>;

    /// Tags attached to a post, ordered by name.
    async fn find_tags(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;

    /// Replace the whole tag set of a post.
    async fn replace_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError>;

    async fn find_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> Result<Vec<Category>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError>;

    /// Load the given tags; unknown IDs are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn find_by_author_id(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
