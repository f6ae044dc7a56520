use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use inkwell_shared::dto::{PostCreateRequest, PostResponse, PostUpdateRequest};

use super::validate;
use crate::domain::{Category, Post, PostView, User};
use crate::error::DomainError;
use crate::mapper;
use crate::ports::{CategoryRepository, PostRepository, TagRepository, UserRepository};

/// Which of an author's posts to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorPostFilter {
    #[default]
    Published,
    Drafts,
    All,
}

/// Post authoring and reading.
///
/// Drafts are only visible to their author; for everyone else a draft
/// behaves as if it did not exist.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            categories,
            tags,
        }
    }

    pub async fn create(
        &self,
        author_id: Uuid,
        request: PostCreateRequest,
    ) -> Result<PostResponse, DomainError> {
        validate(&request)?;
        debug!(slug = %request.slug, "Creating post");

        let author = self.find_user(author_id).await?;
        let category_id = request
            .category_id
            .ok_or_else(|| DomainError::Validation(vec!["category_id: category is required".into()]))?;
        let category = self.find_category(category_id).await?;

        if self.posts.exists_by_slug(&request.slug).await? {
            return Err(DomainError::Duplicate(format!(
                "slug '{}' is already in use",
                request.slug
            )));
        }
        let tag_ids = self.resolve_tags(&request.tag_ids).await?;

        let post = mapper::post::to_entity(&request, author.id, category.id);
        let saved = self.posts.insert(post).await?;
        if let Err(err) = self.posts.replace_tags(saved.id, &tag_ids).await {
            // Do not leave an untagged post behind.
            warn!(post_id = %saved.id, error = %err, "Tag linking failed, removing post");
            self.posts.delete(saved.id).await?;
            return Err(err.into());
        }

        info!(post_id = %saved.id, author_id = %author.id, "Post created");
        let tags = self.posts.find_tags(saved.id).await?;
        Ok(PostView {
            post: saved,
            author,
            category,
            tags,
        }
        .into())
    }

    pub async fn get(&self, id: Uuid, viewer: Option<Uuid>) -> Result<PostResponse, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .filter(|p| is_visible(p, viewer))
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        self.to_response(post).await
    }

    pub async fn get_by_slug(
        &self,
        slug: &str,
        viewer: Option<Uuid>,
    ) -> Result<PostResponse, DomainError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .filter(|p| is_visible(p, viewer))
            .ok_or_else(|| DomainError::not_found("Post", slug))?;
        self.to_response(post).await
    }

    /// Published posts, newest first.
    pub async fn list_published(&self) -> Result<Vec<PostResponse>, DomainError> {
        let posts = self.posts.find_published_ordered_by_date().await?;
        self.to_responses(posts).await
    }

    /// Published posts whose title contains `query`, ignoring case.
    pub async fn search(&self, query: &str) -> Result<Vec<PostResponse>, DomainError> {
        let posts = self
            .posts
            .find_by_title_containing_ignore_case(query)
            .await?
            .into_iter()
            .filter(|p| p.published)
            .collect();
        self.to_responses(posts).await
    }

    /// Posts of one author. Drafts are only listed for the author themself.
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        filter: AuthorPostFilter,
        viewer: Option<Uuid>,
    ) -> Result<Vec<PostResponse>, DomainError> {
        self.find_user(author_id).await?;

        if filter != AuthorPostFilter::Published && viewer != Some(author_id) {
            return Err(DomainError::Forbidden(
                "drafts are only visible to their author".to_string(),
            ));
        }

        let mut posts = match filter {
            AuthorPostFilter::Published => {
                self.posts
                    .find_by_author_id_and_published(author_id, true)
                    .await?
            }
            AuthorPostFilter::Drafts => {
                self.posts
                    .find_by_author_id_and_published(author_id, false)
                    .await?
            }
            AuthorPostFilter::All => self.posts.find_by_author_id(author_id).await?,
        };
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.to_responses(posts).await
    }

    /// Published posts in a category, newest first.
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<PostResponse>, DomainError> {
        self.find_category(category_id).await?;

        let mut posts = self
            .posts
            .find_by_published_and_category_id(true, category_id)
            .await?;
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        self.to_responses(posts).await
    }

    pub async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        request: PostUpdateRequest,
    ) -> Result<PostResponse, DomainError> {
        validate(&request)?;

        let mut post = self.find_owned(caller, id).await?;

        if let Some(slug) = &request.slug {
            if *slug != post.slug && self.posts.exists_by_slug(slug).await? {
                return Err(DomainError::Duplicate(format!(
                    "slug '{slug}' is already in use"
                )));
            }
        }
        if let Some(category_id) = request.category_id {
            post.category_id = self.find_category(category_id).await?.id;
        }
        let tag_ids = match &request.tag_ids {
            Some(ids) => Some(self.resolve_tags(ids).await?),
            None => None,
        };

        mapper::post::apply_update(&mut post, &request);
        let saved = self.posts.update(post).await?;
        if let Some(tag_ids) = tag_ids {
            self.posts.replace_tags(saved.id, &tag_ids).await?;
        }

        info!(post_id = %saved.id, "Post updated");
        self.to_response(saved).await
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.find_owned(caller, id).await?;
        self.posts.delete(id).await?;
        info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Load a post and check that `caller` wrote it.
    async fn find_owned(&self, caller: Uuid, id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .filter(|p| is_visible(p, Some(caller)))
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        if !post.is_owned_by(caller) {
            return Err(DomainError::Forbidden(
                "only the author may modify a post".to_string(),
            ));
        }
        Ok(post)
    }

    /// De-duplicate tag IDs and make sure every one of them exists.
    async fn resolve_tags(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, DomainError> {
        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let found = self.tags.find_by_ids(&unique).await?;
        if let Some(missing) = unique.iter().find(|id| !found.iter().any(|t| t.id == **id)) {
            return Err(DomainError::not_found("Tag", missing));
        }
        Ok(unique)
    }

    async fn to_response(&self, post: Post) -> Result<PostResponse, DomainError> {
        let author = self.find_user(post.author_id).await?;
        let category = self.find_category(post.category_id).await?;
        let tags = self.posts.find_tags(post.id).await?;
        Ok(PostView {
            post,
            author,
            category,
            tags,
        }
        .into())
    }

    async fn to_responses(&self, posts: Vec<Post>) -> Result<Vec<PostResponse>, DomainError> {
        let mut responses = Vec::with_capacity(posts.len());
        for post in posts {
            responses.push(self.to_response(post).await?);
        }
        Ok(responses)
    }

    async fn find_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn find_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }
}

fn is_visible(post: &Post, viewer: Option<Uuid>) -> bool {
    post.published || viewer == Some(post.author_id)
}
