use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Tag, User};

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new draft post.
    pub fn new(
        author_id: Uuid,
        category_id: Uuid,
        title: String,
        slug: String,
        content: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id,
            title,
            slug,
            content,
            published: false,
            published_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Set the published flag, keeping `published_at` in step with it.
    ///
    /// Republishing an already published post keeps the original date.
    pub fn set_published(&mut self, published: bool) {
        match (self.published, published) {
            (false, true) => self.published_at = Some(Utc::now()),
            (true, false) => self.published_at = None,
            _ => {}
        }
        self.published = published;
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// A post together with the relations its response shape needs.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub author: User,
    pub category: Category,
    pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Post {
        Post::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "A title".into(),
            "a-title".into(),
            "body".into(),
        )
    }

    #[test]
    fn test_new_post_is_draft() {
        let post = draft();
        assert!(!post.published);
        assert!(post.published_at.is_none());
        assert!(post.updated_at.is_none());
    }

    #[test]
    fn test_publish_stamps_date_once() {
        let mut post = draft();
        post.set_published(true);
        let first = post.published_at;
        assert!(first.is_some());

        post.set_published(true);
        assert_eq!(post.published_at, first);
    }

    #[test]
    fn test_unpublish_clears_date() {
        let mut post = draft();
        post.set_published(true);
        post.set_published(false);

        assert!(!post.published);
        assert!(post.published_at.is_none());
    }
}
