use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use inkwell_shared::dto::{CommentCreateRequest, CommentResponse};

use super::validate;
use crate::domain::{Comment, CommentView, Post};
use crate::error::DomainError;
use crate::mapper;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    /// Comment on a post the caller can see.
    pub async fn create(
        &self,
        author_id: Uuid,
        request: CommentCreateRequest,
    ) -> Result<CommentResponse, DomainError> {
        validate(&request)?;

        let post_id = request
            .post_id
            .ok_or_else(|| DomainError::Validation(vec!["post_id: post is required".into()]))?;
        let post = self.find_visible_post(post_id, Some(author_id)).await?;

        let comment = mapper::comment::to_entity(request, post.id, author_id);
        let saved = self.comments.insert(comment).await?;
        info!(comment_id = %saved.id, post_id = %post.id, "Comment created");

        self.to_response(saved).await
    }

    /// Comments on a post, oldest first.
    pub async fn list_for_post(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<CommentResponse>, DomainError> {
        self.find_visible_post(post_id, viewer).await?;

        let comments = self.comments.find_by_post_id(post_id).await?;
        let mut responses = Vec::with_capacity(comments.len());
        for comment in comments {
            responses.push(self.to_response(comment).await?);
        }
        Ok(responses)
    }

    /// Comments written by one user, newest first.
    ///
    /// Comments on drafts are left out unless `viewer` wrote the draft.
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<CommentResponse>, DomainError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", author_id))?;

        let comments = self.comments.find_by_author_id(author_id).await?;
        let mut responses: Vec<CommentResponse> = Vec::with_capacity(comments.len());
        for comment in comments {
            match self.find_visible_post(comment.post_id, viewer).await {
                Ok(_) => {}
                Err(DomainError::NotFound { .. }) => continue,
                Err(err) => return Err(err),
            }
            responses.push(
                CommentView {
                    comment,
                    author: author.clone(),
                }
                .into(),
            );
        }
        Ok(responses)
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), DomainError> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))?;

        if comment.author_id != caller {
            return Err(DomainError::Forbidden(
                "only the author may delete a comment".to_string(),
            ));
        }

        self.comments.delete(id).await?;
        info!(comment_id = %id, "Comment deleted");
        Ok(())
    }

    async fn find_visible_post(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .filter(|p| p.published || viewer == Some(p.author_id))
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    async fn to_response(&self, comment: Comment) -> Result<CommentResponse, DomainError> {
        let author = self
            .users
            .find_by_id(comment.author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", comment.author_id))?;
        Ok(CommentView { comment, author }.into())
    }
}
