use inkwell_shared::dto::{CommentCreateRequest, CommentResponse};
use uuid::Uuid;

use crate::domain::{Comment, CommentView};

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.comment.id,
            content: view.comment.content,
            created_at: view.comment.created_at,
            author: view.author.into(),
        }
    }
}

/// Build a comment on `post_id` written by `author_id`.
pub fn to_entity(request: CommentCreateRequest, post_id: Uuid, author_id: Uuid) -> Comment {
    Comment::new(post_id, author_id, request.content)
}
