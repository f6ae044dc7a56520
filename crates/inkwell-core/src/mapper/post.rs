use inkwell_shared::dto::{PostCreateRequest, PostResponse, PostUpdateRequest};
use uuid::Uuid;

use super::tag::to_response_list;
use crate::domain::{Post, PostView};

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        let PostView {
            post,
            author,
            category,
            tags,
        } = view;

        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            published: post.published,
            published_at: post.published_at,
            created_at: post.created_at,
            author: author.into(),
            category: category.into(),
            tags: to_response_list(&tags),
        }
    }
}

/// Build a post from a create request. Tags are attached separately.
pub fn to_entity(request: &PostCreateRequest, author_id: Uuid, category_id: Uuid) -> Post {
    let mut post = Post::new(
        author_id,
        category_id,
        request.title.clone(),
        request.slug.clone(),
        request.content.clone(),
    );
    post.set_published(request.published);
    post
}

/// Overwrite the scalar fields present in `request`.
///
/// Category and tag changes need lookups and are applied by the caller.
pub fn apply_update(post: &mut Post, request: &PostUpdateRequest) {
    if let Some(published) = request.published {
        post.set_published(published);
    }
    if let Some(title) = &request.title {
        post.title = title.clone();
    }
    if let Some(slug) = &request.slug {
        post.slug = slug.clone();
    }
    if let Some(content) = &request.content {
        post.content = content.clone();
    }
    post.touch();
}
