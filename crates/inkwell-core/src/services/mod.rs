//! Application services - one per resource.
//!
//! Each service validates its input, resolves referenced entities through
//! the repository ports and returns response DTOs.

mod category_service;
mod comment_service;
mod post_service;
mod tag_service;
mod user_service;

use validator::Validate;

use crate::error::DomainError;

pub use category_service::CategoryService;
pub use comment_service::CommentService;
pub use post_service::{AuthorPostFilter, PostService};
pub use tag_service::TagService;
pub use user_service::UserService;

/// Run the request's validation rules.
fn validate<T: Validate>(request: &T) -> Result<(), DomainError> {
    request.validate().map_err(DomainError::from)
}
