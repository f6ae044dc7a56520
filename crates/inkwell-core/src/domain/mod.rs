//! Domain entities - the core business objects.

mod category;
mod comment;
mod post;
mod tag;
mod user;

pub use category::Category;
pub use comment::{Comment, CommentView};
pub use post::{Post, PostView};
pub use tag::Tag;
pub use user::User;
