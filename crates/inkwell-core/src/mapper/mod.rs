//! Conversions between domain entities and wire DTOs.
//!
//! Entity → response conversions are `From` impls; request → entity
//! conversions and partial updates are free functions because they need
//! context the request does not carry (author, password hash).

pub mod category;
pub mod comment;
pub mod post;
pub mod tag;
pub mod user;
