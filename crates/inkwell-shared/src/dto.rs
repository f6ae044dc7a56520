//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire. Request types carry their
//! validation rules; call `validator::Validate::validate` before use.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Rejects strings that are empty or whitespace only.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message(Cow::from("must not be blank")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 20, message = "username must be between 5 - 20 characters")
    )]
    pub username: String,

    #[validate(
        custom(function = "not_blank"),
        email(message = "email should be valid")
    )]
    pub email: String,

    #[validate(
        custom(function = "not_blank"),
        length(min = 6, message = "password should be at least 6 characters")
    )]
    pub password: String,

    pub full_name: Option<String>,
}

/// Partial update of a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[validate(email(message = "email should be valid"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "password should be at least 6 characters"))]
    pub password: Option<String>,

    pub full_name: Option<String>,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Published/draft counters for one author.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStatsResponse {
    pub published: u64,
    pub drafts: u64,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Request to create a post. The author is the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostCreateRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 200, message = "title must be between 5 - 200 characters")
    )]
    pub title: String,

    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 200, message = "slug must be between 5 - 200 characters")
    )]
    pub slug: String,

    #[validate(
        custom(function = "not_blank"),
        length(min = 50, message = "content must be at least 50 characters")
    )]
    pub content: String,

    #[serde(default)]
    pub published: bool,

    #[validate(required(message = "category is required"))]
    pub category_id: Option<Uuid>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// Partial update of a post. Absent fields are left untouched; a present
/// `tagIds` replaces the whole tag set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdateRequest {
    #[validate(length(min = 5, max = 200, message = "title must be between 5 - 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 5, max = 200, message = "slug must be between 5 - 200 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 50, message = "content must be at least 50 characters"))]
    pub content: Option<String>,

    pub published: Option<bool>,

    pub category_id: Option<Uuid>,

    pub tag_ids: Option<Vec<Uuid>>,
}

/// Full post representation with its author, category and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub author: UserResponse,
    pub category: CategoryResponse,
    pub tags: Vec<TagResponse>,
}

// ---------------------------------------------------------------------------
// Categories & tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreateRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 50, message = "category name must be between 3 - 50 characters long")
    )]
    pub name: String,

    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TagCreateRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 2, max = 15, message = "tag name must be between 2 - 15 characters")
    )]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreateRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 1000, message = "content must be between 5 and 1000 characters")
    )]
    pub content: String,

    #[validate(required(message = "post is required"))]
    pub post_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: UserResponse,
}
