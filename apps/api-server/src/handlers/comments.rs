//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_shared::dto::CommentCreateRequest;

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CommentCreateRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .create(identity.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// GET /api/posts/{id}/comments
pub async fn list_for_post(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state
        .comments
        .list_for_post(path.into_inner(), viewer.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// GET /api/users/{id}/comments
pub async fn list_by_author(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state
        .comments
        .list_by_author(path.into_inner(), viewer.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// DELETE /api/comments/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.comments.delete(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
