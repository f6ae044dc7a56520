//! User handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use inkwell_core::services::AuthorPostFilter;
use inkwell_shared::dto::{UserCreateRequest, UserUpdateRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    #[serde(default)]
    pub status: AuthorPostFilter,
}

/// POST /api/users
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<UserCreateRequest>,
) -> AppResult<HttpResponse> {
    let user = state.users.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// GET /api/users
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.users.list().await?))
}

/// GET /api/users/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.users.get(path.into_inner()).await?))
}

/// GET /api/users/by-username/{username}
pub async fn get_by_username(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.users.get_by_username(&path).await?))
}

/// PATCH /api/users/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UserUpdateRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .update(identity.user_id, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/users/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.users.delete(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/users/{id}/posts?status=published|drafts|all
pub async fn posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
    query: web::Query<PostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list_by_author(path.into_inner(), query.status, viewer.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/users/{id}/post-stats
pub async fn post_stats(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.users.post_stats(path.into_inner()).await?))
}
