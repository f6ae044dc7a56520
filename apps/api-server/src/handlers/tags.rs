//! Tag handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_shared::dto::TagCreateRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/tags
pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<TagCreateRequest>,
) -> AppResult<HttpResponse> {
    let tag = state.tags.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(tag))
}

/// GET /api/tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.tags.list().await?))
}

/// GET /api/tags/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.tags.get(path.into_inner()).await?))
}

/// DELETE /api/tags/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.tags.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
