use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use inkwell_shared::dto::{TagCreateRequest, TagResponse};

use super::validate;
use crate::error::DomainError;
use crate::mapper;
use crate::ports::TagRepository;

pub struct TagService {
    tags: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    pub async fn create(&self, request: TagCreateRequest) -> Result<TagResponse, DomainError> {
        validate(&request)?;

        if self.tags.exists_by_name(&request.name).await? {
            return Err(DomainError::Duplicate(format!(
                "tag '{}' already exists",
                request.name
            )));
        }

        let saved = self.tags.insert(mapper::tag::to_entity(request)).await?;
        info!(tag_id = %saved.id, name = %saved.name, "Tag created");
        Ok(saved.into())
    }

    pub async fn list(&self) -> Result<Vec<TagResponse>, DomainError> {
        let mut tags = self.tags.find_all().await?;
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(mapper::tag::to_response_list(&tags))
    }

    pub async fn get(&self, id: Uuid) -> Result<TagResponse, DomainError> {
        self.tags
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }

    /// Delete a tag; posts simply lose it.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.get(id).await?;
        self.tags.delete(id).await?;
        info!(tag_id = %id, "Tag deleted");
        Ok(())
    }
}
