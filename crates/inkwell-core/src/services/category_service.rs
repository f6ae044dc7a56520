use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use inkwell_shared::dto::{CategoryCreateRequest, CategoryResponse};

use super::validate;
use crate::domain::Category;
use crate::error::DomainError;
use crate::mapper;
use crate::ports::{CategoryRepository, PostRepository};

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { categories, posts }
    }

    pub async fn create(
        &self,
        request: CategoryCreateRequest,
    ) -> Result<CategoryResponse, DomainError> {
        validate(&request)?;

        if self.categories.exists_by_name(&request.name).await? {
            return Err(DomainError::Duplicate(format!(
                "category '{}' already exists",
                request.name
            )));
        }

        let saved = self
            .categories
            .insert(mapper::category::to_entity(request))
            .await?;
        info!(category_id = %saved.id, name = %saved.name, "Category created");
        Ok(saved.into())
    }

    /// All categories, or those whose name contains `keyword` (case-insensitive).
    pub async fn list(&self, keyword: Option<&str>) -> Result<Vec<CategoryResponse>, DomainError> {
        let mut categories = match keyword.map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => {
                self.categories
                    .find_by_name_containing_ignore_case(keyword)
                    .await?
            }
            None => self.categories.find_all().await?,
        };
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<CategoryResponse, DomainError> {
        self.find(id).await.map(Into::into)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<CategoryResponse, DomainError> {
        self.categories
            .find_by_name(name)
            .await?
            .map(Into::into)
            .ok_or_else(|| DomainError::not_found("Category", name))
    }

    /// Delete a category that no post references.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.find(id).await?;

        if !self.posts.find_by_category_id(id).await?.is_empty() {
            return Err(DomainError::InUse(
                "category still has posts".to_string(),
            ));
        }

        self.categories.delete(id).await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }
}
