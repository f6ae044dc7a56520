use inkwell_shared::dto::{CategoryCreateRequest, CategoryResponse};

use crate::domain::Category;

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

pub fn to_entity(request: CategoryCreateRequest) -> Category {
    Category::new(request.name, request.description)
}
