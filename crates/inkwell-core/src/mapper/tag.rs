use inkwell_shared::dto::{TagCreateRequest, TagResponse};

use crate::domain::Tag;

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self::from(&tag)
    }
}

pub fn to_response_list(tags: &[Tag]) -> Vec<TagResponse> {
    tags.iter().map(TagResponse::from).collect()
}

pub fn to_entity(request: TagCreateRequest) -> Tag {
    Tag::new(request.name)
}
