use inkwell_shared::dto::{UserCreateRequest, UserResponse, UserUpdateRequest};

use crate::domain::User;

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Build a new user from a registration request. The password must already be hashed.
pub fn to_entity(request: UserCreateRequest, password_hash: String) -> User {
    User::new(request.username, request.email, password_hash, request.full_name)
}

/// Overwrite only the fields present in `request`.
///
/// `password_hash` is the hash of `request.password`, computed by the caller.
pub fn apply_update(user: &mut User, request: UserUpdateRequest, password_hash: Option<String>) {
    if let Some(email) = request.email {
        user.email = email;
    }
    if let Some(hash) = password_hash {
        user.password_hash = hash;
    }
    if let Some(full_name) = request.full_name {
        user.full_name = Some(full_name);
    }
    user.touch();
}
