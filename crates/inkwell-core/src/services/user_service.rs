use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use inkwell_shared::dto::{PostStatsResponse, UserCreateRequest, UserResponse, UserUpdateRequest};

use super::validate;
use crate::domain::User;
use crate::error::DomainError;
use crate::mapper;
use crate::ports::{PasswordService, PostRepository, UserRepository};

/// Registration, profile management and credential checks.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            posts,
            passwords,
        }
    }

    pub async fn register(&self, request: UserCreateRequest) -> Result<UserResponse, DomainError> {
        validate(&request)?;
        debug!(username = %request.username, "Registering user");

        if self.users.exists_by_username(&request.username).await? {
            return Err(DomainError::Duplicate(format!(
                "username '{}' is already taken",
                request.username
            )));
        }
        if self.users.exists_by_email(&request.email).await? {
            return Err(DomainError::Duplicate(
                "email is already registered".to_string(),
            ));
        }

        let hash = self.hash(&request.password)?;
        let saved = self.users.insert(mapper::user::to_entity(request, hash)).await?;

        info!(user_id = %saved.id, "User registered");
        Ok(saved.into())
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            debug!(username = %username, "Rejected login attempt");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<UserResponse, DomainError> {
        self.find(id).await.map(Into::into)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<UserResponse, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .map(Into::into)
            .ok_or_else(|| DomainError::not_found("User", username))
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, DomainError> {
        let mut users = self.users.find_all().await?;
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Update the caller's own profile.
    pub async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        request: UserUpdateRequest,
    ) -> Result<UserResponse, DomainError> {
        if caller != id {
            return Err(DomainError::Forbidden(
                "users may only update their own profile".to_string(),
            ));
        }
        validate(&request)?;

        let mut user = self.find(id).await?;

        if let Some(email) = &request.email {
            if *email != user.email && self.users.exists_by_email(email).await? {
                return Err(DomainError::Duplicate(
                    "email is already registered".to_string(),
                ));
            }
        }

        let hash = match &request.password {
            Some(password) => Some(self.hash(password)?),
            None => None,
        };
        mapper::user::apply_update(&mut user, request, hash);

        let saved = self.users.update(user).await?;
        info!(user_id = %saved.id, "User updated");
        Ok(saved.into())
    }

    /// Delete the caller's own account together with their posts and comments.
    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), DomainError> {
        if caller != id {
            return Err(DomainError::Forbidden(
                "users may only delete their own account".to_string(),
            ));
        }
        self.find(id).await?;
        self.users.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn post_stats(&self, id: Uuid) -> Result<PostStatsResponse, DomainError> {
        self.find(id).await?;
        Ok(PostStatsResponse {
            published: self.posts.count_by_author_id_and_published(id, true).await?,
            drafts: self.posts.count_by_author_id_and_published(id, false).await?,
        })
    }

    async fn find(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        self.passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}
