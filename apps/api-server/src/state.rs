//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{
    CategoryRepository, CommentRepository, PasswordService, PostRepository, TagRepository,
    TokenService, UserRepository,
};
use inkwell_core::services::{
    CategoryService, CommentService, PostService, TagService, UserService,
};
use inkwell_infra::auth::{Argon2PasswordService, JwtTokenService};
use inkwell_infra::database::{
    DatabaseConnections, InMemoryCategoryRepository, InMemoryCommentRepository,
    InMemoryPostRepository, InMemoryStore, InMemoryTagRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use inkwell_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresTagRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// One repository per resource, all backed by the same store.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            posts: Arc::new(InMemoryPostRepository::new(store.clone())),
            categories: Arc::new(InMemoryCategoryRepository::new(store.clone())),
            tags: Arc::new(InMemoryTagRepository::new(store.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(store)),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.main.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.main.clone())),
            tags: Arc::new(PostgresTagRepository::new(db.main.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
    pub tags: Arc<TagService>,
    pub comments: Arc<CommentService>,
    pub tokens: Arc<dyn TokenService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Wire the services on top of `repos`.
    pub fn from_parts(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(
                repos.users.clone(),
                repos.posts.clone(),
                passwords,
            )),
            posts: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.users.clone(),
                repos.categories.clone(),
                repos.tags.clone(),
            )),
            categories: Arc::new(CategoryService::new(repos.categories, repos.posts.clone())),
            tags: Arc::new(TagService::new(repos.tags)),
            comments: Arc::new(CommentService::new(repos.comments, repos.posts, repos.users)),
            tokens,
            db,
        }
    }

    /// Build the state from configuration, connecting to PostgreSQL when a
    /// database URL is set.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            use migration::{Migrator, MigratorTrait};

            let db = DatabaseConnections::init(db_config).await?;
            if db_config.auto_migrate {
                tracing::info!("Applying pending migrations");
                Migrator::up(&db.main, None).await?;
            }

            let repos = Repositories::postgres(&db);
            tracing::info!("Application state initialized (postgres)");
            return Ok(Self::from_parts(repos, passwords, tokens, Some(Arc::new(db))));
        }

        if config.database.is_some() {
            tracing::warn!("DATABASE_URL is set but the postgres feature is disabled");
        } else {
            tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
        }

        Ok(Self::from_parts(
            Repositories::in_memory(),
            passwords,
            tokens,
            None,
        ))
    }
}
