use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::user::{NewUser, User, UserChanges};

#[derive(Debug, Error)]
pub enum UserRepositoryError {
    #[error("query return nothing")]
    NotFound,
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, UserRepositoryError>;

    async fn get_user_by_id(&self, id: i64) -> Result<User, UserRepositoryError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    async fn update_user(&self, id: i64, changes: UserChanges)
        -> Result<User, UserRepositoryError>;

    async fn delete_user(&self, id: i64) -> Result<u64, UserRepositoryError>;
}
