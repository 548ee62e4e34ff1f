use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::genre::{Genre, GenreChanges, NewGenre};

#[derive(Debug, Error)]
pub enum GenreRepositoryError {
    #[error("query return nothing")]
    NotFound,
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn insert_genre(&self, genre: NewGenre) -> Result<Genre, GenreRepositoryError>;

    /// All genres ordered by name.
    async fn get_genres(&self) -> Result<Vec<Genre>, GenreRepositoryError>;

    async fn get_genre_by_id(&self, id: i64) -> Result<Genre, GenreRepositoryError>;

    async fn update_genre(
        &self,
        id: i64,
        changes: GenreChanges,
    ) -> Result<Genre, GenreRepositoryError>;

    async fn delete_genre(&self, id: i64) -> Result<u64, GenreRepositoryError>;
}
