use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    book::{Book, BookChanges, GenreRef, NewBook},
    query::{BookPredicate, SortDirection},
};

#[derive(Debug, Error)]
pub enum BookRepositoryError {
    #[error("query return nothing")]
    NotFound,
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn insert_book(&self, book: NewBook) -> Result<Book, BookRepositoryError>;

    async fn get_book_by_id(&self, id: i64) -> Result<Book, BookRepositoryError>;

    /// Fetch a page of books matching `filter` (all books when `None`),
    /// ordered by creation time.
    async fn find_books(
        &self,
        filter: Option<&BookPredicate>,
        sort: SortDirection,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Book>, BookRepositoryError>;

    /// Count all books matching `filter`, unpaginated.
    async fn count_books(&self, filter: Option<&BookPredicate>)
        -> Result<i64, BookRepositoryError>;

    async fn update_book(&self, id: i64, changes: BookChanges)
        -> Result<Book, BookRepositoryError>;

    async fn delete_book(&self, id: i64) -> Result<u64, BookRepositoryError>;

    /// Resolve genre ids to genres; ids without a row are simply absent
    /// from the result.
    async fn get_genres_by_ids(&self, ids: &[i64]) -> Result<Vec<GenreRef>, BookRepositoryError>;
}
