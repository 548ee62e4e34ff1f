use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    chapter::{Chapter, ChapterChanges, NewChapter},
    query::SortDirection,
};

#[derive(Debug, Error)]
pub enum ChapterRepositoryError {
    #[error("query return nothing")]
    NotFound,
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait ChapterRepository: Send + Sync {
    async fn insert_chapter(&self, chapter: NewChapter)
        -> Result<Chapter, ChapterRepositoryError>;

    async fn get_chapter_by_id(&self, id: i64) -> Result<Chapter, ChapterRepositoryError>;

    /// Fetch a chapter only when it belongs to the given book.
    async fn get_chapter_in_book(
        &self,
        id: i64,
        book_id: i64,
    ) -> Result<Chapter, ChapterRepositoryError>;

    /// Page over every chapter, ordered by creation time.
    async fn find_chapters(
        &self,
        sort: SortDirection,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Chapter>, ChapterRepositoryError>;

    async fn count_chapters(&self) -> Result<i64, ChapterRepositoryError>;

    /// Every chapter of one book, ordered by chapter number.
    async fn find_chapters_by_book(
        &self,
        book_id: i64,
        sort: SortDirection,
    ) -> Result<Vec<Chapter>, ChapterRepositoryError>;

    async fn update_chapter(
        &self,
        id: i64,
        changes: ChapterChanges,
    ) -> Result<Chapter, ChapterRepositoryError>;

    async fn delete_chapter(&self, id: i64) -> Result<u64, ChapterRepositoryError>;

    async fn book_exists(&self, book_id: i64) -> Result<bool, ChapterRepositoryError>;
}
