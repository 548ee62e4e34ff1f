use thiserror::Error;

use crate::domain::{
    entities::{
        chapter::{Chapter, ChapterChanges, NewChapter},
        query::{PageMeta, PageRequest, Paginated, SortDirection},
    },
    repositories::chapter::{ChapterRepository, ChapterRepositoryError},
};

#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("chapter with id {0} not found")]
    ChapterNotFound(i64),
    #[error("chapter with id {id} and book id {book_id} not found")]
    ChapterNotInBook { id: i64, book_id: i64 },
    #[error("book with id {0} not found")]
    BookNotFound(i64),
    #[error("no chapters found for book id {0}")]
    NoChapters(i64),
    #[error("repository error: {0}")]
    RepositoryError(#[from] ChapterRepositoryError),
}

#[derive(Clone)]
pub struct ChapterService<R>
where
    R: ChapterRepository,
{
    repo: R,
}

impl<R> ChapterService<R>
where
    R: ChapterRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_chapter(&self, chapter: NewChapter) -> Result<Chapter, ChapterError> {
        if !self.repo.book_exists(chapter.book_id).await? {
            return Err(ChapterError::BookNotFound(chapter.book_id));
        }

        Ok(self.repo.insert_chapter(chapter).await?)
    }

    pub async fn fetch_all(
        &self,
        sort: SortDirection,
        page: PageRequest,
    ) -> Result<Paginated<Chapter>, ChapterError> {
        let data = self
            .repo
            .find_chapters(sort, page.offset(), page.limit)
            .await?;
        let total = self.repo.count_chapters().await?;

        Ok(Paginated {
            data,
            meta: PageMeta::new(total, &page),
        })
    }

    pub async fn fetch_chapter_by_id(&self, id: i64) -> Result<Chapter, ChapterError> {
        self.repo.get_chapter_by_id(id).await.map_err(|e| match e {
            ChapterRepositoryError::NotFound => ChapterError::ChapterNotFound(id),
            e => e.into(),
        })
    }

    pub async fn fetch_chapter_in_book(
        &self,
        id: i64,
        book_id: i64,
    ) -> Result<Chapter, ChapterError> {
        self.repo
            .get_chapter_in_book(id, book_id)
            .await
            .map_err(|e| match e {
                ChapterRepositoryError::NotFound => ChapterError::ChapterNotInBook { id, book_id },
                e => e.into(),
            })
    }

    pub async fn fetch_chapters_by_book(
        &self,
        book_id: i64,
        sort: SortDirection,
    ) -> Result<Vec<Chapter>, ChapterError> {
        let chapters = self.repo.find_chapters_by_book(book_id, sort).await?;
        if chapters.is_empty() {
            return Err(ChapterError::NoChapters(book_id));
        }

        Ok(chapters)
    }

    pub async fn update_chapter(
        &self,
        id: i64,
        changes: ChapterChanges,
    ) -> Result<Chapter, ChapterError> {
        self.fetch_chapter_by_id(id).await?;

        if let Some(book_id) = changes.book_id {
            if !self.repo.book_exists(book_id).await? {
                return Err(ChapterError::BookNotFound(book_id));
            }
        }

        Ok(self.repo.update_chapter(id, changes).await?)
    }

    pub async fn delete_chapter(&self, id: i64) -> Result<(), ChapterError> {
        self.fetch_chapter_by_id(id).await?;
        self.repo.delete_chapter(id).await?;

        Ok(())
    }
}
