use std::collections::HashSet;

use thiserror::Error;

use crate::domain::{
    entities::{
        book::{Book, BookChanges, NewBook},
        query::{BookQuery, PageMeta, PageRequest, Paginated, SortDirection},
    },
    repositories::book::{BookRepository, BookRepositoryError},
};

#[derive(Debug, Error)]
pub enum BookError {
    #[error("book with id {0} not found")]
    BookNotFound(i64),
    #[error("one or more genres not found")]
    GenreNotFound,
    #[error("repository error: {0}")]
    RepositoryError(#[from] BookRepositoryError),
}

#[derive(Clone)]
pub struct BookService<R>
where
    R: BookRepository,
{
    repo: R,
}

impl<R> BookService<R>
where
    R: BookRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_book(&self, book: NewBook) -> Result<Book, BookError> {
        self.check_genres_exist(&book.genre_ids).await?;

        Ok(self.repo.insert_book(book).await?)
    }

    pub async fn fetch_all(
        &self,
        sort: SortDirection,
        page: PageRequest,
    ) -> Result<Paginated<Book>, BookError> {
        let data = self
            .repo
            .find_books(None, sort, page.offset(), page.limit)
            .await?;
        let total = self.repo.count_books(None).await?;

        Ok(Paginated {
            data,
            meta: PageMeta::new(total, &page),
        })
    }

    pub async fn fetch_book_by_id(&self, id: i64) -> Result<Book, BookError> {
        self.repo.get_book_by_id(id).await.map_err(|e| match e {
            BookRepositoryError::NotFound => BookError::BookNotFound(id),
            e => e.into(),
        })
    }

    /// Combined genre/search/creator search.
    ///
    /// Without any criterion this is the plain listing. Otherwise the page
    /// and the total are fetched with the composed filter (two independent
    /// queries, not wrapped in a transaction, so they can disagree under
    /// concurrent writes), and with a genre criterion the fetched page is
    /// then narrowed to books carrying every requested genre. The storage
    /// filter only requires one matching genre, so `meta.total` counts
    /// any-genre matches and can exceed the number of rows a full scan
    /// would return; the count is not re-issued after narrowing.
    pub async fn search_books(&self, query: BookQuery) -> Result<Paginated<Book>, BookError> {
        let Some(filter) = query.filter() else {
            return self.fetch_all(query.sort, query.page).await;
        };

        let books = self
            .repo
            .find_books(Some(&filter), query.sort, query.page.offset(), query.page.limit)
            .await?;
        let total = self.repo.count_books(Some(&filter)).await?;

        let data = if query.genre_ids.is_empty() {
            books
        } else {
            books
                .into_iter()
                .filter(|book| {
                    let book_genre_ids: HashSet<i64> =
                        book.genres.iter().map(|genre| genre.id).collect();
                    query.genre_ids.iter().all(|id| book_genre_ids.contains(id))
                })
                .collect()
        };

        Ok(Paginated {
            data,
            meta: PageMeta::new(total, &query.page),
        })
    }

    pub async fn update_book(&self, id: i64, changes: BookChanges) -> Result<Book, BookError> {
        self.fetch_book_by_id(id).await?;

        if let Some(genre_ids) = &changes.genre_ids {
            self.check_genres_exist(genre_ids).await?;
        }

        Ok(self.repo.update_book(id, changes).await?)
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), BookError> {
        self.fetch_book_by_id(id).await?;
        self.repo.delete_book(id).await?;

        Ok(())
    }

    async fn check_genres_exist(&self, genre_ids: &[i64]) -> Result<(), BookError> {
        let genres = self.repo.get_genres_by_ids(genre_ids).await?;
        if genres.len() != genre_ids.len() {
            return Err(BookError::GenreNotFound);
        }

        Ok(())
    }
}
