use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        entities::{
            book::{Book, BookChanges, BookDigest, ChapterDigest, GenreRef, NewBook},
            query::{BookQuery, PageRequest, Paginated, SortDirection},
        },
        services::book::BookService,
    },
    infrastructure::domain::repositories::book::BookRepositoryImpl,
    presentation::token::SessionUser,
};

use super::{ListParams, error::RestError, response::Envelope};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub alt_title: Option<String>,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub created_at: NaiveDateTime,
    pub genres: Vec<GenreRefResponse>,
    pub chapters: Vec<ChapterDigestResponse>,
}

#[derive(Debug, Serialize)]
pub struct GenreRefResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDigestResponse {
    pub id: i64,
    pub number: f64,
    pub volume: Option<String>,
    pub name: Option<String>,
    pub book_id: i64,
    pub thumbnail: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct BookDigestResponse {
    pub id: i64,
    pub title: String,
    pub cover: Option<String>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            alt_title: book.alt_title,
            cover: book.cover,
            author: book.author,
            artist: book.artist,
            synopsis: book.synopsis,
            status: book.status,
            kind: book.kind,
            created_at: book.created_at,
            genres: book.genres.into_iter().map(Into::into).collect(),
            chapters: book.chapters.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<GenreRef> for GenreRefResponse {
    fn from(genre: GenreRef) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

impl From<ChapterDigest> for ChapterDigestResponse {
    fn from(chapter: ChapterDigest) -> Self {
        Self {
            id: chapter.id,
            number: chapter.number,
            volume: chapter.volume,
            name: chapter.name,
            book_id: chapter.book_id,
            thumbnail: chapter.thumbnail,
            created_at: chapter.created_at,
        }
    }
}

impl From<BookDigest> for BookDigestResponse {
    fn from(book: BookDigest) -> Self {
        Self {
            id: book.id,
            title: book.title,
            cover: book.cover,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<SortDirection>,
    /// Comma-separated genre ids.
    pub genre_ids: Option<String>,
    pub search: Option<String>,
    pub creator: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub alt_title: Option<String>,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub genre_ids: Vec<i64>,
}

impl From<CreateBookRequest> for NewBook {
    fn from(req: CreateBookRequest) -> Self {
        Self {
            title: req.title,
            alt_title: req.alt_title,
            cover: req.cover,
            author: req.author,
            artist: req.artist,
            synopsis: req.synopsis,
            status: req.status,
            kind: req.kind,
            genre_ids: req.genre_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub alt_title: Option<String>,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub genre_ids: Option<Vec<i64>>,
}

impl From<UpdateBookRequest> for BookChanges {
    fn from(req: UpdateBookRequest) -> Self {
        Self {
            title: req.title,
            alt_title: req.alt_title,
            cover: req.cover,
            author: req.author,
            artist: req.artist,
            synopsis: req.synopsis,
            status: req.status,
            kind: req.kind,
            genre_ids: req.genre_ids,
        }
    }
}

fn parse_genre_ids(raw: Option<&str>) -> Result<Vec<i64>, RestError> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(vec![]);
    };

    raw.split(',')
        .map(|token| {
            token.trim().parse::<i64>().map_err(|_| {
                RestError::bad_request("genreIds must be a comma-separated list of integers")
            })
        })
        .collect()
}

fn page_envelope(result: Paginated<Book>) -> Envelope<Vec<BookResponse>> {
    Envelope::page(
        result.data.into_iter().map(BookResponse::from).collect(),
        result.meta,
    )
}

pub async fn list_books(
    Extension(svc): Extension<BookService<BookRepositoryImpl>>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<BookResponse>>, RestError> {
    let result = svc
        .fetch_all(
            params.sort_by.unwrap_or_default(),
            PageRequest::new(params.page, params.limit),
        )
        .await
        .map_err(|e| RestError::wrap("Failed to fetch books", e))?;

    Ok(page_envelope(result))
}

pub async fn search_books(
    Extension(svc): Extension<BookService<BookRepositoryImpl>>,
    Query(params): Query<SearchParams>,
) -> Result<Envelope<Vec<BookResponse>>, RestError> {
    let query = BookQuery {
        genre_ids: parse_genre_ids(params.genre_ids.as_deref())?,
        search: params.search,
        creator: params.creator,
        sort: params.sort_by.unwrap_or_default(),
        page: PageRequest::new(params.page, params.limit),
    };

    let result = svc
        .search_books(query)
        .await
        .map_err(|e| RestError::wrap("Failed to search books", e))?;

    Ok(page_envelope(result))
}

pub async fn get_book(
    Extension(svc): Extension<BookService<BookRepositoryImpl>>,
    Path(id): Path<i64>,
) -> Result<Envelope<BookResponse>, RestError> {
    let book = svc
        .fetch_book_by_id(id)
        .await
        .map_err(|e| RestError::wrap("Failed to fetch book", e))?;

    Ok(Envelope::retrieved(book.into()))
}

pub async fn create_book(
    _session: SessionUser,
    Extension(svc): Extension<BookService<BookRepositoryImpl>>,
    Json(req): Json<CreateBookRequest>,
) -> Result<Envelope<BookResponse>, RestError> {
    if req.title.trim().is_empty() {
        return Err(RestError::bad_request("Title is required"));
    }

    let book = svc
        .create_book(req.into())
        .await
        .map_err(|e| RestError::wrap("Failed to create book", e))?;

    Ok(Envelope::created(book.into()))
}

pub async fn update_book(
    _session: SessionUser,
    Extension(svc): Extension<BookService<BookRepositoryImpl>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Envelope<BookResponse>, RestError> {
    let book = svc
        .update_book(id, req.into())
        .await
        .map_err(|e| RestError::wrap("Failed to update book", e))?;

    Ok(Envelope::edited(book.into()))
}

pub async fn delete_book(
    _session: SessionUser,
    Extension(svc): Extension<BookService<BookRepositoryImpl>>,
    Path(id): Path<i64>,
) -> Result<Envelope<()>, RestError> {
    svc.delete_book(id)
        .await
        .map_err(|e| RestError::wrap("Failed to delete book", e))?;

    Ok(Envelope::deleted())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_genre_ids() {
        assert_eq!(parse_genre_ids(None).unwrap(), Vec::<i64>::new());
        assert_eq!(parse_genre_ids(Some("")).unwrap(), Vec::<i64>::new());
        assert_eq!(parse_genre_ids(Some("1,2, 3")).unwrap(), vec![1, 2, 3]);
        assert!(parse_genre_ids(Some("1,x")).is_err());
    }
}
