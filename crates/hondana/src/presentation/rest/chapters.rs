use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        entities::{
            chapter::{Chapter, ChapterChanges, NewChapter},
            query::PageRequest,
        },
        services::chapter::ChapterService,
    },
    infrastructure::domain::repositories::chapter::ChapterRepositoryImpl,
    presentation::token::SessionUser,
};

use super::{ListParams, books::BookDigestResponse, error::RestError, response::Envelope};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResponse {
    pub id: i64,
    pub book_id: i64,
    pub number: f64,
    pub volume: Option<String>,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub pages: Option<Vec<String>>,
    pub content: Option<String>,
    pub created_at: NaiveDateTime,
    pub book: BookDigestResponse,
}

impl From<Chapter> for ChapterResponse {
    fn from(chapter: Chapter) -> Self {
        Self {
            id: chapter.id,
            book_id: chapter.book_id,
            number: chapter.number,
            volume: chapter.volume,
            name: chapter.name,
            thumbnail: chapter.thumbnail,
            pages: chapter.pages,
            content: chapter.content,
            created_at: chapter.created_at,
            book: chapter.book.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChapterRequest {
    pub book_id: i64,
    pub number: f64,
    pub volume: Option<String>,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub pages: Option<Vec<String>>,
    pub content: Option<String>,
}

impl From<CreateChapterRequest> for NewChapter {
    fn from(req: CreateChapterRequest) -> Self {
        Self {
            book_id: req.book_id,
            number: req.number,
            volume: req.volume,
            name: req.name,
            thumbnail: req.thumbnail,
            pages: req.pages,
            content: req.content,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChapterRequest {
    pub book_id: Option<i64>,
    pub number: Option<f64>,
    pub volume: Option<String>,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub pages: Option<Vec<String>>,
    pub content: Option<String>,
}

impl From<UpdateChapterRequest> for ChapterChanges {
    fn from(req: UpdateChapterRequest) -> Self {
        Self {
            book_id: req.book_id,
            number: req.number,
            volume: req.volume,
            name: req.name,
            thumbnail: req.thumbnail,
            pages: req.pages,
            content: req.content,
        }
    }
}

pub async fn list_chapters(
    Extension(svc): Extension<ChapterService<ChapterRepositoryImpl>>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<ChapterResponse>>, RestError> {
    let result = svc
        .fetch_all(
            params.sort_by.unwrap_or_default(),
            PageRequest::new(params.page, params.limit),
        )
        .await
        .map_err(|e| RestError::wrap("Failed to fetch chapters", e))?;

    Ok(Envelope::page(
        result.data.into_iter().map(ChapterResponse::from).collect(),
        result.meta,
    ))
}

pub async fn get_chapter(
    Extension(svc): Extension<ChapterService<ChapterRepositoryImpl>>,
    Path(id): Path<i64>,
) -> Result<Envelope<ChapterResponse>, RestError> {
    let chapter = svc
        .fetch_chapter_by_id(id)
        .await
        .map_err(|e| RestError::wrap("Failed to fetch chapter", e))?;

    Ok(Envelope::retrieved(chapter.into()))
}

pub async fn get_book_chapter(
    Extension(svc): Extension<ChapterService<ChapterRepositoryImpl>>,
    Path((book_id, id)): Path<(i64, i64)>,
) -> Result<Envelope<ChapterResponse>, RestError> {
    let chapter = svc
        .fetch_chapter_in_book(id, book_id)
        .await
        .map_err(|e| RestError::wrap("Failed to fetch chapter", e))?;

    Ok(Envelope::retrieved(chapter.into()))
}

pub async fn list_book_chapters(
    Extension(svc): Extension<ChapterService<ChapterRepositoryImpl>>,
    Path(book_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<ChapterResponse>>, RestError> {
    let chapters = svc
        .fetch_chapters_by_book(book_id, params.sort_by.unwrap_or_default())
        .await
        .map_err(|e| RestError::wrap("Failed to fetch chapters", e))?;

    Ok(Envelope::retrieved(
        chapters.into_iter().map(ChapterResponse::from).collect(),
    ))
}

pub async fn create_chapter(
    _session: SessionUser,
    Extension(svc): Extension<ChapterService<ChapterRepositoryImpl>>,
    Json(req): Json<CreateChapterRequest>,
) -> Result<Envelope<ChapterResponse>, RestError> {
    let chapter = svc
        .create_chapter(req.into())
        .await
        .map_err(|e| RestError::wrap("Failed to create chapter", e))?;

    Ok(Envelope::created(chapter.into()))
}

pub async fn update_chapter(
    _session: SessionUser,
    Extension(svc): Extension<ChapterService<ChapterRepositoryImpl>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateChapterRequest>,
) -> Result<Envelope<ChapterResponse>, RestError> {
    let chapter = svc
        .update_chapter(id, req.into())
        .await
        .map_err(|e| RestError::wrap("Failed to update chapter", e))?;

    Ok(Envelope::edited(chapter.into()))
}

pub async fn delete_chapter(
    _session: SessionUser,
    Extension(svc): Extension<ChapterService<ChapterRepositoryImpl>>,
    Path(id): Path<i64>,
) -> Result<Envelope<()>, RestError> {
    svc.delete_chapter(id)
        .await
        .map_err(|e| RestError::wrap("Failed to delete chapter", e))?;

    Ok(Envelope::deleted())
}
