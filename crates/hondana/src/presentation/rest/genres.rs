use axum::{Extension, Json, extract::Path};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        entities::genre::{Genre, GenreChanges, NewGenre},
        services::genre::GenreService,
    },
    infrastructure::domain::repositories::genre::GenreRepositoryImpl,
    presentation::token::SessionUser,
};

use super::{books::BookDigestResponse, error::RestError, response::Envelope};

#[derive(Debug, Serialize)]
pub struct GenreResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub books: Vec<BookDigestResponse>,
}

impl From<Genre> for GenreResponse {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
            description: genre.description,
            books: genre.books.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGenreRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list_genres(
    Extension(svc): Extension<GenreService<GenreRepositoryImpl>>,
) -> Result<Envelope<Vec<GenreResponse>>, RestError> {
    let genres = svc
        .fetch_all()
        .await
        .map_err(|e| RestError::wrap("Failed to fetch genres", e))?;

    Ok(Envelope::retrieved(
        genres.into_iter().map(GenreResponse::from).collect(),
    ))
}

pub async fn get_genre(
    Extension(svc): Extension<GenreService<GenreRepositoryImpl>>,
    Path(id): Path<i64>,
) -> Result<Envelope<GenreResponse>, RestError> {
    let genre = svc
        .fetch_genre_by_id(id)
        .await
        .map_err(|e| RestError::wrap("Failed to fetch genre", e))?;

    Ok(Envelope::retrieved(genre.into()))
}

pub async fn create_genre(
    _session: SessionUser,
    Extension(svc): Extension<GenreService<GenreRepositoryImpl>>,
    Json(req): Json<CreateGenreRequest>,
) -> Result<Envelope<GenreResponse>, RestError> {
    if req.name.trim().is_empty() {
        return Err(RestError::bad_request("Name is required"));
    }

    let genre = svc
        .create_genre(NewGenre {
            name: req.name,
            description: req.description,
        })
        .await
        .map_err(|e| RestError::wrap("Failed to create genre", e))?;

    Ok(Envelope::created(genre.into()))
}

pub async fn update_genre(
    _session: SessionUser,
    Extension(svc): Extension<GenreService<GenreRepositoryImpl>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateGenreRequest>,
) -> Result<Envelope<GenreResponse>, RestError> {
    let genre = svc
        .update_genre(
            id,
            GenreChanges {
                name: req.name,
                description: req.description,
            },
        )
        .await
        .map_err(|e| RestError::wrap("Failed to update genre", e))?;

    Ok(Envelope::edited(genre.into()))
}

pub async fn delete_genre(
    _session: SessionUser,
    Extension(svc): Extension<GenreService<GenreRepositoryImpl>>,
    Path(id): Path<i64>,
) -> Result<Envelope<()>, RestError> {
    svc.delete_genre(id)
        .await
        .map_err(|e| RestError::wrap("Failed to delete genre", e))?;

    Ok(Envelope::deleted())
}
