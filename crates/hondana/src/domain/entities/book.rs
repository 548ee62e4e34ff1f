use chrono::NaiveDateTime;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub alt_title: Option<String>,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub created_at: NaiveDateTime,
    pub genres: Vec<GenreRef>,
    pub chapters: Vec<ChapterDigest>,
}

/// Genre as embedded in a book payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenreRef {
    pub id: i64,
    pub name: String,
}

/// Chapter fields embedded in a book payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterDigest {
    pub id: i64,
    pub number: f64,
    pub volume: Option<String>,
    pub name: Option<String>,
    pub book_id: i64,
    pub thumbnail: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Book fields embedded in genre and chapter payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct BookDigest {
    pub id: i64,
    pub title: String,
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub title: String,
    pub alt_title: Option<String>,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub genre_ids: Vec<i64>,
}

/// Partial update. `None` leaves the column untouched; a present
/// `genre_ids` replaces the whole genre set.
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub alt_title: Option<String>,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub genre_ids: Option<Vec<i64>>,
}
