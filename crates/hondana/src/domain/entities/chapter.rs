use chrono::NaiveDateTime;

use crate::domain::entities::book::BookDigest;

#[derive(Debug, Clone)]
pub struct Chapter {
    pub id: i64,
    pub book_id: i64,
    pub number: f64,
    pub volume: Option<String>,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    /// Image URLs for manga chapters.
    pub pages: Option<Vec<String>>,
    /// Body text for light novel chapters.
    pub content: Option<String>,
    pub created_at: NaiveDateTime,
    pub book: BookDigest,
}

#[derive(Debug, Clone)]
pub struct NewChapter {
    pub book_id: i64,
    pub number: f64,
    pub volume: Option<String>,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub pages: Option<Vec<String>>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChapterChanges {
    pub book_id: Option<i64>,
    pub number: Option<f64>,
    pub volume: Option<String>,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub pages: Option<Vec<String>>,
    pub content: Option<String>,
}
