use crate::domain::entities::book::BookDigest;

#[derive(Debug, Clone)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub books: Vec<BookDigest>,
}

#[derive(Debug, Clone)]
pub struct NewGenre {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GenreChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}
