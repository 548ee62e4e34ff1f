use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{
    domain::{
        entities::genre::{Genre, GenreChanges, NewGenre},
        repositories::genre::{GenreRepository, GenreRepositoryError},
    },
    infrastructure::database::Pool,
};

const GENRE_SELECT: &str = r#"SELECT
    genre.id,
    genre.name,
    genre.description,
    (SELECT JSON_GROUP_ARRAY(JSON_OBJECT('id', book.id, 'title', book.title, 'cover', book.cover))
        FROM book
        JOIN book_genre ON book_genre.book_id = book.id
        WHERE book_genre.genre_id = genre.id) books
    FROM genre"#;

#[derive(Clone)]
pub struct GenreRepositoryImpl {
    pool: Pool,
}

impl GenreRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn row_to_genre(row: &SqliteRow) -> Genre {
    Genre {
        id: row.get(0),
        name: row.get(1),
        description: row.get(2),
        books: serde_json::from_str(row.get::<String, _>(3).as_str()).unwrap_or_default(),
    }
}

#[async_trait]
impl GenreRepository for GenreRepositoryImpl {
    async fn insert_genre(&self, genre: NewGenre) -> Result<Genre, GenreRepositoryError> {
        let genre_id = sqlx::query(r#"INSERT INTO genre(name, description) VALUES (?, ?)"#)
            .bind(&genre.name)
            .bind(&genre.description)
            .execute(&self.pool as &SqlitePool)
            .await?
            .last_insert_rowid();

        self.get_genre_by_id(genre_id).await
    }

    async fn get_genres(&self) -> Result<Vec<Genre>, GenreRepositoryError> {
        let query = format!("{GENRE_SELECT} ORDER BY genre.name ASC");
        let genres = sqlx::query(&query)
            .fetch_all(&self.pool as &SqlitePool)
            .await?
            .iter()
            .map(row_to_genre)
            .collect();

        Ok(genres)
    }

    async fn get_genre_by_id(&self, id: i64) -> Result<Genre, GenreRepositoryError> {
        let query = format!("{GENRE_SELECT} WHERE genre.id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool as &SqlitePool)
            .await?
            .ok_or(GenreRepositoryError::NotFound)?;

        Ok(row_to_genre(&row))
    }

    async fn update_genre(
        &self,
        id: i64,
        changes: GenreChanges,
    ) -> Result<Genre, GenreRepositoryError> {
        let mut column_to_update = vec![];
        let mut values = vec![];
        if let Some(name) = &changes.name {
            column_to_update.push("name = ?");
            values.push(name);
        }
        if let Some(description) = &changes.description {
            column_to_update.push("description = ?");
            values.push(description);
        }

        if !column_to_update.is_empty() {
            let query = format!(
                r#"UPDATE genre SET
                    {}
                    WHERE id = ?"#,
                column_to_update.join(",")
            );

            let mut query = sqlx::query(&query);
            for value in values {
                query = query.bind(value);
            }
            query.bind(id).execute(&self.pool as &SqlitePool).await?;
        }

        self.get_genre_by_id(id).await
    }

    async fn delete_genre(&self, id: i64) -> Result<u64, GenreRepositoryError> {
        let rows_affected = sqlx::query(r#"DELETE FROM genre WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool as &SqlitePool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
