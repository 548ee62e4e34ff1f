use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::filter::{Bind, order_keyword, write_predicate};
use crate::{
    domain::{
        entities::{
            book::{Book, BookChanges, GenreRef, NewBook},
            query::{BookPredicate, SortDirection},
        },
        repositories::book::{BookRepository, BookRepositoryError},
    },
    infrastructure::database::Pool,
};

const BOOK_SELECT: &str = r#"SELECT
    book.id,
    book.title,
    book.alt_title,
    book.cover,
    book.author,
    book.artist,
    book.synopsis,
    book.status,
    book.book_type,
    book.created_at,
    (SELECT JSON_GROUP_ARRAY(JSON_OBJECT('id', genre.id, 'name', genre.name))
        FROM genre
        JOIN book_genre ON book_genre.genre_id = genre.id
        WHERE book_genre.book_id = book.id) genres,
    (SELECT JSON_GROUP_ARRAY(JSON_OBJECT(
            'id', chapter.id,
            'number', chapter.number,
            'volume', chapter.volume,
            'name', chapter.name,
            'book_id', chapter.book_id,
            'thumbnail', chapter.thumbnail,
            'created_at', STRFTIME('%Y-%m-%dT%H:%M:%f', chapter.created_at)))
        FROM chapter
        WHERE chapter.book_id = book.id) chapters
    FROM book"#;

#[derive(Clone)]
pub struct BookRepositoryImpl {
    pool: Pool,
}

impl BookRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn row_to_book(row: &SqliteRow) -> Book {
    Book {
        id: row.get(0),
        title: row.get(1),
        alt_title: row.get(2),
        cover: row.get(3),
        author: row.get(4),
        artist: row.get(5),
        synopsis: row.get(6),
        status: row.get(7),
        kind: row.get(8),
        created_at: row.get(9),
        genres: serde_json::from_str(row.get::<String, _>(10).as_str()).unwrap_or_default(),
        chapters: serde_json::from_str(row.get::<String, _>(11).as_str()).unwrap_or_default(),
    }
}

#[async_trait]
impl BookRepository for BookRepositoryImpl {
    async fn insert_book(&self, book: NewBook) -> Result<Book, BookRepositoryError> {
        let mut tx = self.pool.begin().await?;

        let book_id = sqlx::query(
            r#"INSERT INTO book(
                title,
                alt_title,
                cover,
                author,
                artist,
                synopsis,
                status,
                book_type
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&book.title)
        .bind(&book.alt_title)
        .bind(&book.cover)
        .bind(&book.author)
        .bind(&book.artist)
        .bind(&book.synopsis)
        .bind(&book.status)
        .bind(&book.kind)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for genre_id in &book.genre_ids {
            sqlx::query(r#"INSERT INTO book_genre(book_id, genre_id) VALUES (?, ?)"#)
                .bind(book_id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_book_by_id(book_id).await
    }

    async fn get_book_by_id(&self, id: i64) -> Result<Book, BookRepositoryError> {
        let query = format!("{BOOK_SELECT} WHERE book.id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool as &SqlitePool)
            .await?
            .ok_or(BookRepositoryError::NotFound)?;

        Ok(row_to_book(&row))
    }

    async fn find_books(
        &self,
        filter: Option<&BookPredicate>,
        sort: SortDirection,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let mut sql = BOOK_SELECT.to_string();
        let mut binds = vec![];
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            write_predicate(filter, &mut sql, &mut binds);
        }
        sql.push_str(" ORDER BY book.created_at ");
        sql.push_str(order_keyword(sort));
        sql.push_str(" LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = match bind {
                Bind::Int(value) => query.bind(value),
                Bind::Text(value) => query.bind(value),
            };
        }

        let books = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool as &SqlitePool)
            .await?
            .iter()
            .map(row_to_book)
            .collect();

        Ok(books)
    }

    async fn count_books(
        &self,
        filter: Option<&BookPredicate>,
    ) -> Result<i64, BookRepositoryError> {
        let mut sql = "SELECT COUNT(1) FROM book".to_string();
        let mut binds = vec![];
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            write_predicate(filter, &mut sql, &mut binds);
        }

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = match bind {
                Bind::Int(value) => query.bind(value),
                Bind::Text(value) => query.bind(value),
            };
        }

        let row = query.fetch_one(&self.pool as &SqlitePool).await?;

        Ok(row.get(0))
    }

    async fn update_book(
        &self,
        id: i64,
        changes: BookChanges,
    ) -> Result<Book, BookRepositoryError> {
        let mut column_to_update = vec![];
        let mut values = vec![];
        let columns = [
            ("title = ?", &changes.title),
            ("alt_title = ?", &changes.alt_title),
            ("cover = ?", &changes.cover),
            ("author = ?", &changes.author),
            ("artist = ?", &changes.artist),
            ("synopsis = ?", &changes.synopsis),
            ("status = ?", &changes.status),
            ("book_type = ?", &changes.kind),
        ];
        for (clause, value) in columns {
            if let Some(value) = value {
                column_to_update.push(clause);
                values.push(value);
            }
        }

        let mut tx = self.pool.begin().await?;

        if !column_to_update.is_empty() {
            let query = format!(
                r#"UPDATE book SET
                    {}
                    WHERE id = ?"#,
                column_to_update.join(",")
            );

            let mut query = sqlx::query(&query);
            for value in values {
                query = query.bind(value);
            }
            query.bind(id).execute(&mut *tx).await?;
        }

        if let Some(genre_ids) = &changes.genre_ids {
            sqlx::query(r#"DELETE FROM book_genre WHERE book_id = ?"#)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for genre_id in genre_ids {
                sqlx::query(r#"INSERT INTO book_genre(book_id, genre_id) VALUES (?, ?)"#)
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        self.get_book_by_id(id).await
    }

    async fn delete_book(&self, id: i64) -> Result<u64, BookRepositoryError> {
        let rows_affected = sqlx::query(r#"DELETE FROM book WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool as &SqlitePool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn get_genres_by_ids(&self, ids: &[i64]) -> Result<Vec<GenreRef>, BookRepositoryError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let query_str = format!(
            r#"SELECT id, name FROM genre WHERE id IN ({})"#,
            vec!["?"; ids.len()].join(",")
        );
        let mut query = sqlx::query(&query_str);
        for id in ids {
            query = query.bind(id);
        }

        let genres = query
            .fetch_all(&self.pool as &SqlitePool)
            .await?
            .iter()
            .map(|row| GenreRef {
                id: row.get(0),
                name: row.get(1),
            })
            .collect();

        Ok(genres)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::entities::query::BookQuery;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> Pool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        Pool::from(pool)
    }

    async fn seed_genre(pool: &Pool, name: &str) -> i64 {
        sqlx::query("INSERT INTO genre(name) VALUES (?)")
            .bind(name)
            .execute(pool as &SqlitePool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    fn new_book(title: &str, author: Option<&str>, genre_ids: Vec<i64>) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.map(str::to_string),
            genre_ids,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_round_trip() {
        let pool = memory_pool().await;
        let repo = BookRepositoryImpl::new(pool.clone());

        let action = seed_genre(&pool, "action").await;
        let isekai = seed_genre(&pool, "isekai").await;

        let inserted = repo
            .insert_book(NewBook {
                title: "Solo Leveling".to_string(),
                alt_title: Some("Na Honjaman Lebel-eob".to_string()),
                author: Some("Chugong".to_string()),
                genre_ids: vec![action, isekai],
                ..Default::default()
            })
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO chapter(book_id, number, name, pages) VALUES (?, ?, ?, ?)",
        )
        .bind(inserted.id)
        .bind(1.0)
        .bind("Prologue")
        .bind(r#"["https://img.example.com/1.png"]"#)
        .execute(&pool as &SqlitePool)
        .await
        .unwrap();

        let book = repo.get_book_by_id(inserted.id).await.unwrap();
        assert_eq!(book.title, "Solo Leveling");
        assert_eq!(book.alt_title.as_deref(), Some("Na Honjaman Lebel-eob"));
        let mut genre_ids: Vec<i64> = book.genres.iter().map(|genre| genre.id).collect();
        genre_ids.sort_unstable();
        assert_eq!(genre_ids, vec![action, isekai]);
        assert_eq!(book.chapters.len(), 1);
        assert_eq!(book.chapters[0].number, 1.0);
        assert_eq!(book.chapters[0].name.as_deref(), Some("Prologue"));
        assert_eq!(book.chapters[0].book_id, inserted.id);
    }

    #[tokio::test]
    async fn test_missing_book_is_not_found() {
        let pool = memory_pool().await;
        let repo = BookRepositoryImpl::new(pool);

        assert!(matches!(
            repo.get_book_by_id(404).await,
            Err(BookRepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_existential_genre_filter_and_count() {
        let pool = memory_pool().await;
        let repo = BookRepositoryImpl::new(pool.clone());

        let action = seed_genre(&pool, "action").await;
        let isekai = seed_genre(&pool, "isekai").await;

        let both = repo
            .insert_book(new_book("Both", None, vec![action, isekai]))
            .await
            .unwrap();
        let one = repo
            .insert_book(new_book("One", None, vec![action]))
            .await
            .unwrap();
        repo.insert_book(new_book("None", None, vec![]))
            .await
            .unwrap();

        let query = BookQuery {
            genre_ids: vec![action, isekai],
            ..Default::default()
        };
        let filter = query.filter().unwrap();

        let found = repo
            .find_books(Some(&filter), SortDirection::Desc, 0, 10)
            .await
            .unwrap();
        let mut found_ids: Vec<i64> = found.iter().map(|book| book.id).collect();
        found_ids.sort_unstable();
        assert_eq!(found_ids, vec![both.id, one.id]);

        assert_eq!(repo.count_books(Some(&filter)).await.unwrap(), 2);
        assert_eq!(repo.count_books(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_text_filter_matches_any_of_the_four_columns() {
        let pool = memory_pool().await;
        let repo = BookRepositoryImpl::new(pool);

        let titled = repo
            .insert_book(new_book("NARUTO", None, vec![]))
            .await
            .unwrap();
        let authored = repo
            .insert_book(new_book("Bleach", Some("Kishimoto"), vec![]))
            .await
            .unwrap();
        repo.insert_book(new_book("One Piece", Some("Oda"), vec![]))
            .await
            .unwrap();

        let query = BookQuery {
            search: Some("naruto".to_string()),
            creator: Some("kishimoto".to_string()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();

        let found = repo
            .find_books(Some(&filter), SortDirection::Desc, 0, 10)
            .await
            .unwrap();
        let mut found_ids: Vec<i64> = found.iter().map(|book| book.id).collect();
        found_ids.sort_unstable();
        assert_eq!(found_ids, vec![titled.id, authored.id]);
    }

    #[tokio::test]
    async fn test_update_replaces_genre_set() {
        let pool = memory_pool().await;
        let repo = BookRepositoryImpl::new(pool.clone());

        let action = seed_genre(&pool, "action").await;
        let romance = seed_genre(&pool, "romance").await;

        let book = repo
            .insert_book(new_book("86", Some("Asato Asato"), vec![action]))
            .await
            .unwrap();

        let updated = repo
            .update_book(
                book.id,
                BookChanges {
                    title: Some("86: Eighty-Six".to_string()),
                    genre_ids: Some(vec![romance]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "86: Eighty-Six");
        assert_eq!(updated.author.as_deref(), Some("Asato Asato"));
        let genre_ids: Vec<i64> = updated.genres.iter().map(|genre| genre.id).collect();
        assert_eq!(genre_ids, vec![romance]);
    }

    #[tokio::test]
    async fn test_get_genres_by_ids_skips_unknown() {
        let pool = memory_pool().await;
        let repo = BookRepositoryImpl::new(pool.clone());

        let action = seed_genre(&pool, "action").await;

        let genres = repo.get_genres_by_ids(&[action, 999]).await.unwrap();
        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].name, "action");

        assert!(repo.get_genres_by_ids(&[]).await.unwrap().is_empty());
    }
}
