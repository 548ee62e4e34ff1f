use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::filter::order_keyword;
use crate::{
    domain::{
        entities::{
            book::BookDigest,
            chapter::{Chapter, ChapterChanges, NewChapter},
            query::SortDirection,
        },
        repositories::chapter::{ChapterRepository, ChapterRepositoryError},
    },
    infrastructure::database::Pool,
};

const CHAPTER_SELECT: &str = r#"SELECT
    chapter.id,
    chapter.book_id,
    chapter.number,
    chapter.volume,
    chapter.name,
    chapter.thumbnail,
    chapter.pages,
    chapter.content,
    chapter.created_at,
    book.title,
    book.cover
    FROM chapter
    JOIN book ON book.id = chapter.book_id"#;

#[derive(Clone)]
pub struct ChapterRepositoryImpl {
    pool: Pool,
}

impl ChapterRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn row_to_chapter(row: &SqliteRow) -> Chapter {
    Chapter {
        id: row.get(0),
        book_id: row.get(1),
        number: row.get(2),
        volume: row.get(3),
        name: row.get(4),
        thumbnail: row.get(5),
        pages: row
            .get::<Option<String>, _>(6)
            .and_then(|pages| serde_json::from_str(&pages).ok()),
        content: row.get(7),
        created_at: row.get(8),
        book: BookDigest {
            id: row.get(1),
            title: row.get(9),
            cover: row.get(10),
        },
    }
}

fn pages_to_json(pages: Option<&Vec<String>>) -> Result<Option<String>, ChapterRepositoryError> {
    pages
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ChapterRepositoryError::Other(e.into()))
}

#[async_trait]
impl ChapterRepository for ChapterRepositoryImpl {
    async fn insert_chapter(
        &self,
        chapter: NewChapter,
    ) -> Result<Chapter, ChapterRepositoryError> {
        let pages = pages_to_json(chapter.pages.as_ref())?;

        let chapter_id = sqlx::query(
            r#"INSERT INTO chapter(
                book_id,
                number,
                volume,
                name,
                thumbnail,
                pages,
                content
            ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(chapter.book_id)
        .bind(chapter.number)
        .bind(&chapter.volume)
        .bind(&chapter.name)
        .bind(&chapter.thumbnail)
        .bind(&pages)
        .bind(&chapter.content)
        .execute(&self.pool as &SqlitePool)
        .await?
        .last_insert_rowid();

        self.get_chapter_by_id(chapter_id).await
    }

    async fn get_chapter_by_id(&self, id: i64) -> Result<Chapter, ChapterRepositoryError> {
        let query = format!("{CHAPTER_SELECT} WHERE chapter.id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool as &SqlitePool)
            .await?
            .ok_or(ChapterRepositoryError::NotFound)?;

        Ok(row_to_chapter(&row))
    }

    async fn get_chapter_in_book(
        &self,
        id: i64,
        book_id: i64,
    ) -> Result<Chapter, ChapterRepositoryError> {
        let query = format!("{CHAPTER_SELECT} WHERE chapter.id = ? AND chapter.book_id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .bind(book_id)
            .fetch_optional(&self.pool as &SqlitePool)
            .await?
            .ok_or(ChapterRepositoryError::NotFound)?;

        Ok(row_to_chapter(&row))
    }

    async fn find_chapters(
        &self,
        sort: SortDirection,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Chapter>, ChapterRepositoryError> {
        let query = format!(
            "{CHAPTER_SELECT} ORDER BY chapter.created_at {} LIMIT ? OFFSET ?",
            order_keyword(sort)
        );

        let chapters = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool as &SqlitePool)
            .await?
            .iter()
            .map(row_to_chapter)
            .collect();

        Ok(chapters)
    }

    async fn count_chapters(&self) -> Result<i64, ChapterRepositoryError> {
        let row = sqlx::query(r#"SELECT COUNT(1) FROM chapter"#)
            .fetch_one(&self.pool as &SqlitePool)
            .await?;

        Ok(row.get(0))
    }

    async fn find_chapters_by_book(
        &self,
        book_id: i64,
        sort: SortDirection,
    ) -> Result<Vec<Chapter>, ChapterRepositoryError> {
        let query = format!(
            "{CHAPTER_SELECT} WHERE chapter.book_id = ? ORDER BY chapter.number {}",
            order_keyword(sort)
        );

        let chapters = sqlx::query(&query)
            .bind(book_id)
            .fetch_all(&self.pool as &SqlitePool)
            .await?
            .iter()
            .map(row_to_chapter)
            .collect();

        Ok(chapters)
    }

    async fn update_chapter(
        &self,
        id: i64,
        changes: ChapterChanges,
    ) -> Result<Chapter, ChapterRepositoryError> {
        let pages = pages_to_json(changes.pages.as_ref())?;

        let mut column_to_update = vec![];
        if changes.book_id.is_some() {
            column_to_update.push("book_id = ?");
        }
        if changes.number.is_some() {
            column_to_update.push("number = ?");
        }
        if changes.volume.is_some() {
            column_to_update.push("volume = ?");
        }
        if changes.name.is_some() {
            column_to_update.push("name = ?");
        }
        if changes.thumbnail.is_some() {
            column_to_update.push("thumbnail = ?");
        }
        if pages.is_some() {
            column_to_update.push("pages = ?");
        }
        if changes.content.is_some() {
            column_to_update.push("content = ?");
        }

        if !column_to_update.is_empty() {
            let query = format!(
                r#"UPDATE chapter SET
                    {}
                    WHERE id = ?"#,
                column_to_update.join(",")
            );

            let mut query = sqlx::query(&query);
            if let Some(book_id) = changes.book_id {
                query = query.bind(book_id);
            }
            if let Some(number) = changes.number {
                query = query.bind(number);
            }
            if let Some(volume) = &changes.volume {
                query = query.bind(volume);
            }
            if let Some(name) = &changes.name {
                query = query.bind(name);
            }
            if let Some(thumbnail) = &changes.thumbnail {
                query = query.bind(thumbnail);
            }
            if let Some(pages) = &pages {
                query = query.bind(pages);
            }
            if let Some(content) = &changes.content {
                query = query.bind(content);
            }
            query
                .bind(id)
                .execute(&self.pool as &SqlitePool)
                .await?;
        }

        self.get_chapter_by_id(id).await
    }

    async fn delete_chapter(&self, id: i64) -> Result<u64, ChapterRepositoryError> {
        let rows_affected = sqlx::query(r#"DELETE FROM chapter WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool as &SqlitePool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn book_exists(&self, book_id: i64) -> Result<bool, ChapterRepositoryError> {
        let row = sqlx::query(r#"SELECT true FROM book WHERE id = ?"#)
            .bind(book_id)
            .fetch_optional(&self.pool as &SqlitePool)
            .await?;

        Ok(row.is_some())
    }
}

#[cfg(test)]
mod test {
    use super::*;
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

    async fn seed_book(pool: &Pool, title: &str) -> i64 {
        sqlx::query("INSERT INTO book(title) VALUES (?)")
            .bind(title)
            .execute(pool as &SqlitePool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    fn new_chapter(book_id: i64, number: f64) -> NewChapter {
        NewChapter {
            book_id,
            number,
            volume: None,
            name: None,
            thumbnail: None,
            pages: None,
            content: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_round_trip() {
        let pool = memory_pool().await;
        let repo = ChapterRepositoryImpl::new(pool.clone());

        let book_id = seed_book(&pool, "Overlord").await;

        let chapter = repo
            .insert_chapter(NewChapter {
                book_id,
                number: 1.5,
                volume: Some("1".to_string()),
                name: Some("The End and the Beginning".to_string()),
                thumbnail: None,
                pages: Some(vec!["https://img.example.com/1.png".to_string()]),
                content: None,
            })
            .await
            .unwrap();

        assert_eq!(chapter.number, 1.5);
        assert_eq!(chapter.book.title, "Overlord");
        assert_eq!(
            chapter.pages.as_deref(),
            Some(&["https://img.example.com/1.png".to_string()][..])
        );

        let fetched = repo.get_chapter_by_id(chapter.id).await.unwrap();
        assert_eq!(fetched.name.as_deref(), Some("The End and the Beginning"));
    }

    #[tokio::test]
    async fn test_chapter_in_book_requires_matching_book() {
        let pool = memory_pool().await;
        let repo = ChapterRepositoryImpl::new(pool.clone());

        let book_id = seed_book(&pool, "Overlord").await;
        let other_id = seed_book(&pool, "Re:Zero").await;
        let chapter = repo.insert_chapter(new_chapter(book_id, 1.0)).await.unwrap();

        assert!(repo.get_chapter_in_book(chapter.id, book_id).await.is_ok());
        assert!(matches!(
            repo.get_chapter_in_book(chapter.id, other_id).await,
            Err(ChapterRepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_chapters_by_book_are_ordered_by_number() {
        let pool = memory_pool().await;
        let repo = ChapterRepositoryImpl::new(pool.clone());

        let book_id = seed_book(&pool, "Overlord").await;
        repo.insert_chapter(new_chapter(book_id, 2.0)).await.unwrap();
        repo.insert_chapter(new_chapter(book_id, 1.0)).await.unwrap();
        repo.insert_chapter(new_chapter(book_id, 10.0))
            .await
            .unwrap();

        let chapters = repo
            .find_chapters_by_book(book_id, SortDirection::Asc)
            .await
            .unwrap();
        let numbers: Vec<f64> = chapters.iter().map(|chapter| chapter.number).collect();
        assert_eq!(numbers, vec![1.0, 2.0, 10.0]);

        let chapters = repo
            .find_chapters_by_book(book_id, SortDirection::Desc)
            .await
            .unwrap();
        let numbers: Vec<f64> = chapters.iter().map(|chapter| chapter.number).collect();
        assert_eq!(numbers, vec![10.0, 2.0, 1.0]);
    }

    #[tokio::test]
    async fn test_update_keeps_untouched_columns() {
        let pool = memory_pool().await;
        let repo = ChapterRepositoryImpl::new(pool.clone());

        let book_id = seed_book(&pool, "Overlord").await;
        let chapter = repo
            .insert_chapter(NewChapter {
                name: Some("draft".to_string()),
                ..new_chapter(book_id, 3.0)
            })
            .await
            .unwrap();

        let updated = repo
            .update_chapter(
                chapter.id,
                ChapterChanges {
                    name: Some("final".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("final"));
        assert_eq!(updated.number, 3.0);
        assert_eq!(updated.book_id, book_id);
    }

    #[tokio::test]
    async fn test_book_exists() {
        let pool = memory_pool().await;
        let repo = ChapterRepositoryImpl::new(pool.clone());

        let book_id = seed_book(&pool, "Overlord").await;

        assert!(repo.book_exists(book_id).await.unwrap());
        assert!(!repo.book_exists(book_id + 1).await.unwrap());
    }
}
