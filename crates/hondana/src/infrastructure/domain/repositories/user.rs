use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{
    domain::{
        entities::user::{NewUser, User, UserChanges},
        repositories::user::{UserRepository, UserRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct UserRepositoryImpl {
    pool: Pool,
}

impl UserRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn row_to_user(row: &SqliteRow) -> User {
    User {
        id: row.get(0),
        name: row.get(1),
        email: row.get(2),
        password: row.get(3),
        created_at: row.get(4),
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn insert_user(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let user_id = sqlx::query(
            r#"INSERT INTO user(
                name,
                email,
                password
            ) VALUES (?, ?, ?)"#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .execute(&self.pool as &SqlitePool)
        .await?
        .last_insert_rowid();

        self.get_user_by_id(user_id).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, UserRepositoryError> {
        let row = sqlx::query(r#"SELECT id, name, email, password, created_at FROM user WHERE id = ?"#)
            .bind(id)
            .fetch_optional(&self.pool as &SqlitePool)
            .await?
            .ok_or(UserRepositoryError::NotFound)?;

        Ok(row_to_user(&row))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let row =
            sqlx::query(r#"SELECT id, name, email, password, created_at FROM user WHERE email = ?"#)
                .bind(email)
                .fetch_optional(&self.pool as &SqlitePool)
                .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn update_user(
        &self,
        id: i64,
        changes: UserChanges,
    ) -> Result<User, UserRepositoryError> {
        let mut column_to_update = vec![];
        let mut values = vec![];
        if let Some(name) = &changes.name {
            column_to_update.push("name = ?");
            values.push(name);
        }
        if let Some(email) = &changes.email {
            column_to_update.push("email = ?");
            values.push(email);
        }
        if let Some(password) = &changes.password {
            column_to_update.push("password = ?");
            values.push(password);
        }

        if !column_to_update.is_empty() {
            let query = format!(
                r#"UPDATE user SET
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

        self.get_user_by_id(id).await
    }

    async fn delete_user(&self, id: i64) -> Result<u64, UserRepositoryError> {
        let rows_affected = sqlx::query(r#"DELETE FROM user WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool as &SqlitePool)
            .await?
            .rows_affected();

        Ok(rows_affected)
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

    #[tokio::test]
    async fn test_insert_and_lookup_by_email() {
        let pool = memory_pool().await;
        let repo = UserRepositoryImpl::new(pool);

        let user = repo
            .insert_user(NewUser {
                name: "asuka".to_string(),
                email: "asuka@example.com".to_string(),
                password: "$argon2i$...".to_string(),
            })
            .await
            .unwrap();

        let found = repo
            .get_user_by_email("asuka@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);

        assert!(repo
            .get_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = memory_pool().await;
        let repo = UserRepositoryImpl::new(pool);

        let user = repo
            .insert_user(NewUser {
                name: "asuka".to_string(),
                email: "asuka@example.com".to_string(),
                password: "$argon2i$...".to_string(),
            })
            .await
            .unwrap();

        let updated = repo
            .update_user(
                user.id,
                UserChanges {
                    name: Some("langley".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "langley");
        assert_eq!(updated.email, "asuka@example.com");

        assert_eq!(repo.delete_user(user.id).await.unwrap(), 1);
        assert!(matches!(
            repo.get_user_by_id(user.id).await,
            Err(UserRepositoryError::NotFound)
        ));
    }
}
