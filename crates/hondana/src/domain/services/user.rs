use rand::RngCore;
use thiserror::Error;

use crate::domain::{
    entities::user::{NewUser, User, UserChanges},
    repositories::user::{UserRepository, UserRepositoryError},
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound,
    #[error("incorrect password")]
    WrongPassword,
    #[error("email already in use")]
    EmailTaken,
    #[error("insufficient password length")]
    InsufficientPasswordLength,
    #[error("repository error: {0}")]
    RepositoryError(#[from] UserRepositoryError),
    #[error("other: {0}")]
    Other(String),
}

#[derive(Clone)]
pub struct UserService<R>
where
    R: UserRepository,
{
    repo: R,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        if password.len() < 8 {
            return Err(UserError::InsufficientPasswordLength);
        }

        if self.repo.get_user_by_email(email).await?.is_some() {
            return Err(UserError::EmailTaken);
        }

        let user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: hash_password(password)?,
        };

        Ok(self.repo.insert_user(user).await?)
    }

    /// Check the given credentials and return the matching account.
    pub async fn verify_user(&self, email: &str, password: &str) -> Result<User, UserError> {
        let user = self
            .repo
            .get_user_by_email(email)
            .await?
            .ok_or(UserError::UserNotFound)?;

        if !argon2::verify_encoded(&user.password, password.as_bytes())
            .map_err(|e| UserError::Other(format!("{e}")))?
        {
            return Err(UserError::WrongPassword);
        }

        Ok(user)
    }

    pub async fn fetch_user_by_id(&self, id: i64) -> Result<User, UserError> {
        self.repo.get_user_by_id(id).await.map_err(|e| match e {
            UserRepositoryError::NotFound => UserError::UserNotFound,
            e => e.into(),
        })
    }

    pub async fn update_profile(
        &self,
        id: i64,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<User, UserError> {
        let user = self.fetch_user_by_id(id).await?;

        if let Some(email) = &email {
            if let Some(existing) = self.repo.get_user_by_email(email).await? {
                if existing.id != user.id {
                    return Err(UserError::EmailTaken);
                }
            }
        }

        let password = match password.as_deref() {
            Some(password) if password.len() < 8 => {
                return Err(UserError::InsufficientPasswordLength);
            }
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        Ok(self
            .repo
            .update_user(
                id,
                UserChanges {
                    name,
                    email,
                    password,
                },
            )
            .await?)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        self.fetch_user_by_id(id).await?;
        self.repo.delete_user(id).await?;

        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, UserError> {
    let mut salt: [u8; 32] = [0; 32];
    rand::rng().fill_bytes(&mut salt);

    let config = argon2::Config::default();
    argon2::hash_encoded(password.as_bytes(), &salt, &config)
        .map_err(|e| UserError::Other(format!("{e}")))
}
