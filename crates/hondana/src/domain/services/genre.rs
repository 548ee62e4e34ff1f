use thiserror::Error;

use crate::domain::{
    entities::genre::{Genre, GenreChanges, NewGenre},
    repositories::genre::{GenreRepository, GenreRepositoryError},
};

#[derive(Debug, Error)]
pub enum GenreError {
    #[error("genre with id {0} not found")]
    GenreNotFound(i64),
    #[error("repository error: {0}")]
    RepositoryError(#[from] GenreRepositoryError),
}

#[derive(Clone)]
pub struct GenreService<R>
where
    R: GenreRepository,
{
    repo: R,
}

impl<R> GenreService<R>
where
    R: GenreRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_genre(&self, genre: NewGenre) -> Result<Genre, GenreError> {
        debug!("create genre {:?}", genre.name);

        Ok(self.repo.insert_genre(genre).await?)
    }

    pub async fn fetch_all(&self) -> Result<Vec<Genre>, GenreError> {
        Ok(self.repo.get_genres().await?)
    }

    pub async fn fetch_genre_by_id(&self, id: i64) -> Result<Genre, GenreError> {
        self.repo.get_genre_by_id(id).await.map_err(|e| match e {
            GenreRepositoryError::NotFound => GenreError::GenreNotFound(id),
            e => e.into(),
        })
    }

    pub async fn update_genre(&self, id: i64, changes: GenreChanges) -> Result<Genre, GenreError> {
        self.fetch_genre_by_id(id).await?;

        Ok(self.repo.update_genre(id, changes).await?)
    }

    pub async fn delete_genre(&self, id: i64) -> Result<(), GenreError> {
        self.fetch_genre_by_id(id).await?;
        self.repo.delete_genre(id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;

    use super::*;

    struct EmptyGenreRepository;

    #[async_trait]
    impl GenreRepository for EmptyGenreRepository {
        async fn insert_genre(&self, _genre: NewGenre) -> Result<Genre, GenreRepositoryError> {
            unimplemented!()
        }

        async fn get_genres(&self) -> Result<Vec<Genre>, GenreRepositoryError> {
            Ok(vec![])
        }

        async fn get_genre_by_id(&self, _id: i64) -> Result<Genre, GenreRepositoryError> {
            Err(GenreRepositoryError::NotFound)
        }

        async fn update_genre(
            &self,
            _id: i64,
            _changes: GenreChanges,
        ) -> Result<Genre, GenreRepositoryError> {
            unimplemented!()
        }

        async fn delete_genre(&self, _id: i64) -> Result<u64, GenreRepositoryError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_missing_genre_maps_to_not_found() {
        let svc = GenreService::new(EmptyGenreRepository);

        assert!(matches!(
            svc.fetch_genre_by_id(3).await,
            Err(GenreError::GenreNotFound(3))
        ));
        assert!(matches!(
            svc.update_genre(3, GenreChanges::default()).await,
            Err(GenreError::GenreNotFound(3))
        ));
        assert!(matches!(
            svc.delete_genre(3).await,
            Err(GenreError::GenreNotFound(3))
        ));
    }
}
