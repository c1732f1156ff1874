use sea_orm::DatabaseConnection;

use crate::movie::domain::{Movie, MovieFields};
use crate::movie::errors::MovieError;
use crate::movie::repository::MovieRepository;

/// SeaORM-backed repository implementation.
/// Uniqueness is enforced by the `uniq_movie_title_director_year` index.
pub struct SeaOrmMovieRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl MovieRepository for SeaOrmMovieRepository {
    async fn count(&self) -> Result<u64, MovieError> {
        Ok(models::movie::count(&self.db).await?)
    }

    async fn find_all(&self) -> Result<Vec<Movie>, MovieError> {
        let rows = models::movie::find_all(&self.db).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, MovieError> {
        Ok(models::movie::find_by_id(&self.db, id).await?.map(Movie::from))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, MovieError> {
        Ok(models::movie::exists_by_id(&self.db, id).await?)
    }

    async fn exists_by_title_director_year(&self, fields: &MovieFields, excluding: Option<i64>) -> Result<bool, MovieError> {
        Ok(models::movie::exists_by_title_director_year(&self.db, &fields.title, &fields.director, fields.year, excluding).await?)
    }

    async fn insert(&self, fields: &MovieFields) -> Result<Movie, MovieError> {
        let created = models::movie::insert(&self.db, &fields.title, &fields.director, fields.year).await?;
        Ok(Movie::from(created))
    }

    async fn replace(&self, id: i64, fields: &MovieFields) -> Result<Option<Movie>, MovieError> {
        let updated = models::movie::replace(&self.db, id, &fields.title, &fields.director, fields.year).await?;
        Ok(updated.map(Movie::from))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, MovieError> {
        Ok(models::movie::delete_by_id(&self.db, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::{MovieInput, MovieService};
    use crate::test_support::get_db;
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn movie_crud_through_seaorm() -> Result<(), MovieError> {
        let Some(db) = get_db().await else { return Ok(()); };
        let svc = MovieService::new(Arc::new(SeaOrmMovieRepository { db }));

        let title = format!("svc_movie_{}", Uuid::new_v4());
        let added = svc.add(MovieInput::new(title.as_str(), "Christopher Nolan", 2010)).await?;
        let view = svc.get_by_id(added.id).await?;
        assert_eq!(view.title, title);

        assert!(matches!(svc.add(MovieInput::new(title.as_str(), "Christopher Nolan", 2010)).await, Err(MovieError::Conflict)));

        let updated = svc.update(added.id, MovieInput::new(title.as_str(), "C. Nolan", 2010)).await?;
        assert_eq!(updated.director, "C. Nolan");
        // unchanged triple is not a conflict with itself
        svc.update(added.id, MovieInput::new(title.as_str(), "C. Nolan", 2010)).await?;

        svc.delete(added.id).await?;
        assert!(matches!(svc.get_by_id(added.id).await, Err(MovieError::NotFound(id)) if id == added.id));
        Ok(())
    }

    #[tokio::test]
    async fn store_constraint_reports_conflict() -> Result<(), MovieError> {
        let Some(db) = get_db().await else { return Ok(()); };
        let repo = SeaOrmMovieRepository { db };

        let fields = MovieFields { title: format!("race_{}", Uuid::new_v4()), director: "Sofia Coppola".into(), year: 2003 };
        let first = repo.insert(&fields).await?;
        // bypasses the service fast path, as a lost race would
        assert!(matches!(repo.insert(&fields).await, Err(MovieError::Conflict)));
        assert!(repo.delete_by_id(first.id).await?);
        Ok(())
    }
}
