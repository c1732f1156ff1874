use std::sync::Arc;

use tracing::{info, warn, instrument};

use super::domain::{Movie, MovieFields, MovieInput, MovieView};
use super::errors::MovieError;
use super::repository::MovieRepository;

/// Movie business service independent of web framework.
///
/// Stateless between calls; all state lives in the repository.
pub struct MovieService<R: MovieRepository + ?Sized = dyn MovieRepository> {
    repo: Arc<R>,
}

impl<R: MovieRepository + ?Sized> MovieService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn count(&self) -> Result<u64, MovieError> {
        self.repo.count().await
    }

    /// Every stored movie in store order.
    pub async fn list_all(&self) -> Result<Vec<MovieView>, MovieError> {
        let movies = self.repo.find_all().await?;
        Ok(movies.into_iter().map(MovieView::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<MovieView, MovieError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(MovieView::from)
            .ok_or(MovieError::NotFound(id))
    }

    /// Validate, reject duplicates, then persist with a store-assigned id.
    ///
    /// # Examples
    /// ```
    /// use service::movie::{MovieService, MovieInput, MovieError, repository::memory::InMemoryMovieRepository};
    /// use std::sync::Arc;
    /// let svc = MovieService::new(Arc::new(InMemoryMovieRepository::default()));
    /// let movie = tokio_test::block_on(svc.add(MovieInput::new("Inception", "Christopher Nolan", 2010))).unwrap();
    /// assert_eq!(movie.title, "Inception");
    /// let again = tokio_test::block_on(svc.add(MovieInput::new("Inception", "Christopher Nolan", 2010)));
    /// assert!(matches!(again, Err(MovieError::Conflict)));
    /// ```
    #[instrument(skip(self, candidate))]
    pub async fn add(&self, candidate: MovieInput) -> Result<Movie, MovieError> {
        let fields = candidate.validate()?;
        if self.repo.exists_by_title_director_year(&fields, None).await? {
            log_conflict(&fields);
            return Err(MovieError::Conflict);
        }
        let movie = self.repo.insert(&fields).await.inspect_err(|e| {
            if matches!(e, MovieError::Conflict) { log_conflict(&fields); }
        })?;
        info!(event = "movie_added", id = movie.id, title = %movie.title, "movie added");
        Ok(movie)
    }

    /// Replace title, director and year of `id` together.
    ///
    /// The record being updated is left out of the duplicate scan, so
    /// re-submitting its current values succeeds.
    ///
    /// # Examples
    /// ```
    /// use service::movie::{MovieService, MovieInput, MovieError, repository::memory::InMemoryMovieRepository};
    /// use std::sync::Arc;
    /// let svc = MovieService::new(Arc::new(InMemoryMovieRepository::default()));
    /// let movie = tokio_test::block_on(svc.add(MovieInput::new("Inception", "Christopher Nolan", 2010))).unwrap();
    /// let updated = tokio_test::block_on(svc.update(movie.id, MovieInput::new("Inception", "C. Nolan", 2010))).unwrap();
    /// assert_eq!(updated.director, "C. Nolan");
    /// let missing = tokio_test::block_on(svc.update(999, MovieInput::new("Inception", "C. Nolan", 2010)));
    /// assert!(matches!(missing, Err(MovieError::NotFound(999))));
    /// ```
    #[instrument(skip(self, candidate))]
    pub async fn update(&self, id: i64, candidate: MovieInput) -> Result<Movie, MovieError> {
        if !self.repo.exists_by_id(id).await? {
            return Err(MovieError::NotFound(id));
        }
        let fields = candidate.validate()?;
        if self.repo.exists_by_title_director_year(&fields, Some(id)).await? {
            log_conflict(&fields);
            return Err(MovieError::Conflict);
        }
        let movie = self
            .repo
            .replace(id, &fields)
            .await
            .inspect_err(|e| {
                if matches!(e, MovieError::Conflict) { log_conflict(&fields); }
            })?
            // deleted between the existence check and the write
            .ok_or(MovieError::NotFound(id))?;
        info!(event = "movie_updated", id = movie.id, "movie updated");
        Ok(movie)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), MovieError> {
        if !self.repo.delete_by_id(id).await? {
            return Err(MovieError::NotFound(id));
        }
        info!(event = "movie_deleted", id, "movie deleted");
        Ok(())
    }
}

fn log_conflict(fields: &MovieFields) {
    warn!(
        event = "movie_conflict",
        title = %fields.title,
        director = %fields.director,
        year = fields.year,
        "conflict: movie already exists"
    );
}
