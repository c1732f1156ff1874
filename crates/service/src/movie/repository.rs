use async_trait::async_trait;

use super::domain::{Movie, MovieFields};
use super::errors::MovieError;

/// Repository abstraction for movie persistence.
///
/// Writes must enforce the `(title, director, year)` uniqueness themselves and
/// report a taken triple as `MovieError::Conflict`; the service-level check is
/// only a fast path.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn count(&self) -> Result<u64, MovieError>;
    /// Every stored movie, ordered by id.
    async fn find_all(&self) -> Result<Vec<Movie>, MovieError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, MovieError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, MovieError>;
    /// `excluding` leaves one record out of the scan.
    async fn exists_by_title_director_year(&self, fields: &MovieFields, excluding: Option<i64>) -> Result<bool, MovieError>;
    /// Persist a new record; the store assigns the id.
    async fn insert(&self, fields: &MovieFields) -> Result<Movie, MovieError>;
    /// Overwrite the mutable fields of `id`. `Ok(None)` when no such record exists.
    async fn replace(&self, id: i64, fields: &MovieFields) -> Result<Option<Movie>, MovieError>;
    /// Returns true if a record was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, MovieError>;
}

/// In-memory store for tests and the `memory` backend.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct Table {
        rows: BTreeMap<i64, Movie>,
        last_id: i64,
    }

    impl Table {
        fn is_taken(&self, fields: &MovieFields, excluding: Option<i64>) -> bool {
            self.rows.values().any(|m| Some(m.id) != excluding && fields.matches(m))
        }
    }

    /// Ids start at 1 and are never reused, even after deletes.
    #[derive(Default)]
    pub struct InMemoryMovieRepository {
        table: RwLock<Table>,
    }

    #[async_trait]
    impl MovieRepository for InMemoryMovieRepository {
        async fn count(&self) -> Result<u64, MovieError> {
            Ok(self.table.read().await.rows.len() as u64)
        }

        async fn find_all(&self) -> Result<Vec<Movie>, MovieError> {
            Ok(self.table.read().await.rows.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, MovieError> {
            Ok(self.table.read().await.rows.get(&id).cloned())
        }

        async fn exists_by_id(&self, id: i64) -> Result<bool, MovieError> {
            Ok(self.table.read().await.rows.contains_key(&id))
        }

        async fn exists_by_title_director_year(&self, fields: &MovieFields, excluding: Option<i64>) -> Result<bool, MovieError> {
            Ok(self.table.read().await.is_taken(fields, excluding))
        }

        async fn insert(&self, fields: &MovieFields) -> Result<Movie, MovieError> {
            let mut table = self.table.write().await;
            if table.is_taken(fields, None) {
                return Err(MovieError::Conflict);
            }
            table.last_id += 1;
            let movie = Movie::from_fields(table.last_id, fields.clone());
            table.rows.insert(movie.id, movie.clone());
            Ok(movie)
        }

        async fn replace(&self, id: i64, fields: &MovieFields) -> Result<Option<Movie>, MovieError> {
            let mut table = self.table.write().await;
            if !table.rows.contains_key(&id) {
                return Ok(None);
            }
            if table.is_taken(fields, Some(id)) {
                return Err(MovieError::Conflict);
            }
            let movie = Movie::from_fields(id, fields.clone());
            table.rows.insert(id, movie.clone());
            Ok(Some(movie))
        }

        async fn delete_by_id(&self, id: i64) -> Result<bool, MovieError> {
            Ok(self.table.write().await.rows.remove(&id).is_some())
        }
    }

}
