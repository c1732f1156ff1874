use serde::{Deserialize, Serialize};

use super::errors::MovieError;

/// Earliest release year accepted for a movie.
pub const MIN_YEAR: i32 = 1900;

/// Candidate record submitted for add/update.
/// `id` is accepted for compatibility with clients that echo records back, and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl MovieInput {
    pub fn new(title: impl Into<String>, director: impl Into<String>, year: i32) -> Self {
        Self { id: None, title: Some(title.into()), director: Some(director.into()), year: Some(year) }
    }

    /// Checks every field and returns the validated triple.
    /// Values are kept as submitted; trimming only decides emptiness.
    pub fn validate(&self) -> Result<MovieFields, MovieError> {
        let title = non_blank(self.title.as_deref()).ok_or(MovieError::InvalidInput)?;
        let director = non_blank(self.director.as_deref()).ok_or(MovieError::InvalidInput)?;
        let year = self.year.filter(|y| *y >= MIN_YEAR).ok_or(MovieError::InvalidInput)?;
        Ok(MovieFields { title: title.to_string(), director: director.to_string(), year })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A validated `(title, director, year)` triple, the uniqueness key of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovieFields {
    pub title: String,
    pub director: String,
    pub year: i32,
}

impl MovieFields {
    /// Exact, case-sensitive comparison of the triple.
    pub fn matches(&self, movie: &Movie) -> bool {
        self.title == movie.title && self.director == movie.director && self.year == movie.year
    }
}

/// Persisted movie as returned by add/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
}

impl Movie {
    pub fn from_fields(id: i64, fields: MovieFields) -> Self {
        Self { id, title: fields.title, director: fields.director, year: fields.year }
    }
}

impl From<models::movie::Model> for Movie {
    fn from(m: models::movie::Model) -> Self {
        Self { id: m.id, title: m.title, director: m.director, year: m.year }
    }
}

/// Read-only projection of a movie for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieView {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
}

impl From<Movie> for MovieView {
    fn from(m: Movie) -> Self {
        Self { id: m.id, title: m.title, director: m.director, year: m.year }
    }
}
