//! Service layer for the movie catalog.
//! - Owns validation, duplicate detection and not-found handling.
//! - Talks to persistence only through the `MovieRepository` abstraction.

pub mod movie;
#[cfg(test)]
pub mod test_support;
