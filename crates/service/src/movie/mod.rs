//! Movie module: three-layer architecture (domain, repository, service).

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{Movie, MovieFields, MovieInput, MovieView};
pub use errors::MovieError;
pub use repository::MovieRepository;
pub use service::MovieService;
