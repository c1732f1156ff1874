use std::sync::Arc;

use service::movie::{MovieRepository, MovieService};

use crate::links::LinkBuilder;

#[derive(Clone)]
pub struct ServerState {
    pub movies: Arc<MovieService>,
    pub links: LinkBuilder,
}

impl ServerState {
    pub fn new(repo: Arc<dyn MovieRepository>, links: LinkBuilder) -> Self {
        Self { movies: Arc::new(MovieService::new(repo)), links }
    }
}
