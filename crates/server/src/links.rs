//! HAL-style hypermedia decoration for movie responses.
//!
//! Presentation only: the service returns plain `MovieView`s and the
//! transport wraps them here.

use axum::http::{header, HeaderMap};
use serde::Serialize;
use service::movie::MovieView;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelfLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
}

impl SelfLinks {
    fn to(href: String) -> Self {
        Self { self_link: Link { href } }
    }
}

/// A movie view with its own `_links.self`.
#[derive(Debug, Clone, Serialize)]
pub struct MovieResource {
    #[serde(flatten)]
    pub movie: MovieView,
    #[serde(rename = "_links")]
    pub links: SelfLinks,
}

/// Items sit under the `movieDTOList` rel, the name existing HAL clients read.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddedMovies {
    #[serde(rename = "movieDTOList")]
    pub movies: Vec<MovieResource>,
}

/// `_embedded` is omitted for an empty collection.
#[derive(Debug, Clone, Serialize)]
pub struct MovieCollection {
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<EmbeddedMovies>,
    #[serde(rename = "_links")]
    pub links: SelfLinks,
}

/// Builds absolute links from the request's host, falling back to a configured base.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    fallback_base: String,
}

impl LinkBuilder {
    pub fn new(fallback_base: impl Into<String>) -> Self {
        let base: String = fallback_base.into();
        Self { fallback_base: base.trim_end_matches('/').to_string() }
    }

    /// `<proto>://<host>` from `X-Forwarded-Proto` and `Host`, or the fallback base.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|h| !h.trim().is_empty());
        let Some(host) = host else { return self.fallback_base.clone(); };
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");
        format!("{}://{}", proto, host)
    }

    pub fn movie(&self, base: &str, movie: MovieView) -> MovieResource {
        let href = format!("{}/movies/{}", base, movie.id);
        MovieResource { movie, links: SelfLinks::to(href) }
    }

    pub fn collection(&self, base: &str, movies: Vec<MovieView>) -> MovieCollection {
        let embedded = (!movies.is_empty()).then(|| EmbeddedMovies {
            movies: movies.into_iter().map(|m| self.movie(base, m)).collect(),
        });
        MovieCollection { embedded, links: SelfLinks::to(format!("{}/movies", base)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn heat() -> MovieView {
        MovieView { id: 7, title: "Heat".into(), director: "Michael Mann".into(), year: 1995 }
    }

    #[test]
    fn base_url_prefers_request_host() {
        let links = LinkBuilder::new("http://fallback:8080/");
        let mut headers = HeaderMap::new();
        assert_eq!(links.base_url(&headers), "http://fallback:8080");

        headers.insert(header::HOST, HeaderValue::from_static("movies.local:3000"));
        assert_eq!(links.base_url(&headers), "http://movies.local:3000");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(links.base_url(&headers), "https://movies.local:3000");
    }

    #[test]
    fn movie_resource_flattens_view_and_adds_self_link() {
        let links = LinkBuilder::new("http://h");
        let value = serde_json::to_value(links.movie("http://h", heat())).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7, "title": "Heat", "director": "Michael Mann", "year": 1995,
                "_links": {"self": {"href": "http://h/movies/7"}}
            })
        );
    }

    #[test]
    fn collection_embeds_items_and_links_itself() {
        let links = LinkBuilder::new("http://h");
        let value = serde_json::to_value(links.collection("http://h", vec![heat()])).unwrap();
        assert_eq!(value["_links"]["self"]["href"], "http://h/movies");
        assert_eq!(value["_embedded"]["movieDTOList"][0]["_links"]["self"]["href"], "http://h/movies/7");

        let empty = serde_json::to_value(links.collection("http://h", vec![])).unwrap();
        assert_eq!(empty, json!({"_links": {"self": {"href": "http://h/movies"}}}));
    }
}
