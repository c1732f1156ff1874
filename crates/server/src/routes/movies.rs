use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use service::movie::{Movie, MovieInput, MovieView};
use tracing::{info, warn};

use crate::errors::JsonApiError;
use crate::links::MovieCollection;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    #[serde(rename = "number of movies in the database")]
    pub count: u64,
}

/// Unparseable or mistyped bodies are client errors like any other invalid input.
fn body_or_bad_request(payload: Result<Json<MovieInput>, JsonRejection>) -> Result<MovieInput, JsonApiError> {
    match payload {
        Ok(Json(input)) => Ok(input),
        Err(JsonRejection::MissingJsonContentType(rejection)) => Err(JsonApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type",
            Some(rejection.body_text()),
        )),
        Err(rejection) => {
            warn!(err = %rejection, "rejected movie payload");
            Err(JsonApiError::bad_request(rejection.body_text()))
        }
    }
}

/// Path rejections keep axum's status but use the JSON error body.
fn id_or_bad_request(id: Result<Path<i64>, PathRejection>) -> Result<i64, JsonApiError> {
    id.map(|Path(id)| id).map_err(|rejection| {
        let status = rejection.status();
        warn!(err = %rejection, "rejected movie id");
        JsonApiError::new(status, status.canonical_reason().unwrap_or("Bad Request"), Some(rejection.body_text()))
    })
}

#[utoipa::path(
    get, path = "/count", tag = "movies",
    responses((status = 200, description = "Number of stored movies", body = crate::openapi::CountResponseDoc))
)]
pub async fn count(State(state): State<ServerState>) -> Result<Json<CountResponse>, JsonApiError> {
    let count = state.movies.count().await?;
    Ok(Json(CountResponse { count }))
}

#[utoipa::path(
    get, path = "/simple", tag = "movies",
    responses((status = 200, description = "All movies without links", body = [crate::openapi::MovieDoc]))
)]
pub async fn list_simple(State(state): State<ServerState>) -> Result<Json<Vec<MovieView>>, JsonApiError> {
    let views = state.movies.list_all().await?;
    info!(count = views.len(), "list movies");
    Ok(Json(views))
}

#[utoipa::path(
    get, path = "/movies", tag = "movies",
    responses((status = 200, description = "All movies with self links"))
)]
pub async fn list(State(state): State<ServerState>, headers: HeaderMap) -> Result<Json<MovieCollection>, JsonApiError> {
    let views = state.movies.list_all().await?;
    let base = state.links.base_url(&headers);
    Ok(Json(state.links.collection(&base, views)))
}

#[utoipa::path(
    get, path = "/movies/{id}", tag = "movies",
    params(("id" = i64, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::MovieDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MovieView>, JsonApiError> {
    let id = id_or_bad_request(id)?;
    Ok(Json(state.movies.get_by_id(id).await?))
}

#[utoipa::path(
    post, path = "/add", tag = "movies",
    request_body = crate::openapi::MovieInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::MovieDoc),
        (status = 400, description = "Invalid Input"),
        (status = 409, description = "Conflict"),
        (status = 415, description = "Body is not application/json")
    )
)]
pub async fn add(
    State(state): State<ServerState>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Movie>), JsonApiError> {
    let input = body_or_bad_request(payload)?;
    let movie = state.movies.add(input).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

#[utoipa::path(
    put, path = "/update/{id}", tag = "movies",
    params(("id" = i64, Path, description = "Movie ID")),
    request_body = crate::openapi::MovieInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MovieDoc),
        (status = 400, description = "Invalid Input"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> Result<Json<Movie>, JsonApiError> {
    let id = id_or_bad_request(id)?;
    let input = body_or_bad_request(payload)?;
    Ok(Json(state.movies.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/delete/{id}", tag = "movies",
    params(("id" = i64, Path, description = "Movie ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = id_or_bad_request(id)?;
    state.movies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
