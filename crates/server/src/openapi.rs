use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MovieDoc { pub id: i64, pub title: String, pub director: String, pub year: i32 }

/// `id` is ignored on input.
#[derive(ToSchema)]
pub struct MovieInputDoc {
    pub id: Option<i64>,
    pub title: String,
    pub director: String,
    #[schema(minimum = 1900)]
    pub year: i32,
}

#[derive(ToSchema)]
pub struct CountResponseDoc {
    #[schema(rename = "number of movies in the database")]
    pub count: u64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::movies::count,
        crate::routes::movies::list_simple,
        crate::routes::movies::list,
        crate::routes::movies::get,
        crate::routes::movies::add,
        crate::routes::movies::update,
        crate::routes::movies::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MovieDoc,
            MovieInputDoc,
            CountResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "movies")
    )
)]
pub struct ApiDoc;
