use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;

use server::links::LinkBuilder;
use server::startup::build_app;
use service::movie::repository::memory::InMemoryMovieRepository;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let app = build_app(Arc::new(InMemoryMovieRepository::default()), LinkBuilder::new(base_url.clone()));
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_movie_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let inception = json!({"title": "Inception", "director": "Christopher Nolan", "year": 2010});

    // Add
    let res = c.post(format!("{}/add", app.base_url)).json(&inception).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    let id = created["id"].as_i64().unwrap_or_default();

    // Same triple again
    let res = c.post(format!("{}/add", app.base_url)).json(&inception).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = c.get(format!("{}/count", app.base_url)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["number of movies in the database"], 1);

    // Update
    let res = c
        .put(format!("{}/update/{}", app.base_url, id))
        .json(&json!({"title": "Inception", "director": "Christopher Nolan", "year": 2011}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["year"], 2011);

    // Links point back at this server
    let res = c.get(format!("{}/movies", app.base_url)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(
        body["_embedded"]["movieDTOList"][0]["_links"]["self"]["href"],
        format!("{}/movies/{}", app.base_url, id)
    );

    // Delete, then it is gone
    let res = c.delete(format!("{}/delete/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.get(format!("{}/movies/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}
