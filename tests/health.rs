mod common;

use local_chef_bazaar::{response::ApiResponse, routes::health::health_check};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
}

#[tokio::test]
async fn health_and_unknown_routes_over_http() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let http = reqwest::Client::new();

    let health: ApiResponse<serde_json::Value> = http
        .get(format!("{}/health", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health.message, "Health check");

    let missing = http
        .get(format!("{}/nowhere", server.base_url))
        .send()
        .await?;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    Ok(())
}
