mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let app = common::TestApp::new();

    let res = app.get("/", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["name"], "project2-api");
    assert!(res.data()["endpoints"]["projects"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::TestApp::new();

    let res = app.get("/health", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_a_json_404() -> Result<()> {
    let app = common::TestApp::new();

    let res = app.get("/api/v1/nothing-here", None).await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], true);
    assert_eq!(res.body["code"], "NOT_FOUND");
    assert!(res.message().contains("/api/v1/nothing-here"));
    Ok(())
}
