//! Integration tests for the server surface outside the photo workflow.

mod common;

use common::{client, TestHarness};

#[tokio::test]
async fn health_check() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = client()
        .get(format!("http://{addr}/api/photos"))
        .header("x-request-id", "trace-me-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "trace-me-42");
}

#[tokio::test]
async fn request_id_is_minted_on_errors() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/api/photos/edit/5"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let id = resp.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(id.len(), 36);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "not_found");
    assert!(body["error"].as_str().unwrap().contains("photo"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/api-docs/openapi.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let doc: serde_json::Value = resp.json().await.unwrap();
    assert!(doc["paths"]["/api/photos/create"].is_object());
    assert!(doc["paths"]["/api/dogs"].is_object());
}

#[tokio::test]
async fn list_dogs_by_name() {
    let (h, addr) = TestHarness::with_server().await;
    let rex = h.create_dog("Rex");
    h.create_dog("Alfa");

    let resp = reqwest::get(format!("http://{addr}/api/dogs")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let dogs: Vec<serde_json::Value> = resp.json().await.unwrap();
    assert_eq!(dogs.len(), 2);
    assert_eq!(dogs[0]["name"], "Alfa");
    assert_eq!(dogs[1]["name"], "Rex");
    assert_eq!(dogs[1]["id"], rex.get());
}

#[tokio::test]
async fn empty_listing() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/api/photos")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Vec<serde_json::Value> = resp.json().await.unwrap();
    assert!(body.is_empty());
}
