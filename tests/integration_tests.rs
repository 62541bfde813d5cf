//! End-to-end tests against a running `living-map serve` process

mod common;

use common::TestServer;
use serde_json::{json, Value};

const DEFAULT_VIDEO_URL: &str = "https://www.w3schools.com/html/mov_bbb.mp4";

async fn post_generate(server: &TestServer, body: Value) -> (u16, Value) {
    let res = reqwest::Client::new()
        .post(server.url("/generate"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status().as_u16();
    (status, res.json().await.unwrap())
}

async fn identities(server: &TestServer) -> Vec<Value> {
    let res = reqwest::get(server.url("/identities")).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    res.json().await.unwrap()
}

#[tokio::test]
async fn test_index_page() {
    let server = TestServer::start().await;

    let res = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("Living Map"));
}

#[tokio::test]
async fn test_register_and_list() {
    let server = TestServer::start().await;
    assert!(identities(&server).await.is_empty());

    let (status, outcome) =
        post_generate(&server, json!({"prompt": "wizard", "lat": 37.77, "lng": -122.41})).await;
    assert_eq!(status, 200);
    assert_eq!(
        outcome,
        json!({"status": "success", "video_url": DEFAULT_VIDEO_URL, "persona": "wizard"})
    );

    let (status, _) =
        post_generate(&server, json!({"prompt": "  knight  ", "lat": 0.0, "lng": 0.0})).await;
    assert_eq!(status, 200);

    let all = identities(&server).await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["prompt"], "wizard");
    assert_eq!(all[0]["lat"], 37.77);
    assert_eq!(all[0]["lng"], -122.41);
    assert_eq!(all[0]["video_url"], DEFAULT_VIDEO_URL);
    assert_eq!(all[1]["prompt"], "knight");
    assert_eq!(all[1]["persona"], "knight");
}

#[tokio::test]
async fn test_invalid_requests_do_not_register() {
    let server = TestServer::start().await;

    let (status, outcome) =
        post_generate(&server, json!({"prompt": "", "lat": 37.77, "lng": -122.41})).await;
    assert_eq!(status, 400);
    assert_eq!(outcome, json!({"status": "error", "message": "Missing required fields"}));

    let (status, _) = post_generate(&server, json!({"prompt": "knight"})).await;
    assert_eq!(status, 400);

    let res = reqwest::Client::new()
        .post(server.url("/generate"))
        .body("definitely not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
    let outcome: Value = res.json().await.unwrap();
    assert_eq!(outcome["status"], "error");

    assert!(identities(&server).await.is_empty());
}

#[tokio::test]
async fn test_slow_generator_times_out() {
    let server = TestServer::start_with(
        "[generator]\ntimeout_secs = 1\n\n[generator.mock]\nlatency_ms = 5000\n",
    )
    .await;

    let (status, outcome) =
        post_generate(&server, json!({"prompt": "wizard", "lat": 1.0, "lng": 2.0})).await;
    assert_eq!(status, 504);
    assert_eq!(outcome["status"], "error");
    assert!(outcome["message"].as_str().unwrap().contains("timed out"));

    assert!(identities(&server).await.is_empty());
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    post_generate(&server, json!({"prompt": "bard", "lat": 1.0, "lng": 1.0})).await;

    let health: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["generator"], "mock");
    assert_eq!(health["identities"], 1);
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_headers() {
    let server = TestServer::start().await;

    let res = reqwest::Client::new()
        .get(server.url("/identities"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_generator_failure_is_bad_gateway() {
    let server =
        TestServer::start_with("[generator.mock]\nfail_with = \"simulated outage\"\n").await;

    let (status, outcome) =
        post_generate(&server, json!({"prompt": "wizard", "lat": 1.0, "lng": 2.0})).await;
    assert_eq!(status, 502);
    assert_eq!(outcome["status"], "error");
    assert!(outcome["message"].as_str().unwrap().contains("simulated outage"));

    assert!(identities(&server).await.is_empty());
}
