//! End-to-end pipeline tests against a mock Hacker News API.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use beststories::hn::{HnService, HttpTransport};

fn service_for(server: &MockServer) -> HnService {
    let transport = HttpTransport::new(format!("{}/v0/", server.uri()))
        .expect("failed to build transport");
    HnService::new(Arc::new(transport))
}

fn item_body(id: u64, title: &str, by: &str, score: i64, descendants: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "by": by,
        "time": 1761424000u64,
        "score": score,
        "descendants": descendants,
        "type": "story",
        "url": format!("https://{}", title.to_lowercase()),
    })
}

async fn mount_ids(server: &MockServer, ids: &[u64]) {
    Mock::given(method("GET"))
        .and(path("/v0/beststories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ids))
        .mount(server)
        .await;
}

async fn mount_item(server: &MockServer, id: u64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v0/item/{}.json", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetches_decodes_and_orders_stories() {
    let server = MockServer::start().await;
    mount_ids(&server, &[111, 222, 333, 444]).await;
    mount_item(&server, 111, item_body(111, "A", "u1", 50, 5)).await;
    mount_item(&server, 222, item_body(222, "B", "u2", 70, 7)).await;
    mount_item(&server, 333, item_body(333, "C", "u3", 60, 6)).await;
    mount_item(&server, 444, item_body(444, "D", "u4", 40, 4)).await;

    let service = service_for(&server);
    let stories = service
        .get_best_stories(3, &CancellationToken::new())
        .await
        .unwrap();

    let titles: Vec<&str> = stories.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["B", "C", "A"]);
}

#[tokio::test]
async fn maps_item_fields_through_real_json() {
    let server = MockServer::start().await;
    mount_ids(&server, &[10]).await;
    mount_item(
        &server,
        10,
        serde_json::json!({
            "id": 10,
            "title": "Hello",
            "by": "alice",
            "time": 1761424738u64,
            "score": 248,
            "descendants": 57,
            "type": "story",
            "url": "https://example",
        }),
    )
    .await;

    let service = service_for(&server);
    let stories = service
        .get_best_stories(1, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stories.len(), 1);
    let story = &stories[0];
    assert_eq!(story.title, "Hello");
    assert_eq!(story.uri, "https://example");
    assert_eq!(story.posted_by, "alice");
    assert_eq!(story.time, "2025-10-25T20:38:58+00:00");
    assert_eq!(story.score, 248);
    assert_eq!(story.comment_count, 57);
}

#[tokio::test]
async fn not_found_item_does_not_fail_the_batch() {
    let server = MockServer::start().await;
    mount_ids(&server, &[1, 2]).await;
    mount_item(&server, 1, item_body(1, "Kept", "u1", 9, 0)).await;
    Mock::given(method("GET"))
        .and(path("/v0/item/2.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let stories = service
        .get_best_stories(2, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].title, "Kept");
}

#[tokio::test]
async fn null_item_payload_is_tolerated() {
    let server = MockServer::start().await;
    mount_ids(&server, &[1, 2]).await;
    mount_item(&server, 1, item_body(1, "Real", "u1", 1, 0)).await;
    Mock::given(method("GET"))
        .and(path("/v0/item/2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let stories = service
        .get_best_stories(2, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stories.len(), 1);
}

#[tokio::test]
async fn repeat_request_within_ttl_does_not_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/beststories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json([42u64]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/item/42.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_body(42, "Cached", "u", 1, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let cancel = CancellationToken::new();

    let first = service.get_best_stories(1, &cancel).await.unwrap();
    let second = service.get_best_stories(1, &cancel).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second, first);
    // The expect(1) guards above verify no refetch happened when the
    // mock server is torn down.
}

#[tokio::test]
async fn upstream_error_on_ids_yields_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/beststories.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let stories = service
        .get_best_stories(5, &CancellationToken::new())
        .await
        .unwrap();

    assert!(stories.is_empty());
}
