use std::sync::Arc;

use clipshare_api::ids::generate_message_id;
use clipshare_api::{AppStateInner, build_router};
use clipshare_db::{StoreClient, StoreConfig};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base: String,
    client: reqwest::Client,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(StoreConfig::default(), None).await
    }

    async fn spawn_with(config: StoreConfig, base_url: Option<String>) -> Self {
        let store = Arc::new(StoreClient::new(config));
        let app = build_router(AppStateInner::new(store, base_url));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn create(&self, content: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/api/messages"))
            .json(&json!({ "content": content }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }

    async fn list(&self) -> Vec<Value> {
        let resp = self.client.get(self.url("/api/messages")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }

    async fn pin(&self, id: &str, is_pinned: bool) -> Value {
        let resp = self
            .client
            .patch(self.url("/api/messages"))
            .json(&json!({ "id": id, "isPinned": is_pinned }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }

    async fn delete(&self, body: Value) -> Value {
        let resp = self
            .client
            .delete(self.url("/api/messages"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }
}

fn ids(messages: &[Value]) -> Vec<String> {
    messages.iter().map(|m| m["id"].as_str().unwrap().to_string()).collect()
}

#[tokio::test]
async fn create_returns_full_message() {
    let server = TestServer::spawn().await;
    let msg = server.create("hello").await;

    let timestamp = msg["timestamp"].as_str().unwrap();
    assert!(timestamp.ends_with('Z'));
    assert_eq!(msg["id"], generate_message_id("hello", timestamp));
    assert_eq!(msg["content"], "hello");
    assert_eq!(msg["isPinned"], false);
    assert_eq!(msg["readableSlug"].as_str().unwrap().split('-').count(), 3);
}

#[tokio::test]
async fn create_without_content_is_rejected() {
    let server = TestServer::spawn().await;

    for body in [json!({}), json!({ "content": "" }), json!({ "content": null })] {
        let resp = server
            .client
            .post(server.url("/api/messages"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"], "Content required");
    }

    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = TestServer::spawn().await;
    let resp = server
        .client
        .post(server.url("/api/messages"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = resp.json().await.unwrap();
    assert!(err["error"].is_string());
}

#[tokio::test]
async fn list_is_newest_first() {
    let server = TestServer::spawn().await;
    let mut created = Vec::new();
    for content in ["one", "two", "three"] {
        created.push(server.create(content).await);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let listed = server.list().await;
    assert_eq!(listed.len(), 3);
    let expected: Vec<String> = created.iter().rev().map(|m| m["id"].as_str().unwrap().to_string()).collect();
    assert_eq!(ids(&listed), expected);
}

#[tokio::test]
async fn pin_toggle_is_persisted() {
    let server = TestServer::spawn().await;
    let msg = server.create("pin me").await;
    let id = msg["id"].as_str().unwrap();

    assert_eq!(server.pin(id, true).await, json!({ "success": true }));
    let listed = server.list().await;
    assert_eq!(listed[0]["isPinned"], true);

    server.pin(id, false).await;
    assert_eq!(server.list().await[0]["isPinned"], false);
}

#[tokio::test]
async fn pin_unknown_id_succeeds_without_creating_record() {
    let server = TestServer::spawn().await;
    assert_eq!(server.pin("deadbeef", true).await, json!({ "success": true }));
    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn delete_single_and_all() {
    let server = TestServer::spawn().await;
    let a = server.create("a").await;
    server.create("b").await;
    server.create("c").await;

    let a_id = a["id"].as_str().unwrap();
    assert_eq!(server.delete(json!({ "id": a_id })).await, json!({ "success": true }));
    let remaining = server.list().await;
    assert_eq!(remaining.len(), 2);
    assert!(!ids(&remaining).contains(&a_id.to_string()));

    // unknown id is not an error
    server.delete(json!({ "id": a_id })).await;

    server.delete(json!({})).await;
    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn delete_without_body_clears_all() {
    let server = TestServer::spawn().await;
    server.create("a").await;

    let resp = server.client.delete(server.url("/api/messages")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn detail_pages_resolve_by_id_and_slug() {
    let server = TestServer::spawn_with(StoreConfig::default(), Some("https://clip.example/".into())).await;
    let msg = server.create("<b>shared</b> text").await;
    let id = msg["id"].as_str().unwrap();
    let slug = msg["readableSlug"].as_str().unwrap();

    for path in [format!("/message/{id}"), format!("/m/{slug}")] {
        let resp = server.client.get(server.url(&path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = resp.text().await.unwrap();
        assert!(html.contains(&format!("<title>ClipShare - {slug}</title>")));
        assert!(html.contains("&lt;b&gt;shared&lt;/b&gt; text"));
        assert!(html.contains(&format!("https://clip.example/message/{id}")));
    }
}

#[tokio::test]
async fn unknown_detail_is_not_found() {
    let server = TestServer::spawn().await;
    for path in ["/message/00000000", "/m/no-such-slug", "/nowhere"] {
        let resp = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.text().await.unwrap().contains("Message Not Found"));
    }
}

#[tokio::test]
async fn listing_page_shows_pinned_first() {
    let server = TestServer::spawn().await;
    let older = server.create("older pinned").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = server.create("newer unpinned").await;
    server.pin(older["id"].as_str().unwrap(), true).await;

    let html = server
        .client
        .get(server.url("/messages"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let pinned_at = html.find(&format!(r#"data-id="{}""#, older["id"].as_str().unwrap())).unwrap();
    let newer_at = html.find(&format!(r#"data-id="{}""#, newer["id"].as_str().unwrap())).unwrap();
    assert!(pinned_at < newer_at);
    assert!(html.contains("All Messages"));
}

#[tokio::test]
async fn composer_and_health() {
    let server = TestServer::spawn().await;
    let home = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(home.status(), StatusCode::OK);
    assert!(home.text().await.unwrap().contains("New Message"));

    let health = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn messages_survive_on_disk_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        address: dir.path().join("clipshare.db").to_string_lossy().into_owned(),
    };

    let first = TestServer::spawn_with(config.clone(), None).await;
    let msg = first.create("durable").await;

    let second = TestServer::spawn_with(config, None).await;
    let listed = second.list().await;
    assert_eq!(ids(&listed), vec![msg["id"].as_str().unwrap().to_string()]);
}

#[tokio::test]
async fn store_failure_is_server_error() {
    let server = TestServer::spawn_with(
        StoreConfig { address: "/nonexistent-dir/clipshare/store.db".into() },
        None,
    )
    .await;
    let resp = server.client.get(server.url("/api/messages")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
