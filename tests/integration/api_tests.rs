//! API integration tests
//!
//! Each test starts its own server on an ephemeral port, so the shelf is
//! always empty at the start.

use bookshelf_server::{api, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Spawn a server and return its base URL
async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    let app = api::create_router(AppState::new());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}", addr)
}

async fn create_book(client: &Client, base_url: &str, body: Value) -> String {
    let response = client
        .post(format!("{}/books", base_url))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["bookId"].as_str().expect("No book ID").to_string()
}

async fn get_book(client: &Client, base_url: &str, id: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}/books/{}", base_url, id))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body: Value = response.json().await.expect("Failed to parse response");
    (status, body)
}

#[tokio::test]
async fn test_create_finished_book() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let id = create_book(
        &client,
        &base_url,
        json!({"name": "A", "pageCount": 100, "readPage": 100, "reading": false}),
    )
    .await;

    let (status, body) = get_book(&client, &base_url, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"]["finished"], true);
    assert_eq!(body["data"]["book"]["reading"], false);
}

#[tokio::test]
async fn test_create_without_name() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base_url))
        .json(&json!({"pageCount": 10, "readPage": 5}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");
}

#[tokio::test]
async fn test_create_read_page_exceeds_page_count() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base_url))
        .json(&json!({"name": "B", "pageCount": 50, "readPage": 80}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );
}

#[tokio::test]
async fn test_list_with_name_and_reading_filter() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let expected = create_book(
        &client,
        &base_url,
        json!({"name": "Dicoding Academy", "publisher": "Dicoding", "pageCount": 10, "readPage": 1, "reading": true}),
    )
    .await;
    create_book(
        &client,
        &base_url,
        json!({"name": "Another Book", "pageCount": 10, "readPage": 1, "reading": false}),
    )
    .await;
    create_book(
        &client,
        &base_url,
        json!({"name": "Rust", "pageCount": 10, "readPage": 1, "reading": true}),
    )
    .await;

    let response = client
        .get(format!("{}/books?name=a&reading=1", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    let books = body["data"]["books"].as_array().expect("No books array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], expected.as_str());
    assert_eq!(books[0]["name"], "Dicoding Academy");
    assert_eq!(books[0]["publisher"], "Dicoding");
    assert!(books[0].get("pageCount").is_none());
}

#[tokio::test]
async fn test_update_unknown_book() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let response = client
        .put(format!("{}/books/unknown-id", base_url))
        .json(&json!({"name": "A", "pageCount": 10, "readPage": 1, "reading": false}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_update_refreshes_updated_at() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let id = create_book(
        &client,
        &base_url,
        json!({"name": "A", "author": "Someone", "pageCount": 10, "readPage": 1}),
    )
    .await;
    let (_, before) = get_book(&client, &base_url, &id).await;

    let response = client
        .put(format!("{}/books/{}", base_url, id))
        .json(&json!({"name": "A", "pageCount": 10, "readPage": 10, "reading": true}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let (_, after) = get_book(&client, &base_url, &id).await;
    let before = &before["data"]["book"];
    let after = &after["data"]["book"];

    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["insertedAt"], before["insertedAt"]);
    assert_eq!(after["finished"], true);
    assert!(after.get("author").is_none());

    let parse = |v: &Value| {
        chrono::DateTime::parse_from_rfc3339(v.as_str().expect("timestamp")).expect("rfc3339")
    };
    assert!(parse(&after["updatedAt"]) >= parse(&before["updatedAt"]));
}

#[tokio::test]
async fn test_delete_then_get() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let id = create_book(
        &client,
        &base_url,
        json!({"name": "A", "pageCount": 10, "readPage": 1}),
    )
    .await;

    let response = client
        .delete(format!("{}/books/{}", base_url, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = get_book(&client, &base_url, &id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Buku tidak ditemukan");
}

#[tokio::test]
async fn test_concurrent_creates_have_unique_ids() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let client = client.clone();
            let base_url = base_url.clone();
            tokio::spawn(async move {
                create_book(
                    &client,
                    &base_url,
                    json!({"name": format!("Book {}", i), "pageCount": 1, "readPage": 0}),
                )
                .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.expect("Task panicked"));
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 32);

    let body: Value = client
        .get(format!("{}/books", base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["data"]["books"].as_array().expect("No books array").len(), 32);
}
