//! End-to-end tests for shelf CRUD against a local fixture server that
//! speaks the bookshelf contract: one entry per id, 409 on duplicate adds,
//! `erro` bodies on failure, and `__` unescaped back to `/` in path ids.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use axum::Router;
use serde_json::{json, Value};

use bookshelf_client::error::ClientError;
use bookshelf_client::models::book::FALLBACK_COVER_URL;
use bookshelf_client::services::shelf::ShelfStore;

type Shelf = Arc<Mutex<HashMap<String, Value>>>;

async fn add_book(State(shelf): State<Shelf>, Json(payload): Json<Value>) -> (StatusCode, Json<Value>) {
    let id = payload.get("ol_id").and_then(Value::as_str);
    let status = payload.get("status").and_then(Value::as_str);
    let (Some(id), Some(status)) = (id, status) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"erro": "book id and status are required"})),
        );
    };
    let author = payload
        .get("author")
        .and_then(Value::as_str)
        .unwrap_or("Unknown");

    let mut guard = shelf.lock().unwrap();
    if guard.contains_key(id) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"erro": "this book is already on your shelf"})),
        );
    }
    let record = json!({
        "id": id,
        "title": format!("Title for {id}"),
        "author": author,
        "status": status,
        "cover_url": "",
    });
    guard.insert(id.to_string(), record.clone());
    (
        StatusCode::CREATED,
        Json(json!({"message": "book added to the shelf", "book": record})),
    )
}

async fn list_books(State(shelf): State<Shelf>) -> Json<Value> {
    let guard = shelf.lock().unwrap();
    let books: Vec<Value> = guard.values().cloned().collect();
    Json(json!({"total": books.len(), "books": books}))
}

async fn update_book(
    State(shelf): State<Shelf>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = id.replace("__", "/");
    let mut guard = shelf.lock().unwrap();
    let Some(record) = guard.get_mut(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"erro": "book not found on your shelf"})),
        );
    };
    record["status"] = payload.get("status").cloned().unwrap_or(Value::Null);
    (StatusCode::OK, Json(json!({"message": "book updated"})))
}

async fn delete_book(State(shelf): State<Shelf>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let id = id.replace("__", "/");
    let mut guard = shelf.lock().unwrap();
    if guard.remove(&id).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"erro": "book not found on your shelf"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"message": "book removed", "deleted_book": {"id": id}})),
    )
}

async fn start_server() -> SocketAddr {
    let shelf: Shelf = Arc::new(Mutex::new(HashMap::new()));
    let app = Router::new()
        .route("/bookshelf", get(list_books).post(add_book))
        .route("/bookshelf/:id", put(update_book).delete(delete_book))
        .with_state(shelf);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn store(addr: SocketAddr) -> ShelfStore {
    ShelfStore::new(reqwest::Client::new(), format!("http://{addr}"))
}

#[tokio::test]
async fn add_then_list_shows_exactly_one_entry() {
    let addr = start_server().await;
    let store = store(addr);

    let outcome = store.add("OL123", "Jane Doe", "reading").await.unwrap();
    assert_eq!(outcome.message, "book added to the shelf");
    assert_eq!(outcome.shelf.len(), 1);
    assert_eq!(outcome.shelf[0].id, "OL123");
    assert_eq!(outcome.shelf[0].status, "reading");

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "OL123");
    assert_eq!(listed[0].status, "reading");
}

#[tokio::test]
async fn update_changes_only_the_target_entry() {
    let addr = start_server().await;
    let store = store(addr);
    store.add("OL123", "Jane Doe", "reading").await.unwrap();
    store.add("OL999", "John Roe", "wishlist").await.unwrap();

    let outcome = store.update("OL123", "read").await.unwrap();
    let updated = outcome.shelf.iter().find(|entry| entry.id == "OL123").unwrap();
    assert_eq!(updated.status, "read");
    let untouched = outcome.shelf.iter().find(|entry| entry.id == "OL999").unwrap();
    assert_eq!(untouched.status, "wishlist");
}

#[tokio::test]
async fn remove_deletes_the_entry() {
    let addr = start_server().await;
    let store = store(addr);
    store.add("OL123", "Jane Doe", "reading").await.unwrap();

    let outcome = store.remove("OL123").await.unwrap();
    assert!(outcome.shelf.iter().all(|entry| entry.id != "OL123"));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn slash_bearing_ids_survive_the_path_round_trip() {
    let addr = start_server().await;
    let store = store(addr);
    store
        .add("/works/OL45804W", "Frank Herbert", "wishlist")
        .await
        .unwrap();

    let outcome = store.update("/works/OL45804W", "reading").await.unwrap();
    assert_eq!(outcome.shelf.len(), 1);
    assert_eq!(outcome.shelf[0].id, "/works/OL45804W");
    assert_eq!(outcome.shelf[0].status, "reading");

    let outcome = store.remove("/works/OL45804W").await.unwrap();
    assert!(outcome.shelf.is_empty());
}

#[tokio::test]
async fn duplicate_add_surfaces_the_server_message_verbatim() {
    let addr = start_server().await;
    let store = store(addr);
    store.add("OL123", "Jane Doe", "reading").await.unwrap();

    match store.add("OL123", "Jane Doe", "reading").await.unwrap_err() {
        ClientError::Service(message) => {
            assert_eq!(message, "this book is already on your shelf");
        }
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[tokio::test]
async fn updating_a_missing_entry_is_a_service_error() {
    let addr = start_server().await;
    match store(addr).update("OL404", "read").await.unwrap_err() {
        ClientError::Service(message) => assert_eq!(message, "book not found on your shelf"),
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_shelf_lists_as_a_valid_state() {
    let addr = start_server().await;
    assert!(store(addr).list().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let store = ShelfStore::new(reqwest::Client::new(), "http://127.0.0.1:1");
    assert!(matches!(
        store.list().await.unwrap_err(),
        ClientError::Transport(_)
    ));
}

#[tokio::test]
async fn empty_cover_url_normalizes_to_the_placeholder() {
    let addr = start_server().await;
    let store = store(addr);
    let outcome = store.add("OL123", "Jane Doe", "reading").await.unwrap();
    assert_eq!(outcome.shelf[0].cover_url, None);
    assert_eq!(outcome.shelf[0].cover_or_placeholder(), FALLBACK_COVER_URL);
}
