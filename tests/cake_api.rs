use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use cake_store::routes::BODY_LIMIT_BYTES;
use cake_store::{
    cake_routes, common_routes, with_middleware, AppError, AppState, Cake, CakeRepository,
    CakeService, NewCake,
};

/// Keeps rows in memory with the same soft-delete rules as the Postgres repository.
#[derive(Default)]
struct MemoryCakeRepo {
    rows: Mutex<Vec<Cake>>,
    writes: AtomicUsize,
}

impl MemoryCakeRepo {
    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("cake {} not found", id))
    }
}

#[async_trait]
impl CakeRepository for MemoryCakeRepo {
    async fn get_all(&self) -> Result<Vec<Cake>, AppError> {
        let mut live: Vec<Cake> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|c| !c.is_deleted)
            .cloned()
            .collect();
        live.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(live)
    }

    async fn get_by_id(&self, id: i64) -> Result<Cake, AppError> {
        self.rows
            .lock()
            .await
            .iter()
            .find(|c| c.id == id && !c.is_deleted)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, cake: &NewCake) -> Result<Cake, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().await;
        let now = Utc::now();
        let row = Cake {
            id: rows.len() as i64 + 1,
            title: cake.title.clone(),
            description: cake.description.clone(),
            rating: cake.rating,
            image: cake.image.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, cake: &NewCake) -> Result<Cake, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted)
            .ok_or_else(|| Self::not_found(id))?;
        row.title = cake.title.clone();
        row.description = cake.description.clone();
        row.rating = cake.rating;
        row.image = cake.image.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted)
            .ok_or_else(|| Self::not_found(id))?;
        row.is_deleted = true;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }
}

fn build_app() -> (Router, Arc<MemoryCakeRepo>) {
    let repo = Arc::new(MemoryCakeRepo::default());
    let state = AppState {
        cakes: CakeService::new(repo.clone()),
    };
    let app = with_middleware(common_routes().merge(cake_routes(state)));
    (app, repo)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request should build");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, json)
}

fn cake(title: &str, rating: f64) -> Value {
    json!({
        "title": title,
        "description": format!("{} description", title),
        "rating": rating,
        "image": format!("https://img.example.com/{}.jpg", title.to_lowercase().replace(' ', "-"))
    })
}

#[tokio::test]
async fn create_returns_created_cake_with_id() {
    let (app, _) = build_app();
    let (status, body) = send(&app, Method::POST, "/cakes/", Some(cake("Lemon Drizzle", 4.5))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Cake created successfully");
    assert!(body["data"]["id"].as_i64().unwrap() > 0);
    assert_eq!(body["data"]["title"], "Lemon Drizzle");
    assert_eq!(body["data"]["description"], "Lemon Drizzle description");
    assert_eq!(body["data"]["rating"], 4.5);
    assert_eq!(body["data"]["image"], "https://img.example.com/lemon-drizzle.jpg");
    assert_eq!(body["data"]["is_deleted"], false);
    assert!(body["data"]["deleted_at"].is_null());
}

#[tokio::test]
async fn list_orders_by_rating_then_title() {
    let (app, _) = build_app();
    for (title, rating) in [("A", 4.5), ("B", 5.0), ("C", 4.0), ("Aa", 4.5)] {
        let (status, _) = send(&app, Method::POST, "/cakes", Some(cake(title, rating))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/cakes/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cakes fetched successfully");
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["B", "A", "Aa", "C"]);
}

#[tokio::test]
async fn empty_list_is_an_empty_array() {
    let (app, _) = build_app();
    let (status, body) = send(&app, Method::GET, "/cakes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn get_unknown_or_malformed_id() {
    let (app, _) = build_app();

    let (status, body) = send(&app, Method::GET, "/cakes/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "cake 9999 not found");
    assert!(body.get("data").is_none());

    let (status, body) = send(&app, Method::GET, "/cakes/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "bad request: invalid cake id");
}

#[tokio::test]
async fn update_replaces_mutable_fields() {
    let (app, _) = build_app();
    let (_, created) = send(&app, Method::POST, "/cakes/", Some(cake("Original", 4.0))).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/cakes/{}", id),
        Some(cake("Updated", 4.5)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cake updated successfully");
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["title"], "Updated");

    let (_, fetched) = send(&app, Method::GET, &format!("/cakes/{}", id), None).await;
    assert_eq!(fetched["data"]["title"], "Updated");
    assert_eq!(fetched["data"]["rating"], 4.5);
    assert_eq!(fetched["data"]["created_at"], created["data"]["created_at"]);
}

#[tokio::test]
async fn update_missing_cake_is_not_found() {
    let (app, _) = build_app();
    let (status, body) = send(&app, Method::PUT, "/cakes/9999", Some(cake("Ghost", 3.0))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delete_hides_cake_from_reads() {
    let (app, repo) = build_app();
    let (_, created) = send(&app, Method::POST, "/cakes/", Some(cake("Doomed", 2.0))).await;
    let id = created["data"]["id"].as_i64().unwrap();
    send(&app, Method::POST, "/cakes/", Some(cake("Survivor", 3.0))).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/cakes/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Cake deleted successfully"}));

    let (status, _) = send(&app, Method::GET, &format!("/cakes/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, Method::GET, "/cakes/", None).await;
    let titles: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Survivor"]);

    let rows = repo.rows.lock().await;
    let row = rows.iter().find(|c| c.id == id).expect("row is kept");
    assert!(row.is_deleted);
    assert!(row.deleted_at.is_some());
}

#[tokio::test]
async fn deleted_cake_cannot_be_updated_or_deleted_again() {
    let (app, _) = build_app();
    let (_, created) = send(&app, Method::POST, "/cakes/", Some(cake("Once", 2.0))).await;
    let uri = format!("/cakes/{}", created["data"]["id"]);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::PUT, &uri, Some(cake("Twice", 2.0))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_with_malformed_id_is_bad_request() {
    let (app, _) = build_app();
    let (status, _) = send(&app, Method::DELETE, "/cakes/one", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_payloads_never_reach_the_repository() {
    let (app, repo) = build_app();

    let missing_title = json!({"rating": 4.0, "image": "https://example.com/x.jpg"});
    let (status, body) = send(&app, Method::POST, "/cakes/", Some(missing_title)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "validation failed: title is required");

    let (status, body) = send(&app, Method::POST, "/cakes/", Some(cake("Too good", 11.0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "validation failed: rating must be at most 5");

    let bad_image = json!({"title": "Plain", "rating": 3.0, "image": "plain.jpg"});
    let (status, _) = send(&app, Method::PUT, "/cakes/1", Some(bad_image)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(repo.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (app, repo) = build_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/cakes/")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .expect("request should build");
    let response = app.oneshot(request).await.expect("router should respond");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_body_without_length_is_payload_too_large() {
    let (app, repo) = build_app();
    let big = format!(
        "{{\"title\": \"{}\", \"rating\": 4, \"image\": \"https://example.com/x.jpg\"}}",
        "a".repeat(BODY_LIMIT_BYTES + 1024)
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/cakes/")
        .header("content-type", "application/json")
        .body(Body::from(big))
        .expect("request should build");
    let response = app.oneshot(request).await.expect("router should respond");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let body: Value = serde_json::from_slice(&bytes).expect("body should be JSON");
    assert_eq!(body["success"], false);
    assert_eq!(repo.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn image_url_alias_is_accepted_alongside_null_image() {
    let (app, _) = build_app();
    let payload = json!({
        "title": "Alias",
        "rating": 3.0,
        "image": null,
        "image_url": "https://example.com/alias.jpg"
    });
    let (status, body) = send(&app, Method::POST, "/cakes/", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["image"], "https://example.com/alias.jpg");

    let both = json!({
        "title": "Both",
        "rating": 3.0,
        "image": "https://example.com/image.jpg",
        "image_url": "https://example.com/alias.jpg"
    });
    let (status, body) = send(&app, Method::POST, "/cakes/", Some(both)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["image"], "https://example.com/image.jpg");
}

#[tokio::test]
async fn health_route_responds() {
    let (app, _) = build_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
