//! REST API tests - property CRUD surface, filtering, diagnostics

use axum::body::Body;
use axum::Router;
use hearth::api::{build_router, AppState};
use hearth::db::{DocumentStore, SqliteStore};
use http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app() -> Router {
  let store = SqliteStore::in_memory().await.unwrap();
  store.init_schema().await.unwrap();
  let state = AppState {
    store: Arc::new(store),
    database_name: "hearth_test".to_string(),
  };
  build_router(state, &[])
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
  let resp = app
    .clone()
    .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  (status, read_json(resp).await)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
  let resp = app
    .clone()
    .oneshot(
      Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap(),
    )
    .await
    .unwrap();
  let status = resp.status();
  (status, read_json(resp).await)
}

async fn read_json(resp: axum::response::Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  }
}

fn seaside_villa() -> Value {
  json!({
    "title": "Seaside Villa",
    "price": 450000.0,
    "location": "Malibu",
    "bedrooms": 4,
    "bathrooms": 3,
    "area_sqft": 3200,
    "featured": true
  })
}

// =============================================================================
// Create and fetch
// =============================================================================

#[tokio::test]
async fn test_create_returns_id() {
  let app = test_app().await;

  let (status, body) = post_json(&app, "/properties", seaside_villa()).await;
  assert_eq!(status, StatusCode::OK);

  let id = body["id"].as_str().unwrap();
  assert!(!id.is_empty());
}

#[tokio::test]
async fn test_create_then_fetch_roundtrip() {
  let app = test_app().await;

  let (_, created) = post_json(&app, "/properties", seaside_villa()).await;
  let id = created["id"].as_str().unwrap();

  let (status, body) = get(&app, &format!("/properties/{}", id)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["id"], created["id"]);
  assert_eq!(body["title"], "Seaside Villa");
  assert_eq!(body["price"], 450000.0);
  assert_eq!(body["location"], "Malibu");
  assert_eq!(body["bedrooms"], 4);
  assert_eq!(body["bathrooms"], 3);
  assert_eq!(body["area_sqft"], 3200);
  assert_eq!(body["featured"], true);

  let created_at = body["created_at"].as_str().unwrap();
  assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
  // Never updated, so the field is absent
  assert!(body.get("updated_at").is_none());
}

#[tokio::test]
async fn test_create_applies_featured_default() {
  let app = test_app().await;

  let mut body = seaside_villa();
  body.as_object_mut().unwrap().remove("featured");
  let (_, created) = post_json(&app, "/properties", body).await;
  let id = created["id"].as_str().unwrap();

  let (_, fetched) = get(&app, &format!("/properties/{}", id)).await;
  assert_eq!(fetched["featured"], false);
}

#[tokio::test]
async fn test_create_omits_absent_optionals() {
  let app = test_app().await;

  let (_, created) = post_json(&app, "/properties", seaside_villa()).await;
  let id = created["id"].as_str().unwrap();

  let (_, fetched) = get(&app, &format!("/properties/{}", id)).await;
  assert!(fetched.get("image").is_none());
  assert!(fetched.get("description").is_none());
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_create_rejects_nonpositive_area() {
  let app = test_app().await;

  for area in [json!(0), json!(-5)] {
    let mut body = seaside_villa();
    body["area_sqft"] = area;
    let (status, resp) = post_json(&app, "/properties", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["detail"].as_str().unwrap().contains("area_sqft"));
  }

  // Nothing was persisted
  let (_, listed) = get(&app, "/properties").await;
  assert_eq!(listed["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_rejects_missing_required_field() {
  let app = test_app().await;

  let mut body = seaside_villa();
  body.as_object_mut().unwrap().remove("title");
  let (status, resp) = post_json(&app, "/properties", body).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(resp["detail"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_create_rejects_wrong_field_type() {
  let app = test_app().await;

  let mut body = seaside_villa();
  body["price"] = json!("four hundred");
  let (status, resp) = post_json(&app, "/properties", body).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(resp["detail"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn test_create_rejects_non_object_body() {
  let app = test_app().await;

  let (status, _) = post_json(&app, "/properties", json!([1, 2, 3])).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_empty() {
  let app = test_app().await;

  let (status, body) = get(&app, "/properties").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["items"], json!([]));
}

async fn seed_three(app: &Router) {
  for (title, featured) in [("A", true), ("B", false), ("C", true)] {
    let mut body = seaside_villa();
    body["title"] = json!(title);
    body["featured"] = json!(featured);
    let (status, _) = post_json(app, "/properties", body).await;
    assert_eq!(status, StatusCode::OK);
  }
}

#[tokio::test]
async fn test_list_returns_all_without_filter() {
  let app = test_app().await;
  seed_three(&app).await;

  let (status, body) = get(&app, "/properties").await;
  assert_eq!(status, StatusCode::OK);
  let items = body["items"].as_array().unwrap();
  assert_eq!(items.len(), 3);
  for item in items {
    assert!(item["id"].as_str().is_some());
    assert!(item["created_at"].as_str().is_some());
  }
}

#[tokio::test]
async fn test_list_filters_featured() {
  let app = test_app().await;
  seed_three(&app).await;

  let (_, body) = get(&app, "/properties?featured=true").await;
  let items = body["items"].as_array().unwrap();
  assert_eq!(items.len(), 2);
  assert!(items.iter().all(|i| i["featured"] == json!(true)));

  let (_, body) = get(&app, "/properties?featured=false").await;
  let items = body["items"].as_array().unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0]["title"], "B");
}

#[tokio::test]
async fn test_list_respects_limit() {
  let app = test_app().await;
  seed_three(&app).await;

  let (_, body) = get(&app, "/properties?limit=2").await;
  assert_eq!(body["items"].as_array().unwrap().len(), 2);

  let (_, body) = get(&app, "/properties?limit=0").await;
  assert_eq!(body["items"].as_array().unwrap().len(), 0);

  let (_, body) = get(&app, "/properties?limit=100").await;
  assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_combines_filter_and_limit() {
  let app = test_app().await;
  seed_three(&app).await;

  let (_, body) = get(&app, "/properties?featured=true&limit=1").await;
  let items = body["items"].as_array().unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0]["featured"], json!(true));
}

#[tokio::test]
async fn test_list_rejects_malformed_params() {
  let app = test_app().await;

  let (status, _) = get(&app, "/properties?featured=banana").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = get(&app, "/properties?limit=-1").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Lookup failures
// =============================================================================

#[tokio::test]
async fn test_get_unparseable_id_is_not_found() {
  let app = test_app().await;

  let (status, body) = get(&app, "/properties/not-a-valid-id").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["detail"], "Not found");
}

#[tokio::test]
async fn test_get_absent_id_is_not_found() {
  let app = test_app().await;

  let id = uuid::Uuid::new_v4();
  let (status, body) = get(&app, &format!("/properties/{}", id)).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["detail"], "Not found");
}

// =============================================================================
// Diagnostics
// =============================================================================

#[tokio::test]
async fn test_root_banner() {
  let app = test_app().await;

  let (status, body) = get(&app, "/").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Hearth API running");
}

#[tokio::test]
async fn test_connection_diagnostics() {
  let app = test_app().await;
  let (_, created) = post_json(&app, "/properties", seaside_villa()).await;
  assert!(created["id"].is_string());

  let (status, body) = get(&app, "/test").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["backend"], "sqlite");
  assert_eq!(body["database"], "connected");
  assert_eq!(body["connection_status"], "ok");
  assert_eq!(body["database_name"], "hearth_test");
  assert!(body["database_url"].is_boolean());
  assert!(body["collections"]
    .as_array()
    .unwrap()
    .contains(&json!("property")));
}

#[tokio::test]
async fn test_probes() {
  let app = test_app().await;

  let (status, _) = get(&app, "/health").await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = get(&app, "/ready").await;
  assert_eq!(status, StatusCode::OK);
}
