use axum::{
  extract::{Path, Query, State},
  Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::types::{Document, DocumentId, Filter, PropertyDraft};

/// Collection that holds every property record.
pub const PROPERTY_COLLECTION: &str = "property";

/// Page size applied when the caller does not pass `limit`.
const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  featured: Option<bool>,
  limit: Option<usize>,
}

/// POST /properties - Validate and store a new listing
pub async fn create_property(
  State(state): State<AppState>,
  Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
  let draft = PropertyDraft::from_value(&body)?;
  let doc = state
    .store
    .insert(PROPERTY_COLLECTION, draft.into_document())
    .await?;
  tracing::info!("Property created: {}", doc.id);
  Ok(Json(json!({ "id": doc.id.to_string() })))
}

/// GET /properties - List listings, optionally filtered by featured flag
pub async fn list_properties(
  State(state): State<AppState>,
  Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
  let mut filter = Filter::new();
  if let Some(featured) = params.featured {
    filter = filter.eq("featured", featured);
  }
  let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

  let docs = state
    .store
    .find(PROPERTY_COLLECTION, &filter, Some(limit))
    .await?;
  let items: Vec<Value> = docs.into_iter().map(to_wire).collect();
  Ok(Json(json!({ "items": items })))
}

/// GET /properties/{id} - Fetch a single listing
pub async fn get_property(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
  // An unparseable id cannot match any record
  let id: DocumentId = id.parse().map_err(|_| ApiError::not_found("Not found"))?;

  match state.store.find_one(PROPERTY_COLLECTION, id).await? {
    Some(doc) => Ok(Json(to_wire(doc))),
    None => Err(ApiError::not_found("Not found")),
  }
}

/// Transport shape for a stored listing: payload fields at the top level,
/// the store key exposed as a string `id`, timestamps as ISO-8601 text.
fn to_wire(doc: Document) -> Value {
  let mut out = match doc.data {
    Value::Object(map) => map,
    other => {
      let mut map = serde_json::Map::new();
      map.insert("data".to_string(), other);
      map
    }
  };
  out.insert("id".to_string(), Value::String(doc.id.to_string()));
  out.insert(
    "created_at".to_string(),
    Value::String(doc.created_at.to_rfc3339()),
  );
  if let Some(updated) = doc.updated_at {
    out.insert(
      "updated_at".to_string(),
      Value::String(updated.to_rfc3339()),
    );
  }
  Value::Object(out)
}
