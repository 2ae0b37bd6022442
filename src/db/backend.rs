use async_trait::async_trait;

use crate::types::{Document, DocumentId, Filter};

/// SQL dialect for filter compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
  Postgres,
  Sqlite,
}

impl SqlDialect {
  /// Generate SQL for accessing a JSON string field
  pub fn json_text(&self, field: &str) -> String {
    match self {
      Self::Postgres => format!("data->>'{}'", field),
      Self::Sqlite => format!("json_extract(data, '$.{}')", field),
    }
  }

  /// Generate SQL for accessing a JSON numeric field
  pub fn json_numeric(&self, field: &str) -> String {
    match self {
      Self::Postgres => format!("(data->>'{}')::numeric", field),
      Self::Sqlite => format!("CAST(json_extract(data, '$.{}') AS REAL)", field),
    }
  }

  /// Generate SQL for accessing a JSON boolean field
  pub fn json_bool(&self, field: &str) -> String {
    match self {
      Self::Postgres => format!("(data->>'{}')::boolean", field),
      Self::Sqlite => format!("json_extract(data, '$.{}')", field),
    }
  }

  /// Backend flavor as reported by the diagnostics endpoint.
  pub fn name(&self) -> &'static str {
    match self {
      Self::Postgres => "postgres",
      Self::Sqlite => "sqlite",
    }
  }
}

/// Abstract document store: schemaless JSON records grouped into named
/// collections, keyed by store-assigned ids.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  fn dialect(&self) -> SqlDialect;

  async fn init_schema(&self) -> Result<(), anyhow::Error>;

  /// Insert a record, assigning its id and creation timestamp.
  async fn insert(
    &self,
    collection: &str,
    data: serde_json::Value,
  ) -> Result<Document, anyhow::Error>;

  /// Fetch a single record, `None` when the id is absent from the
  /// collection.
  async fn find_one(
    &self,
    collection: &str,
    id: DocumentId,
  ) -> Result<Option<Document>, anyhow::Error>;

  /// Fetch records matching the filter, capped at `limit` when given.
  /// Result order is whatever the backend yields; callers must not rely
  /// on it.
  async fn find(
    &self,
    collection: &str,
    filter: &Filter,
    limit: Option<usize>,
  ) -> Result<Vec<Document>, anyhow::Error>;

  /// Names of collections that currently hold at least one record.
  async fn list_collections(&self) -> Result<Vec<String>, anyhow::Error>;
}
