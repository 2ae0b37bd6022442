use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;

use super::backend::{DocumentStore, SqlDialect};
use super::sanitize::{clamp_limit, validate_collection_name};
use crate::types::{Document, DocumentId, Filter};

const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA cache_size = -64000;
PRAGMA temp_store = MEMORY;
"#;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    collection TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
) WITHOUT ROWID;
CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
"#;

/// Document store backed by a local SQLite file (or `:memory:`).
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  pub async fn new(path: &str) -> Result<Self, anyhow::Error> {
    let conn = if path == ":memory:" {
      Connection::open_in_memory().await?
    } else {
      Connection::open(path).await?
    };

    // Apply performance pragmas
    conn
      .call(|conn| conn.execute_batch(PRAGMAS).map_err(|e| e.into()))
      .await?;

    Ok(Self { conn })
  }

  pub async fn in_memory() -> Result<Self, anyhow::Error> {
    Self::new(":memory:").await
  }
}

#[async_trait]
impl DocumentStore for SqliteStore {
  fn dialect(&self) -> SqlDialect {
    SqlDialect::Sqlite
  }

  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    self
      .conn
      .call(|conn| conn.execute_batch(SCHEMA).map_err(|e| e.into()))
      .await?;
    tracing::info!("SQLite schema initialized");
    Ok(())
  }

  async fn insert(
    &self,
    collection: &str,
    data: serde_json::Value,
  ) -> Result<Document, anyhow::Error> {
    validate_collection_name(collection)?;

    let id = DocumentId::generate();
    let now = Utc::now();
    let data_str = serde_json::to_string(&data)?;
    let now_str = now.to_rfc3339();
    let col = collection.to_string();
    let id_str = id.to_string();

    self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO documents (id, collection, data, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id_str, col, data_str, now_str],
          )
          .map_err(|e| e.into())
      })
      .await?;

    Ok(Document {
      id,
      collection: collection.into(),
      data,
      created_at: now,
      updated_at: None,
    })
  }

  async fn find_one(
    &self,
    collection: &str,
    id: DocumentId,
  ) -> Result<Option<Document>, anyhow::Error> {
    validate_collection_name(collection)?;

    let col = collection.to_string();
    let id_str = id.to_string();

    self.conn.call(move |conn| {
      let mut stmt = conn.prepare_cached("SELECT id, collection, data, created_at, updated_at FROM documents WHERE collection = ?1 AND id = ?2")?;
      let mut rows = stmt.query(params![col, id_str])?;
      if let Some(row) = rows.next()? {
        Ok(Some(row_to_doc(row)?))
      } else {
        Ok(None)
      }
    }).await.map_err(|e| anyhow::anyhow!("{}", e))
  }

  async fn find(
    &self,
    collection: &str,
    filter: &Filter,
    limit: Option<usize>,
  ) -> Result<Vec<Document>, anyhow::Error> {
    validate_collection_name(collection)?;

    let filter_sql = filter.to_sql(SqlDialect::Sqlite)?;
    let limit = clamp_limit(limit);

    let col = collection.to_string();
    let mut sql = String::with_capacity(256);
    sql.push_str(
      "SELECT id, collection, data, created_at, updated_at FROM documents WHERE collection = ?1",
    );

    if let Some(f) = &filter_sql {
      sql.push_str(" AND ");
      sql.push_str(f);
    }

    if let Some(l) = limit {
      sql.push_str(&format!(" LIMIT {}", l));
    }

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![col])?;
        let mut docs = Vec::new();
        while let Some(row) = rows.next()? {
          docs.push(row_to_doc(row)?);
        }
        Ok(docs)
      })
      .await
      .map_err(|e| anyhow::anyhow!("{}", e))
  }

  async fn list_collections(&self) -> Result<Vec<String>, anyhow::Error> {
    self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare_cached("SELECT DISTINCT collection FROM documents ORDER BY collection")?;
        let mut rows = stmt.query([])?;
        let mut cols = Vec::new();
        while let Some(row) = rows.next()? {
          cols.push(row.get(0)?);
        }
        Ok(cols)
      })
      .await
      .map_err(|e| anyhow::anyhow!("{}", e))
  }
}

#[inline]
fn row_to_doc(row: &rusqlite::Row) -> Result<Document, rusqlite::Error> {
  let id_str: String = row.get(0)?;
  let data_str: String = row.get(2)?;
  let created_str: String = row.get(3)?;
  let updated_str: Option<String> = row.get(4)?;

  Ok(Document {
    id: id_str.parse().map_err(|e| text_conversion_err(0, e))?,
    collection: row.get(1)?,
    data: serde_json::from_str(&data_str).map_err(|e| text_conversion_err(2, e))?,
    created_at: parse_timestamp(&created_str).map_err(|e| text_conversion_err(3, e))?,
    updated_at: updated_str
      .as_deref()
      .map(parse_timestamp)
      .transpose()
      .map_err(|e| text_conversion_err(4, e))?,
  })
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
  DateTime::parse_from_rfc3339(s).map(|d| d.with_timezone(&Utc))
}

fn text_conversion_err(
  idx: usize,
  e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
  rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}
