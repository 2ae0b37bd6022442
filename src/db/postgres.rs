use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

use super::backend::{DocumentStore, SqlDialect};
use super::sanitize::{clamp_limit, validate_collection_name};
use crate::types::{Document, DocumentId, Filter};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    collection VARCHAR(255) NOT NULL,
    data JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
CREATE INDEX IF NOT EXISTS idx_documents_data ON documents USING GIN(data);
"#;

/// Document store backed by a PostgreSQL connection pool.
pub struct PostgresStore {
  pool: Pool,
}

impl PostgresStore {
  pub fn new(url: &str, max_connections: usize) -> Result<Self, anyhow::Error> {
    let mut cfg = Config::new();
    cfg.url = Some(url.into());
    cfg.manager = Some(ManagerConfig {
      recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(max_connections));
    let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;
    Ok(Self { pool })
  }
}

#[async_trait]
impl DocumentStore for PostgresStore {
  fn dialect(&self) -> SqlDialect {
    SqlDialect::Postgres
  }

  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    self.pool.get().await?.batch_execute(SCHEMA).await?;
    tracing::info!("PostgreSQL schema initialized");
    Ok(())
  }

  async fn insert(
    &self,
    collection: &str,
    data: serde_json::Value,
  ) -> Result<Document, anyhow::Error> {
    validate_collection_name(collection)?;

    let id = DocumentId::generate();
    let id_val = id.as_uuid();
    let now = Utc::now();
    self
      .pool
      .get()
      .await?
      .execute(
        "INSERT INTO documents (id, collection, data, created_at) VALUES ($1, $2, $3, $4)",
        &[&id_val, &collection, &data, &now],
      )
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

    let id_val = id.as_uuid();
    let row = self.pool.get().await?.query_opt(
      "SELECT id, collection, data, created_at, updated_at FROM documents WHERE collection = $1 AND id = $2",
      &[&collection, &id_val],
    ).await?;
    Ok(row.map(|r| row_to_doc(&r)))
  }

  async fn find(
    &self,
    collection: &str,
    filter: &Filter,
    limit: Option<usize>,
  ) -> Result<Vec<Document>, anyhow::Error> {
    validate_collection_name(collection)?;

    let filter_sql = filter.to_sql(SqlDialect::Postgres)?;
    let limit = clamp_limit(limit);

    let mut sql =
      "SELECT id, collection, data, created_at, updated_at FROM documents WHERE collection = $1"
        .to_string();

    if let Some(f) = &filter_sql {
      sql.push_str(" AND ");
      sql.push_str(f);
    }

    if let Some(l) = limit {
      sql.push_str(&format!(" LIMIT {}", l));
    }

    let rows = self.pool.get().await?.query(&sql, &[&collection]).await?;
    Ok(rows.iter().map(row_to_doc).collect())
  }

  async fn list_collections(&self) -> Result<Vec<String>, anyhow::Error> {
    let rows = self
      .pool
      .get()
      .await?
      .query(
        "SELECT DISTINCT collection FROM documents ORDER BY collection",
        &[],
      )
      .await?;
    Ok(rows.iter().map(|r| r.get(0)).collect())
  }
}

#[inline]
fn row_to_doc(r: &tokio_postgres::Row) -> Document {
  Document {
    id: DocumentId::from(r.get::<_, uuid::Uuid>(0)),
    collection: r.get(1),
    data: r.get(2),
    created_at: r.get(3),
    updated_at: r.get(4),
  }
}
