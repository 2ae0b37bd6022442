use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Store-assigned key for a document.
///
/// Serializes as its string form so it can travel through URLs and JSON
/// bodies. Parsing is fallible; callers treat a failed parse as "no such
/// document" rather than an internal fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
  pub fn generate() -> Self {
    Self(Uuid::new_v4())
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl From<Uuid> for DocumentId {
  fn from(id: Uuid) -> Self {
    Self(id)
  }
}

impl fmt::Display for DocumentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Error parsing a [`DocumentId`] from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid document id")]
pub struct ParseDocumentIdError;

impl FromStr for DocumentId {
  type Err = ParseDocumentIdError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s).map(Self).map_err(|_| ParseDocumentIdError)
  }
}

/// A stored record: schemaless JSON payload plus the metadata the store
/// maintains for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub id: DocumentId,
  pub collection: String,
  pub data: serde_json::Value,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}
