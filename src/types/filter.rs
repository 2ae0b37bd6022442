use serde_json::Value;

use crate::db::sanitize::{escape_string, validate_field_name};
use crate::db::SqlDialect;

/// Conjunction of field-equality conditions, the query shape the document
/// store understands. An empty filter matches every document.
///
/// Conditions are compiled to a SQL fragment per backend dialect; field
/// names are validated and string values escaped before anything is
/// rendered into query text.
#[derive(Debug, Clone, Default)]
pub struct Filter {
  conditions: Vec<(String, Value)>,
}

impl Filter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an equality condition on a top-level field.
  pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
    self.conditions.push((field.into(), value.into()));
    self
  }

  pub fn is_empty(&self) -> bool {
    self.conditions.is_empty()
  }

  /// Compiles the filter to a SQL fragment, `None` when there are no
  /// conditions.
  pub fn to_sql(&self, dialect: SqlDialect) -> Result<Option<String>, anyhow::Error> {
    if self.conditions.is_empty() {
      return Ok(None);
    }

    let parts = self
      .conditions
      .iter()
      .map(|(field, value)| condition_sql(dialect, field, value))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(parts.join(" AND ")))
  }
}

/// Generate SQL for a single equality condition.
fn condition_sql(dialect: SqlDialect, field: &str, value: &Value) -> Result<String, anyhow::Error> {
  validate_field_name(field)?;

  match value {
    Value::Null => Ok(format!("{} IS NULL", dialect.json_text(field))),
    Value::Bool(b) => Ok(format!(
      "{} = {}",
      dialect.json_bool(field),
      if *b { "true" } else { "false" }
    )),
    Value::Number(n) => Ok(format!("{} = {}", dialect.json_numeric(field), n)),
    Value::String(s) => {
      let escaped = escape_string(s)?;
      Ok(format!("{} = '{}'", dialect.json_text(field), escaped))
    }
    _ => Err(anyhow::anyhow!(
      "unsupported value type for equality comparison on '{}'",
      field
    )),
  }
}
