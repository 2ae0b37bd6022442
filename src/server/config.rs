use serde::{Deserialize, Serialize};
use std::path::Path;

/// Expand environment variables in a string.
/// Supports $VAR_NAME and ${VAR_NAME} syntax.
fn expand_env_vars(input: &str) -> String {
  let mut result = input.to_string();

  // Handle ${VAR_NAME} syntax first (more specific)
  while let Some(start) = result.find("${") {
    if let Some(end) = result[start..].find('}') {
      let var_name = &result[start + 2..start + end];
      let value = std::env::var(var_name).unwrap_or_default();
      result = format!(
        "{}{}{}",
        &result[..start],
        value,
        &result[start + end + 1..]
      );
    } else {
      break;
    }
  }

  // Handle $VAR_NAME syntax (word boundary: alphanumeric + underscore).
  // The scan walks bytes, so `i` can land inside a multi-byte character;
  // only slice once the byte test puts `i` on a '$', which in valid UTF-8
  // is always a char boundary.
  let mut i = 0;
  while i < result.len() {
    if result.as_bytes()[i] == b'$' && result.as_bytes().get(i + 1) != Some(&b'{') {
      let rest = &result[i + 1..];
      let var_len = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .count();
      if var_len > 0 {
        let var_name = &rest[..var_len];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..i], value, &rest[var_len..]);
        i += value.len();
        continue;
      }
    }
    i += 1;
  }

  result
}

/// Which persistence backend the service runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
  #[default]
  Sqlite,
  Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
  #[serde(default)]
  pub server: ServerSection,
  #[serde(default)]
  pub backend: StoreBackend,
  /// Logical database name reported by the diagnostics endpoint.
  #[serde(default = "default_database_name")]
  pub database_name: String,
  #[serde(default)]
  pub postgres: PostgresSection,
  #[serde(default)]
  pub sqlite: SqliteSection,
  #[serde(default)]
  pub logging: LoggingSection,
}

fn default_database_name() -> String {
  "hearth".into()
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      server: ServerSection::default(),
      backend: StoreBackend::default(),
      database_name: default_database_name(),
      postgres: PostgresSection::default(),
      sqlite: SqliteSection::default(),
      logging: LoggingSection::default(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
  /// CORS allowed origins for browser clients.
  /// Use ["*"] for permissive mode, or specify origins like ["http://localhost:3000"]
  #[serde(default)]
  pub cors_origins: Vec<String>,
}

fn default_host() -> String {
  "0.0.0.0".into()
}
fn default_port() -> u16 {
  8000
}

impl Default for ServerSection {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
      cors_origins: vec!["*".to_string()],
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSection {
  #[serde(default = "default_pg_url")]
  pub url: String,
  #[serde(default = "default_max_conn")]
  pub max_connections: usize,
}
fn default_pg_url() -> String {
  "postgres://localhost/hearth".into()
}
fn default_max_conn() -> usize {
  20
}
impl Default for PostgresSection {
  fn default() -> Self {
    Self {
      url: default_pg_url(),
      max_connections: default_max_conn(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSection {
  #[serde(default = "default_sqlite_path")]
  pub path: String,
}
fn default_sqlite_path() -> String {
  "hearth.db".into()
}
impl Default for SqliteSection {
  fn default() -> Self {
    Self {
      path: default_sqlite_path(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
  #[serde(default = "default_level")]
  pub level: String,
}
fn default_level() -> String {
  "info".into()
}
impl Default for LoggingSection {
  fn default() -> Self {
    Self {
      level: default_level(),
    }
  }
}

impl ServiceConfig {
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
    let content = std::fs::read_to_string(&path)?;
    let expanded = expand_env_vars(&content);
    Ok(serde_yaml::from_str(&expanded)?)
  }

  pub fn find_and_load() -> Result<Option<Self>, anyhow::Error> {
    for p in ["hearth.yaml", "hearth.yml"] {
      if Path::new(p).exists() {
        tracing::info!("Loading config from {}", p);
        return Ok(Some(Self::from_file(p)?));
      }
    }
    Ok(None)
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.server.host, self.server.port)
  }
}
