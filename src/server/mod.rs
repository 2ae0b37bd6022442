mod config;

pub use config::{
  LoggingSection, PostgresSection, ServerSection, ServiceConfig, SqliteSection, StoreBackend,
};
