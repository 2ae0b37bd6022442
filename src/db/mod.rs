mod backend;
mod postgres;
pub mod sanitize;
mod sqlite;

pub use backend::{DocumentStore, SqlDialect};
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
