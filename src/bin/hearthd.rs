use clap::Parser;
use hearth::api::ApiServer;
use hearth::db::{DocumentStore, PostgresStore, SqliteStore};
use hearth::server::{ServiceConfig, StoreBackend};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "hearthd", about = "Hearth property listing server", version)]
struct Args {
  /// PostgreSQL connection string; selects the postgres backend
  #[arg(long, env = "DATABASE_URL")]
  db_url: Option<String>,
  /// Logical database name reported by diagnostics
  #[arg(long, env = "DATABASE_NAME")]
  db_name: Option<String>,
  /// SQLite database path; selects the sqlite backend
  #[arg(long, env = "HEARTH_SQLITE_PATH")]
  sqlite: Option<String>,
  #[arg(short, long)]
  port: Option<u16>,
  #[arg(long)]
  host: Option<String>,
  #[arg(short, long)]
  config: Option<String>,
  #[arg(long)]
  log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
  let args = Args::parse();

  // Load config: explicit path > auto-detect > defaults
  let mut config = if let Some(path) = &args.config {
    ServiceConfig::from_file(path)?
  } else {
    ServiceConfig::find_and_load()?.unwrap_or_default()
  };

  // CLI args override config file
  if let Some(url) = args.db_url {
    config.postgres.url = url;
    config.backend = StoreBackend::Postgres;
  }
  if let Some(path) = args.sqlite {
    config.sqlite.path = path;
    config.backend = StoreBackend::Sqlite;
  }
  if let Some(name) = args.db_name {
    config.database_name = name;
  }
  if let Some(port) = args.port {
    config.server.port = port;
  }
  if let Some(host) = args.host {
    config.server.host = host;
  }
  if let Some(level) = args.log_level {
    config.logging.level = level;
  }

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let store: Arc<dyn DocumentStore> = match config.backend {
    StoreBackend::Postgres => Arc::new(PostgresStore::new(
      &config.postgres.url,
      config.postgres.max_connections,
    )?),
    StoreBackend::Sqlite => Arc::new(SqliteStore::new(&config.sqlite.path).await?),
  };

  store.init_schema().await?;

  // Handle shutdown signals (SIGINT, SIGTERM)
  let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
  tokio::spawn(async move {
    shutdown_signal().await;
    let _ = shutdown_tx.send(());
  });

  ApiServer::new(store, config, shutdown_rx).run().await
}

async fn shutdown_signal() {
  let ctrl_c = async {
    tokio::signal::ctrl_c()
      .await
      .expect("Failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
      .expect("Failed to install SIGTERM handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => tracing::info!("Received SIGINT"),
    _ = terminate => tracing::info!("Received SIGTERM"),
  }
}
