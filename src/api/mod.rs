mod error;
mod properties;
mod status;

pub use error::ApiError;
pub use properties::PROPERTY_COLLECTION;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::db::DocumentStore;
use crate::server::ServiceConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn DocumentStore>,
  pub database_name: String,
}

/// Assemble the application router against the given state.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
  // Build CORS layer based on config
  let cors = if cors_origins.is_empty() || cors_origins.iter().any(|o| o == "*") {
    CorsLayer::permissive()
  } else {
    let origins: Vec<_> = cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
      .allow_origin(origins)
      .allow_methods(Any)
      .allow_headers(Any)
  };

  Router::new()
    .route("/", get(status::root))
    .route("/test", get(status::connection_test))
    // Health endpoints for k8s probes
    .route("/health", get(status::health_check))
    .route("/ready", get(status::readiness_check))
    .route(
      "/properties",
      get(properties::list_properties).post(properties::create_property),
    )
    .route("/properties/{id}", get(properties::get_property))
    .layer(cors)
    .with_state(state)
}

/// REST server: binds the configured address, serves until the shutdown
/// channel fires, then drains.
pub struct ApiServer {
  store: Arc<dyn DocumentStore>,
  config: ServiceConfig,
  shutdown_rx: broadcast::Receiver<()>,
}

impl ApiServer {
  pub fn new(
    store: Arc<dyn DocumentStore>,
    config: ServiceConfig,
    shutdown_rx: broadcast::Receiver<()>,
  ) -> Self {
    Self {
      store,
      config,
      shutdown_rx,
    }
  }

  pub async fn run(mut self) -> Result<(), anyhow::Error> {
    let state = AppState {
      store: self.store,
      database_name: self.config.database_name.clone(),
    };
    let app = build_router(state, &self.config.server.cors_origins);

    let addr = self.config.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Hearth API at http://{}", addr);

    axum::serve(listener, app.into_make_service())
      .with_graceful_shutdown(async move {
        let _ = self.shutdown_rx.recv().await;
        tracing::info!("API server shutting down");
      })
      .await?;
    Ok(())
  }
}
