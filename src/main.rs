use axum::{
  extract::{State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use grid_snake_backend::app::config::ServerConfig;
use grid_snake_backend::hub::SessionHub;
use grid_snake_backend::transport::ws_session::handle_socket;

#[derive(Debug, Serialize)]
struct OkResponse {
  ok: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = ServerConfig::from_env()?;
  tracing::info!(
    width = config.board_width,
    height = config.board_height,
    tick_rate = config.tick_rate,
    foods = config.food_count,
    seed = config.seed,
    "starting game"
  );

  let hub = Arc::new(SessionHub::new(&config));
  let (shutdown_tx, shutdown_rx) = watch::channel(false);
  let tick_loop = {
    let hub = Arc::clone(&hub);
    tokio::spawn(async move { hub.run(shutdown_rx).await })
  };

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/api/stats", get(stats))
    .route("/api/ws", get(ws_handler))
    .layer(cors)
    .with_state(hub);

  let address = format!("0.0.0.0:{}", config.port);
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  let _ = shutdown_tx.send(true);
  tick_loop.await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(error) = tokio::signal::ctrl_c().await {
    tracing::error!(?error, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("received ctrl-c, shutting down");
}

async fn health() -> impl IntoResponse {
  Json(OkResponse { ok: true })
}

async fn stats(State(hub): State<Arc<SessionHub>>) -> impl IntoResponse {
  Json(hub.stats().await)
}

async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<Arc<SessionHub>>) -> impl IntoResponse {
  ws.on_upgrade(move |socket| handle_socket(socket, hub))
}
