use crate::config::ServerConfig;
use crate::error::{SignalingError, SignalingResult};
use crate::signaling::{SignalingService, ws_handler};
use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use meshroom_core::RoomId;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub member_count: usize,
}

/// HTTP surface: the signaling socket plus two read-only endpoints.
pub fn router(service: SignalingService, config: &ServerConfig) -> SignalingResult<Router> {
    let origin = if config.cors_origin == "*" {
        AllowOrigin::from(Any)
    } else {
        let value = HeaderValue::from_str(&config.cors_origin)
            .map_err(|_| SignalingError::InvalidOrigin(config.cors_origin.clone()))?;
        AllowOrigin::exact(value)
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST]);

    Ok(Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/rooms/{room_id}", get(room_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service))
}

async fn health() -> &'static str {
    "ok"
}

async fn room_info(
    Path(room_id): Path<String>,
    State(service): State<SignalingService>,
) -> Json<RoomInfo> {
    let room_id = RoomId::from(room_id);
    let member_count = service.rooms().member_count(&room_id);
    Json(RoomInfo {
        room_id,
        member_count,
    })
}

/// Bind and run until ctrl-c.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.resolve_addr().await?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let service = SignalingService::new(&config);
    serve_with(listener, service, &config, shutdown_signal()).await
}

/// Run on an already bound listener until `shutdown` resolves.
pub async fn serve_with<F>(
    listener: TcpListener,
    service: SignalingService,
    config: &ServerConfig,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(service, config)?;
    info!(
        "Signaling server listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server terminated with an error")?;

    info!("Signaling server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
