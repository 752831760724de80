//! Main HTTP gateway server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use pantrysnap_inventory::ShoppingPlanner;
use pantrysnap_vision::ImageToJsonTool;

use crate::{health_api, inventory_api, shopping_api};

/// Service name reported by the health and banner endpoints.
pub const SERVICE_NAME: &str = "PantrySnap Inventory API";

/// Uploads above this size are rejected before any processing.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub tool: Arc<ImageToJsonTool>,
    pub planner: Arc<dyn ShoppingPlanner>,
    /// Where uploads are staged before conversion.
    pub staging_dir: PathBuf,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(tool: Arc<ImageToJsonTool>, planner: Arc<dyn ShoppingPlanner>) -> Self {
        Self {
            tool,
            planner,
            staging_dir: std::env::temp_dir(),
            started_at: Instant::now(),
        }
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Build the full route table.
///
/// Every API route is mounted both bare and under `/api`, matching what
/// the frontend sends in dev and deployed configurations.
pub fn build_router(state: GatewayState) -> Router {
    let api = Router::new()
        .route(
            "/process-inventory",
            post(inventory_api::process_inventory),
        )
        .route(
            "/generate-shopping-list",
            post(shopping_api::generate_shopping_list),
        )
        .route("/health", get(health_api::get_health));

    Router::new()
        .route("/", get(health_api::service_info))
        .merge(api.clone())
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the Axum HTTP server.
#[instrument(skip(state))]
pub async fn serve(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    info!("{SERVICE_NAME} listening on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
