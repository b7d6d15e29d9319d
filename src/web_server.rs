use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    routing::{get, post},
    serve, Json, Router,
};
use chrono::Utc;
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::prompt::render_system_prompt;
use crate::upstream::{build_completion_request, CompletionClient};
use crate::wire::{ChatRequest, ChatResponse, HealthResponse};

// Base64 images travel inline in the JSON body.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    config: Arc<RelayConfig>,
    catalog: Arc<Catalog>,
    system_prompt: Arc<str>,
    completions: CompletionClient,
}

impl AppState {
    /// Renders the system prompt once for the process lifetime.
    pub fn new(config: RelayConfig, catalog: Catalog) -> Result<Self> {
        let system_prompt = render_system_prompt(&catalog)?;
        let completions =
            CompletionClient::new(&config).context("Failed to initialize HTTP client")?;
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            system_prompt: Arc::from(system_prompt),
            completions,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let Json(request) = payload.map_err(|e| RelayError::MalformedBody(e.body_text()))?;
    if request.is_empty() {
        return Err(RelayError::Validation);
    }

    let completion = build_completion_request(
        &state.config,
        &state.system_prompt,
        request.text(),
        request.image(),
    );
    debug!(
        model = %completion.model,
        has_image = request.image().is_some(),
        "Relaying chat request"
    );

    let reply = state.completions.complete(&completion).await?;

    Ok(Json(ChatResponse {
        reply,
        timestamp: Utc::now(),
    }))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        products: state.catalog.len(),
        timestamp: Utc::now(),
    })
}

/// Builds the relay router: `POST /api/chat` and `GET /api/health`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http()) // Add request logging
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
}

pub async fn start_web_server(config: RelayConfig) -> Result<()> {
    let catalog = Catalog::load_or_empty(&config.catalog_path);
    let port = config.port;
    let state = AppState::new(config, catalog)?;
    let product_count = state.catalog().len();

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Loaded {} products", product_count);

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, initiating shutdown...");
}
