// Life code matrix - HTTP server

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use life_code_matrix::core::ConfigProvider;
use life_code_matrix::utils::error::{ErrorCategory, LifeCodeError};
use life_code_matrix::utils::{logger, validation::Validate};
use life_code_matrix::{AnalysisRequest, EnvConfig, GeminiClient, LifeCodeEngine, TomlConfig};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Path of an optional TOML file; the environment is used when unset.
const CONFIG_PATH_ENV: &str = "LIFE_CODE_CONFIG";

#[derive(Clone)]
struct AppState {
    engine: Arc<LifeCodeEngine<GeminiClient>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    category: String,
    suggestion: String,
}

impl From<&LifeCodeError> for ErrorResponse {
    fn from(e: &LifeCodeError) -> Self {
        Self {
            error: e.user_friendly_message(),
            category: format!("{:?}", e.category()).to_lowercase(),
            suggestion: e.recovery_suggestion(),
        }
    }
}

fn error_status(e: &LifeCodeError) -> StatusCode {
    match e.category() {
        ErrorCategory::Input => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "healthy" })
}

/// POST /api/analyze
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Response {
    match state.engine.run(&request).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            tracing::warn!("❌ Analysis rejected: {} ({:?})", e, e.category());
            (error_status(&e), Json(ErrorResponse::from(&e))).into_response()
        }
    }
}

fn router(engine: LifeCodeEngine<GeminiClient>) -> Router {
    let state = AppState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/analyze", post(analyze))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn build_engine(config: &dyn ConfigProvider) -> anyhow::Result<LifeCodeEngine<GeminiClient>> {
    if !config.narrative_enabled() {
        tracing::info!("Narrative disabled, serving numbers only");
        return Ok(LifeCodeEngine::numeric_only());
    }
    let client = GeminiClient::from_config(config)?;
    Ok(LifeCodeEngine::new(client).with_narrative_budget(config.narrative_budget()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (engine, bind_address) = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            let config = TomlConfig::from_file(&path)?;
            logger::init_service_logger(config.log_level(), config.json_logs());
            tracing::info!("📄 Loaded configuration from {}", path);
            config.validate()?;
            (build_engine(&config)?, config.bind_address().to_string())
        }
        Err(_) => {
            logger::init_service_logger(None, true);
            let config = EnvConfig::from_env()?;
            config.validate()?;
            (build_engine(&config)?, config.bind_address.clone())
        }
    };

    let app = router(engine);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("🚀 Life code server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
