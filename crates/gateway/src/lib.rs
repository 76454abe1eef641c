//! HTTP API gateway for IntentGate.
//!
//! Exposes `POST /command`, which charges the caller's daily quota and then
//! classifies the prompt, plus `GET /` and `GET /health` for monitoring.
//!
//! Built on Axum for high performance async HTTP.

pub mod client;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use intentgate_classifier::Classifier;
use intentgate_config::AppConfig;
use intentgate_core::{ActionKind, QuotaError};
use intentgate_quota::{QuotaTracker, UsageInfo};

pub use client::ClientIdentity;

/// Request bodies above this size are rejected before any handler runs.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub classifier: Classifier,
    pub quota: QuotaTracker,
    pub daily_limit: u32,
}

impl GatewayState {
    pub fn new(classifier: Classifier, daily_limit: u32) -> Self {
        Self {
            classifier,
            quota: QuotaTracker::new(),
            daily_limit,
        }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - HTTP trace logging
/// - CORS restricted to `cors`'s origin list
/// - Request body size limit (1 MB)
pub fn build_router(state: SharedState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/command", post(command_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
}

/// CORS policy for the dashboard origins; credentials allowed.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// With `rules_only`, the configured inference delegate is ignored and every
/// command goes through the rule table. An invalid `config` is rejected
/// before anything is bound.
pub async fn start(config: AppConfig, rules_only: bool) -> intentgate_core::Result<()> {
    config.validate().map_err(|e| intentgate_core::Error::Config {
        message: e.to_string(),
    })?;

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let delegate = if rules_only {
        None
    } else {
        intentgate_providers::build_from_config(&config)
    };
    let classifier = Classifier::from_delegate(
        delegate,
        Duration::from_secs(config.inference.timeout_secs),
    );
    info!(
        mode = classifier.mode_name(),
        daily_limit = config.daily_limit,
        "Classifier ready"
    );

    let state = Arc::new(GatewayState::new(classifier, config.daily_limit));
    let app = build_router(state, cors_layer(&config.gateway.allowed_origins));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
    status: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        name: "IntentGate",
        version: env!("CARGO_PKG_VERSION"),
        status: "healthy",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct CommandRequest {
    prompt: String,
}

/// `None` fields serialize as `null`; all four keys are always present.
#[derive(Debug, Serialize)]
struct CommandResponse {
    action: ActionKind,
    params: Option<serde_json::Value>,
    rate_limit: Option<UsageInfo>,
    error: Option<String>,
}

/// 429 with `{"error": "LIMIT_EXCEEDED", "limit": N}`.
struct LimitExceeded(QuotaError);

#[derive(Serialize)]
struct LimitExceededBody {
    error: &'static str,
    limit: u32,
}

impl IntoResponse for LimitExceeded {
    fn into_response(self) -> Response {
        let QuotaError::Exceeded { limit } = self.0;
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(LimitExceededBody {
                error: "LIMIT_EXCEEDED",
                limit,
            }),
        )
            .into_response()
    }
}

async fn command_handler(
    State(state): State<SharedState>,
    client: ClientIdentity,
    Json(payload): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, LimitExceeded> {
    let request_id = Uuid::new_v4();
    let today = chrono::Local::now().date_naive();

    let usage = state
        .quota
        .try_consume(client.as_str(), state.daily_limit, today)
        .map_err(|e| {
            warn!(request_id = %request_id, client = %client, error = %e, "Command rejected");
            LimitExceeded(e)
        })?;

    let action = state.classifier.resolve(&payload.prompt).await;
    let kind = action.kind();

    info!(
        request_id = %request_id,
        client = %client,
        action = %kind,
        used = usage.used,
        remaining = usage.remaining,
        "Command classified"
    );
    if kind.is_destructive() {
        warn!(request_id = %request_id, client = %client, action = %kind, "Destructive action requested");
    }

    Ok(Json(CommandResponse {
        action: kind,
        params: action.params(),
        rate_limit: Some(usage),
        error: action.error().map(String::from),
    }))
}
