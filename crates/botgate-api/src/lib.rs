//! # Botgate HTTP Service
//!
//! HTTP server for receiving Telegram bot webhooks and routing them through
//! the dispatch pipeline.
//!
//! This library provides:
//! - The webhook endpoint backed by [`WebhookReceiver`]
//! - A basic health check endpoint
//! - A 404 default for every other path
//! - Service configuration types with validation



use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use telegram_bot_sdk::client::DEFAULT_API_BASE_URL;
use telegram_bot_sdk::webhook::{WebhookReceiver, WebhookRequest, WebhookResponse};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: ServiceConfig,

    /// Webhook receiver handling authenticated updates
    pub receiver: Arc<WebhookReceiver>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ServiceConfig, receiver: Arc<WebhookReceiver>) -> Self {
        Self { config, receiver }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Webhook endpoint settings
    pub webhook: WebhookConfig,

    /// Bot credentials and API host
    pub bot: BotConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            webhook: WebhookConfig::default(),
            bot: BotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Validate the configuration before the server starts.
    ///
    /// Both secrets must be present up front: the receiver fails closed
    /// without them, so starting anyway would reject every request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an absent secret and
    /// [`ConfigError::Invalid`] for a malformed field value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.token.is_empty() {
            return Err(ConfigError::Missing {
                key: "bot.token".to_string(),
            });
        }
        if self.bot.secret_token.is_empty() {
            return Err(ConfigError::Missing {
                key: "bot.secret_token".to_string(),
            });
        }
        if !self.webhook.endpoint_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhook.endpoint_path must start with '/', got '{}'",
                    self.webhook.endpoint_path
                ),
            });
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

/// Webhook endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook endpoint path
    pub endpoint_path: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/endpoint".to_string(),
        }
    }
}

/// Bot credentials and API host configuration
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Outbound API authentication token
    pub token: String,

    /// Inbound shared secret echoed by the platform on every callback
    pub secret_token: String,

    /// Bot API host, overridable for self-hosted deployments
    pub api_base_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            secret_token: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<REDACTED>")
            .field("secret_token", &"<REDACTED>")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
///
/// The route table is built once and never mutated: the webhook path and the
/// health check are the registered keys, and every other path falls through
/// to the 404 default.
pub fn create_router(state: AppState) -> Router {
    let webhook_routes =
        Router::new().route(&state.config.webhook.endpoint_path, post(handle_webhook));

    let health_routes = Router::new().route("/health", get(handle_health_check));

    Router::new()
        .merge(webhook_routes)
        .merge(health_routes)
        .fallback(handle_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
pub async fn start_server(
    config: ServiceConfig,
    receiver: Arc<WebhookReceiver>,
) -> Result<(), ServiceError> {
    config.validate()?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = std::time::Duration::from_secs(config.server.shutdown_timeout_seconds);

    let state = AppState::new(config, receiver);
    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: address.clone(),
                message: e.to_string(),
            })?;

    info!("Starting HTTP server on {}", address);

    let shutdown_signal = async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
        }
    };

    // In-flight requests complete before shutdown; new connections are
    // refused as soon as the signal arrives.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Request Handlers
// ============================================================================

/// Handle webhook callbacks from the platform.
///
/// Headers and body are handed to the [`WebhookReceiver`] untouched; the
/// receiver's outcome maps onto the HTTP surface here and nowhere else.
#[instrument(skip(state, headers, body))]
async fn handle_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let header_map: HashMap<String, String> = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_lowercase(),
                v.to_str().unwrap_or("").to_string(),
            )
        })
        .collect();

    let request = WebhookRequest::new(header_map, body);
    let outcome = state.receiver.receive(request).await;

    match outcome {
        WebhookResponse::Ok => (StatusCode::OK, "OK").into_response(),
        WebhookResponse::Unauthorized => {
            (StatusCode::FORBIDDEN, "Unauthorized").into_response()
        }
        WebhookResponse::MalformedPayload { message } => (
            StatusCode::BAD_REQUEST,
            format!("Malformed update payload: {message}"),
        )
            .into_response(),
        WebhookResponse::HandlerFailures(failures) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failures)).into_response()
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Basic health check endpoint
#[instrument]
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Default handler for unregistered paths
async fn handle_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

// ============================================================================
// Errors
// ============================================================================

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}
