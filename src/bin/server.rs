//! REST API server for card number checking.
//!
//! # Usage
//!
//! ```bash
//! # Start server
//! bincheck-server
//!
//! # With custom port and a local directory mock
//! bincheck-server --port 8080 --directory-url http://localhost:9000
//! ```
//!
//! A batch is answered only when every candidate is done. If the client
//! disconnects first, the handler future is dropped and no further lookups
//! are made for that batch.
//!
//! # Swagger UI
//!
//! Visit http://localhost:3000/swagger-ui/ for interactive API documentation.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use bincheck::directory::{
    BinlistClient, BinlistConfig, LookupOutcome, MemoryDirectory, DEFAULT_BASE_URL,
};
use bincheck::number::BinPrefix;
use bincheck::report::ItemError;
use bincheck::{
    BatchChecker, BatchResponse, BinDirectory, BinMetadata, CheckerConfig, RequestError,
    ValidationResult,
};

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BIN Check API",
        version = "0.1.0",
        description = "Luhn validation and BIN lookup for card-like numbers. Numbers are never stored and never returned unmasked. No auth or caller rate limiting.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Check", description = "Checksum and BIN lookup"),
        (name = "System", description = "Health and status endpoints")
    ),
    paths(check_post, check_get, health),
    components(schemas(
        CheckRequest,
        BatchResponse,
        ValidationResult,
        BinMetadata,
        ItemError,
        ErrorResponse,
        HealthResponse,
    ))
)]
struct ApiDoc;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Parser)]
#[command(name = "bincheck-server", version, about = "BIN check REST API")]
struct ServerArgs {
    /// Port to listen on
    #[arg(long, env = "BINCHECK_PORT", default_value = "3000")]
    port: u16,

    /// BIN directory base URL
    #[arg(long, env = "BINCHECK_DIRECTORY_URL", default_value = DEFAULT_BASE_URL)]
    directory_url: String,

    /// Lookup timeout in milliseconds
    #[arg(long, env = "BINCHECK_TIMEOUT_MS", default_value = "5000")]
    timeout_ms: u64,

    /// Pause between numbers in milliseconds
    #[arg(long, env = "BINCHECK_PACING_MS", default_value = "80")]
    pacing_ms: u64,

    /// Serve lookups from a JSON directory file instead of the network
    #[arg(long, value_name = "FILE")]
    offline: Option<PathBuf>,
}

/// Directory selected at startup.
enum Directory {
    Remote(BinlistClient),
    Offline(MemoryDirectory),
}

impl BinDirectory for Directory {
    async fn lookup(&self, prefix: &BinPrefix) -> LookupOutcome {
        match self {
            Self::Remote(client) => client.lookup(prefix).await,
            Self::Offline(directory) => directory.lookup(prefix).await,
        }
    }
}

type AppState = Arc<BatchChecker<Directory>>;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"values": ["4111 1111 1111 1111", "5500-0000-0000-0004"]}))]
struct CheckRequest {
    /// Card numbers to check, at most 20. Strings may contain spaces or dashes; numbers are accepted too.
    /// When empty or missing, the `values`/`value` query parameters are used instead.
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    values: Vec<serde_json::Value>,
}

#[derive(Deserialize, IntoParams)]
struct CheckQuery {
    /// Comma-separated card numbers
    values: Option<String>,
    /// Single card number (alias)
    value: Option<String>,
}

impl CheckQuery {
    /// `values` wins unless it is blank, then `value` is used.
    fn candidates(self) -> Vec<String> {
        let raw = self
            .values
            .filter(|s| !s.trim().is_empty())
            .or(self.value)
            .unwrap_or_default();
        split_query(&raw)
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    /// Always false
    ok: bool,
    /// Stable error code: EMPTY_INPUT, TOO_MANY_ITEMS or MALFORMED_ITEM
    code: String,
    /// Human-readable error message
    message: String,
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// API version
    version: String,
}

/// Request-shape rejection rendered as a 400.
struct ApiError(RequestError);

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(code = self.0.code(), "request rejected");
        let body = ErrorResponse {
            ok: false,
            code: self.0.code().to_string(),
            message: self.0.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Check card numbers from a JSON body
#[utoipa::path(
    post,
    path = "/check",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Per-number results in input order", body = BatchResponse),
        (status = 400, description = "Empty, oversized or malformed request", body = ErrorResponse)
    ),
    params(CheckQuery),
    tag = "Check"
)]
async fn check_post(
    State(checker): State<AppState>,
    Query(query): Query<CheckQuery>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    // An unreadable body is treated as no input.
    let values = match body {
        Ok(Json(req)) => req.values,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable check body");
            Vec::new()
        }
    };
    // Without body values the query string is used, as for GET.
    let candidates = if values.is_empty() {
        query.candidates()
    } else {
        candidates_from_json(values)?
    };
    Ok(Json(checker.check_all(&candidates).await?))
}

/// Check card numbers from the query string
#[utoipa::path(
    get,
    path = "/check",
    params(CheckQuery),
    responses(
        (status = 200, description = "Per-number results in input order", body = BatchResponse),
        (status = 400, description = "Empty or oversized request", body = ErrorResponse)
    ),
    tag = "Check"
)]
async fn check_get(
    State(checker): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<BatchResponse>, ApiError> {
    Ok(Json(checker.check_all(&query.candidates()).await?))
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Accepts strings as-is and numbers in their decimal form.
fn candidates_from_json(values: Vec<serde_json::Value>) -> Result<Vec<String>, RequestError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            _ => Err(RequestError::MalformedItem { index }),
        })
        .collect()
}

fn split_query(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Main
// ============================================================================

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/check", get(check_get).post(check_post))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = ServerArgs::parse();

    let directory = match &args.offline {
        Some(path) => {
            tracing::info!(file = %path.display(), "Using offline BIN directory");
            Directory::Offline(MemoryDirectory::from_file(path)?)
        }
        None => {
            tracing::info!(directory = %args.directory_url, "Using remote BIN directory");
            Directory::Remote(BinlistClient::with_config(
                BinlistConfig::default()
                    .base_url(args.directory_url.clone())
                    .timeout(Duration::from_millis(args.timeout_ms)),
            )?)
        }
    };
    let checker = BatchChecker::with_config(
        directory,
        CheckerConfig::default().pacing(Duration::from_millis(args.pacing_ms)),
    );

    let app = router(Arc::new(checker));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}:{}/swagger-ui/", "localhost", args.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
