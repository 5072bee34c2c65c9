//! Koinfo Web Server
//!
//! Axum-based REST API for the Koinfo personal finance tracker.
//!
//! Every mutating endpoint runs one serialized load → mutate → save cycle on
//! the shared [`Ledger`]. Errors come back as `{"error": "..."}` with a status
//! code picked from the core error kind.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use koinfo_core::Ledger;

mod handlers;

/// Maximum accepted JSON body size (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Environment variable listing allowed CORS origins (comma-separated)
pub const ALLOWED_ORIGINS_ENV: &str = "KOINFO_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from the environment
    pub fn from_env() -> Self {
        let origins = std::env::var(ALLOWED_ORIGINS_ENV).unwrap_or_default();
        Self {
            allowed_origins: parse_origins(&origins),
        }
    }
}

/// Parse a comma-separated list of origins, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shared application state
pub struct AppState {
    pub ledger: Ledger,
}

/// Delete response
#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Read a JSON request body, rejecting oversized or malformed payloads
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request<Body>) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// Create the application router
pub fn create_router(ledger: Ledger, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { ledger });

    let api_routes = Router::new()
        // Whole dataset
        .route("/data", get(handlers::get_data))
        .route("/open_balance", put(handlers::update_open_balance))
        .route("/reset_data", post(handlers::reset_data))
        // Categories
        .route("/category", post(handlers::create_category))
        .route(
            "/category/:id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        // Debts
        .route("/debt", post(handlers::create_debt))
        .route(
            "/debt/:id",
            put(handlers::update_debt).delete(handlers::delete_debt),
        )
        // Goals
        .route("/goal", post(handlers::create_goal))
        .route(
            "/goal/:id",
            put(handlers::update_goal).delete(handlers::delete_goal),
        )
        // Transactions
        .route("/transaction", post(handlers::create_transaction))
        .route(
            "/transaction/:id",
            put(handlers::update_transaction).delete(handlers::delete_transaction),
        );

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        warn!(origins = ?config.allowed_origins, "Allowing cross-origin requests");
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    // CSP: scripts and data from this origin only, inline styles allowed for the UI
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve the front-end bundle if a directory is provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    ledger: Ledger,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    info!("Data file: {}", ledger.location());

    let app = create_router(ledger, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }
}

/// Status code for errors the client caused; `None` for internal failures
fn client_status(err: &koinfo_core::Error) -> Option<StatusCode> {
    use koinfo_core::Error;

    match err {
        Error::Validation(_) | Error::InvalidCategory(_) => Some(StatusCode::BAD_REQUEST),
        Error::NotFound(_) => Some(StatusCode::NOT_FOUND),
        Error::DuplicateName { .. } | Error::LinkedEntity(_) => Some(StatusCode::CONFLICT),
        Error::Io(_) | Error::Json(_) | Error::Storage(_) => None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        if let Some(status) = err
            .downcast_ref::<koinfo_core::Error>()
            .and_then(client_status)
        {
            return Self {
                status,
                message: err.to_string(),
                internal: None,
            };
        }
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
