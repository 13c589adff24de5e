//! HTTP boundary.
//!
//! One route, `GET {path_prefix}/{format}`, with the image parameters in the
//! query string:
//!
//! | Key | Meaning | Example |
//! |---|---|---|
//! | `s` | size, `<w>x<h>` or `<n>` | `s=300x200` |
//! | `b` | background color, 3 or 6 hex digits | `b=2D64DD` |
//! | `c` | text color | `c=FFF` |
//! | `t` | overlay text | `t=Hello+World` |
//! | `x` | scale factor | `x=2` |
//!
//! Validation failures are 400s carrying the resolver's message; synthesis
//! failures are 500s whose details only reach the log.

use crate::config::{ConfigError, CorsConfig, ServerConfig};
use crate::imaging::{ImageBackend, RustBackend, SynthesisError};
use crate::params::{RawParams, ResolveError};
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared handler state. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn ImageBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn ImageBackend>) -> Self {
        Self { backend }
    }

    /// State backed by [`RustBackend`] with the configured font.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(Arc::new(RustBackend::with_font(config.render.font_source())))
    }
}

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Result<Router, ConfigError> {
    let path = format!("{}/{{format}}", config.server.normalized_prefix());
    Ok(Router::new()
        .route(&path, get(render_image))
        .layer(cors_layer(&config.cors)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Translate the `[cors]` section into a `CorsLayer`.
pub fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let origins = if cors.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let values = cors
            .allow_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| {
                    ConfigError::Validation(format!("cors.allow_origins: invalid origin {o:?}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(cors.methods()?))
}

async fn render_image(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let params = RawParams::from_pairs(pairs).resolve(&format)?;
    let backend = Arc::clone(&state.backend);
    let request = params.clone();

    let result = tokio::task::spawn_blocking(move || backend.generate(&request))
        .await
        .map_err(|e| AppError::Internal(format!("render task failed: {e}")))??;

    info!(
        format = %params.format,
        width = params.size.width,
        height = params.size.height,
        scale = params.scale,
        bytes = result.length,
        "served placeholder"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, result.mime_type.to_string()),
            (header::CONTENT_LENGTH, result.length.to_string()),
        ],
        result.bytes,
    )
        .into_response())
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let app = router(AppState::from_config(&config), &config)?;
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    let local = listener.local_addr()?;
    info!(
        address = %local,
        prefix = %config.server.path_prefix,
        "listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            // Without a signal handler the server just runs until killed
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        warn!(error = ?err, "rejected request");
        AppError::BadRequest(err.to_string())
    }
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
