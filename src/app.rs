use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DEFAULT_LOG_FILTER};
use crate::error::AppError;
use crate::openrouter::{CompletionClient, OpenRouterClient};
use crate::routes::create_routes;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(config: Config, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// State backed by the real OpenRouter client
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = OpenRouterClient::new()?;
        Ok(Self::new(config, Arc::new(client)))
    }
}

/// Initialize tracing and logging for the application
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Create and configure the Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    info!("Initializing application router");

    create_routes()
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Render a panic in a handler as a regular `Server error` response
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(outcome = "panic", "Request handler panicked: {}", details);

    AppError::from(details).into_response()
}
