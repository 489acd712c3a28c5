use rs_diagnosis_svc::app::{AppState, create_app, init_tracing};
use rs_diagnosis_svc::config::Config;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // .env is optional; real deployments set the variables directly
    let _ = dotenvy::dotenv();

    // Initialize tracing/logging
    init_tracing();

    info!("Starting RS Diagnosis Service...");

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);
    if !config.has_api_key() {
        warn!("OPENROUTER_API_KEY is not set; /diagnose will answer 500 until it is");
    }

    let state = match AppState::from_config(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    // Create the application
    let app = create_app(state);

    // Create TCP listener
    let listener = match tokio::net::TcpListener::bind(&config.bind_address()).await {
        Ok(listener) => {
            info!("Server running on {}", config.server_url());
            info!("Health check: GET /health");
            info!("Diagnosis endpoint: POST /diagnose");
            listener
        }
        Err(e) => {
            error!("Failed to bind to {}: {}", config.bind_address(), e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Server starting...");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    } else {
        info!("Server shutdown gracefully");
    }
}
