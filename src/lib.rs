pub mod app;
pub mod body_parts;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openrouter;
pub mod prompt;
pub mod routes;
pub mod validation;

// Re-export key functions for convenience
pub use app::{AppState, create_app, init_tracing};
