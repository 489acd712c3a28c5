use secrecy::Secret;
use std::env;
use tracing::warn;

const DEFAULT_PORT: u16 = 5001;

/// Tracing filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "rs_diagnosis_svc=info,tower_http=debug,axum::rejection=info";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Credential for the completions API. Absence is reported per request, not at boot.
    pub openrouter_api_key: Option<Secret<String>>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORT '{}' is not a valid port, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            openrouter_api_key: lookup("OPENROUTER_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .map(Secret::new),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn has_api_key(&self) -> bool {
        self.openrouter_api_key.is_some()
    }
}
