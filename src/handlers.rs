use crate::app::AppState;
use crate::body_parts;
use crate::error::{AppError, AppResult, sanitize_upstream};
use crate::models::{DiagnosisRequest, DiagnosisResult, HealthResponse};
use crate::openrouter::UpstreamError;
use crate::prompt;
use crate::validation::{self, ParsedDiagnosis};
use axum::{
    body::Bytes,
    extract::{Json, State},
    http::{HeaderMap, header},
    response::Json as ResponseJson,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Health check handler
/// Returns the service status and health information
pub async fn health_check() -> AppResult<ResponseJson<HealthResponse>> {
    debug!("Health check endpoint called");

    let response = HealthResponse::ok();

    info!("Health check successful");
    Ok(ResponseJson(response))
}

/// Diagnosis handler
/// Turns the patient's symptoms into a prompt, asks the completions API and
/// relays the parsed diagnosis and recommendations.
///
/// Every way out of this handler logs exactly one event carrying an `outcome` field.
pub async fn diagnose_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<ResponseJson<DiagnosisResult>> {
    let Some(api_key) = state.config.openrouter_api_key.as_ref() else {
        error!(
            outcome = "missing_credential",
            "OPENROUTER_API_KEY is not set"
        );
        return Err(AppError::MissingCredential);
    };

    let body = read_body(&headers, &body).inspect_err(|e| {
        error!(outcome = "unreadable_body", "Could not read request body: {}", e.message());
    })?;

    let patient = DiagnosisRequest::from_value(body)
        .and_then(DiagnosisRequest::into_patient)
        .inspect_err(|e| {
            warn!(outcome = "invalid_request", "Invalid request data: {}", e.message());
        })?;

    let body_parts = body_parts::describe_all(&patient.locations);
    debug!(body_parts = %body_parts, "Processing diagnosis");

    let prompt = prompt::compose(&body_parts, &patient);

    let content = state
        .client
        .complete(api_key, &prompt)
        .await
        .map_err(|e| {
            let outcome = match &e {
                UpstreamError::Status { .. } => "upstream_status",
                UpstreamError::Empty => "upstream_empty",
                UpstreamError::Transport(_) | UpstreamError::Decode(_) => "upstream_error",
            };
            error!(
                outcome,
                body_parts = %body_parts,
                "OpenRouter API call failed: {}",
                sanitize_upstream(&e.to_string())
            );
            AppError::from(e)
        })?;

    debug!(content = %sanitize_upstream(&content), "API response");

    let result = match validation::parse_diagnosis(&content) {
        ParsedDiagnosis::Valid(result) => {
            info!(
                outcome = "diagnosed",
                body_parts = %body_parts,
                condition = result.condition().unwrap_or("-"),
                "Diagnosis ready"
            );
            result
        }
        ParsedDiagnosis::Fallback(e) => {
            warn!(
                outcome = "fallback",
                body_parts = %body_parts,
                content = %sanitize_upstream(&content),
                "Upstream content rejected: {}",
                e
            );
            DiagnosisResult::fallback()
        }
    };
    Ok(ResponseJson(result))
}

/// An empty body is a request without `locations`. Anything else has to be
/// JSON sent as JSON.
fn read_body(headers: &HeaderMap, body: &Bytes) -> AppResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    if !is_json_content_type(headers) {
        return Err(AppError::Internal(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }
    Json::<Value>::from_bytes(body)
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Internal(rejection.body_text()))
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}
