use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

const UNSPECIFIED: &str = "unspecified";
const UNKNOWN: &str = "unknown";
const NONE: &str = "none";
const DEFAULT_SEVERITY: &str = "1";

const FALLBACK_DIAGNOSIS: &str = "Unable to parse diagnosis due to an internal error.";
const FALLBACK_RECOMMENDATIONS: &str =
    "Please consult a healthcare professional for personalized advice.";

/// Request payload for the diagnose endpoint, as sent by the browser client
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRequest {
    pub locations: Option<Value>,
    pub pain_type: Option<Value>,
    pub duration: Option<Value>,
    pub severity: Option<Value>,
    pub additional: Option<Value>,
    pub extra_details: Option<Value>,
    pub medical_history: Option<Value>,
    pub age: Option<Value>,
    pub gender: Option<Value>,
    pub follow_up_answer: Option<Value>,
}

/// Typed patient information with every default already applied
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDetails {
    pub locations: Vec<String>,
    pub pain_type: String,
    pub duration: String,
    pub severity: String,
    pub additional: String,
    pub extra_details: String,
    pub medical_history: String,
    pub age: String,
    pub gender: String,
    pub follow_up_answer: String,
}

impl DiagnosisRequest {
    /// Parses a raw JSON body. Anything that isn't a JSON object is treated
    /// as a request without `locations`.
    pub fn from_value(value: Value) -> AppResult<Self> {
        if !value.is_object() {
            return Err(missing_locations());
        }
        serde_json::from_value(value).map_err(|e| AppError::InvalidRequest(e.to_string()))
    }

    pub fn into_patient(self) -> AppResult<PatientDetails> {
        let locations = match self.locations {
            None | Some(Value::Null) => return Err(missing_locations()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(code) => Ok(code),
                    _ => Err(invalid_locations()),
                })
                .collect::<AppResult<Vec<_>>>()?,
            Some(_) => return Err(invalid_locations()),
        };

        Ok(PatientDetails {
            locations,
            pain_type: text_or(self.pain_type, UNSPECIFIED),
            duration: text_or(self.duration, UNKNOWN),
            severity: text_or(self.severity, DEFAULT_SEVERITY),
            additional: text_or(self.additional, NONE),
            extra_details: text_or(self.extra_details, NONE),
            medical_history: text_or(self.medical_history, NONE),
            age: text_or(self.age, UNSPECIFIED),
            gender: text_or(self.gender, UNSPECIFIED),
            follow_up_answer: text_or(self.follow_up_answer, UNSPECIFIED),
        })
    }
}

fn missing_locations() -> AppError {
    AppError::InvalidRequest("'locations' is required".to_string())
}

fn invalid_locations() -> AppError {
    AppError::InvalidRequest("'locations' must be a list of strings".to_string())
}

/// Renders an optional field for the prompt; strings are used verbatim,
/// other JSON values in their compact JSON form.
fn text_or(value: Option<Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

/// Successful diagnosis payload. Holds the upstream object as-is so extra
/// keys survive the round trip to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiagnosisResult(Map<String, Value>);

impl DiagnosisResult {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The safe generic answer returned when upstream output can't be used
    pub fn fallback() -> Self {
        let mut map = Map::new();
        map.insert(
            "diagnosis".to_string(),
            Value::String(FALLBACK_DIAGNOSIS.to_string()),
        );
        map.insert(
            "recommendations".to_string(),
            Value::String(FALLBACK_RECOMMENDATIONS.to_string()),
        );
        Self(map)
    }

    pub fn diagnosis(&self) -> Option<&str> {
        self.0.get("diagnosis").and_then(Value::as_str)
    }

    /// Condition name wrapped in `**` markers inside the diagnosis text
    pub fn condition(&self) -> Option<&str> {
        let diagnosis = self.diagnosis()?;
        let start = diagnosis.find("**")? + 2;
        let len = diagnosis[start..].find("**")?;
        Some(&diagnosis[start..start + len]).filter(|c| !c.is_empty())
    }
}

/// Response payload for the health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Service is healthy".to_string(),
        }
    }
}
