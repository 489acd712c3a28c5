use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::DiagnosisResult;

const REQUIRED_FIELDS: [&str; 2] = ["diagnosis", "recommendations"];

/// Why a completion could not be used as a diagnosis
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid JSON structure: expected an object")]
    NotAnObject,

    #[error("Invalid JSON structure: missing '{0}'")]
    MissingField(&'static str),

    #[error("Invalid JSON content: '{0}' is empty")]
    EmptyField(&'static str),
}

/// Check that completion text is a JSON object with non-empty `diagnosis`
/// and `recommendations`. The object is returned untouched.
pub fn validate(content: &str) -> Result<Map<String, Value>, ContentError> {
    let map = match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => map,
        _ => return Err(ContentError::NotAnObject),
    };

    for field in REQUIRED_FIELDS {
        match map.get(field) {
            None => return Err(ContentError::MissingField(field)),
            Some(value) if is_blank(value) => return Err(ContentError::EmptyField(field)),
            Some(_) => {}
        }
    }

    Ok(map)
}

/// Outcome of checking completion text
#[derive(Debug)]
pub enum ParsedDiagnosis {
    Valid(DiagnosisResult),
    /// The text was unusable; the caller gets [`DiagnosisResult::fallback`]
    Fallback(ContentError),
}

/// Sort completion text into a usable diagnosis or a reason to fall back
pub fn parse_diagnosis(content: &str) -> ParsedDiagnosis {
    match validate(content) {
        Ok(map) => ParsedDiagnosis::Valid(DiagnosisResult::from_map(map)),
        Err(e) => ParsedDiagnosis::Fallback(e),
    }
}

/// Values that carry no usable text: null, "", false, 0, [] and {}
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn is_fallback(content: &str) -> bool {
        matches!(parse_diagnosis(content), ParsedDiagnosis::Fallback(_))
    }

    #[test]
    fn test_valid_object_is_forwarded_unchanged() {
        let content = r#"{"diagnosis": "**Tennis elbow** - overuse", "recommendations": "Rest", "confidence": "high"}"#;
        let ParsedDiagnosis::Valid(result) = parse_diagnosis(content) else {
            panic!("valid content was rejected");
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "diagnosis": "**Tennis elbow** - overuse",
                "recommendations": "Rest",
                "confidence": "high"
            })
        );
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert!(matches!(
            validate("Diagnosis: tennis elbow"),
            Err(ContentError::Parse(_))
        ));
        assert!(is_fallback("Diagnosis: tennis elbow"));
    }

    #[test]
    fn test_non_object_falls_back() {
        assert!(matches!(
            validate(r#"["diagnosis", "recommendations"]"#),
            Err(ContentError::NotAnObject)
        ));
        assert!(is_fallback("\"text\""));
    }

    #[test]
    fn test_missing_recommendations_falls_back() {
        let content = r#"{"diagnosis": "**Bursitis** - swelling"}"#;
        assert!(matches!(
            validate(content),
            Err(ContentError::MissingField("recommendations"))
        ));
        assert!(is_fallback(content));
    }

    #[test]
    fn test_empty_values_fall_back() {
        for content in [
            r#"{"diagnosis": "", "recommendations": "Rest"}"#,
            r#"{"diagnosis": "x", "recommendations": null}"#,
            r#"{"diagnosis": [], "recommendations": "Rest"}"#,
        ] {
            assert!(matches!(validate(content), Err(ContentError::EmptyField(_))));
            assert!(is_fallback(content));
        }
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!(" ")));
        assert!(!is_blank(&json!(["rest"])));
    }
}
