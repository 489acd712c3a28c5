use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Body-part codes sent by the 3D body model, mapped to the anatomical
/// phrasing used in the prompt.
static BODY_PART_MAPPING: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("left_elbow", "left elbow (lateral epicondyle)"),
        ("right_knee", "right knee (patellar region)"),
        ("left_shoulder", "left shoulder (glenohumeral joint)"),
        ("upper_arm", "upper arm (biceps/triceps region)"),
    ])
});

/// Describe a single location code. Unknown codes are echoed back unchanged.
pub fn describe(code: &str) -> &str {
    BODY_PART_MAPPING.get(code).copied().unwrap_or(code)
}

/// Normalize location codes, preserving length and order
pub fn normalize<S: AsRef<str>>(codes: &[S]) -> Vec<String> {
    codes
        .iter()
        .map(|code| describe(code.as_ref()).to_string())
        .collect()
}

/// Comma-separated phrase list as it appears in the prompt
pub fn describe_all<S: AsRef<str>>(codes: &[S]) -> String {
    normalize(codes).join(", ")
}
