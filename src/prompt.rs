//! Prompt rendering for the diagnosis request.
//!
//! The instructions, worked examples and output contract below decide the
//! shape of what the model sends back, so `validation` depends on them.

use crate::models::PatientDetails;

const ROLE_PREAMBLE: &str = r#"
You are a board-certified physician with expertise in clinical diagnosis, tasked with providing a precise, evidence-based diagnosis for a patient. Based on the following patient information, provide the single most probable diagnosis along with a detailed explanation of your clinical reasoning and actionable recommendations for the patient.
"#;

const INSTRUCTIONS: &str = r#"
### Instructions:
1. **Analyze All Inputs Thoroughly**:
   - Carefully evaluate every piece of information provided: pain locations, type, duration, severity, additional symptoms, extra details, medical history, age, gender, and follow-up answer.
   - Ensure anatomical accuracy for the specified pain locations. For example:
     - Pain in the "right knee (patellar region)" should focus on knee-specific conditions like patellar tendinitis, not unrelated areas like the hip.
     - Pain in the "left shoulder (glenohumeral joint)" should focus on shoulder-specific conditions like rotator cuff tendinitis, not lower arm issues.
   - Use pain type to differentiate conditions (e.g., sharp pain may indicate an acute injury like a tear, while dull pain may suggest chronic inflammation).
   - Assess duration to determine chronicity (e.g., pain for weeks may indicate a chronic condition like osteoarthritis).
   - Evaluate severity to gauge urgency (e.g., severity 8-10 with fever may suggest an infection requiring immediate attention).
   - Incorporate additional symptoms and extra details to refine the diagnosis (e.g., swelling may indicate inflammation, fever may suggest infection).
   - Use medical history to identify risk factors (e.g., previous injuries may suggest a recurrent issue).
   - Consider age and gender to adjust likelihood (e.g., osteoarthritis is more common in older adults, fibromyalgia is more prevalent in females).
   - Use the follow-up answer to narrow down causes (e.g., pain worsening with movement suggests a musculoskeletal issue like a strain).

2. **Provide the Most Probable Diagnosis**:
   - Identify the single most likely diagnosis based on the provided information.
   - Do not provide a differential diagnosis with multiple options; focus only on the most probable condition.
   - Ensure the diagnosis is clinically plausible and aligns with the anatomical location and symptoms.

3. **Explain Clinical Reasoning**:
   - Provide a detailed explanation of your reasoning, referencing specific patient inputs.
   - Example: "The patient presents with sharp pain in the right knee (patellar region) for 3 days, with a severity of 7 and swelling. The pain worsens with movement, suggesting a musculoskeletal issue. Given the location and symptoms, the most likely diagnosis is **patellar tendinitis**, likely due to overuse or acute stress on the patellar tendon."
   - Highlight any red flags (e.g., "The presence of fever alongside high-severity pain raises concern for a possible infection, warranting urgent evaluation.").

4. **Provide Actionable Recommendations**:
   - Offer clear, safe, and practical recommendations for the patient, suitable for non-medical individuals.
   - Tailor recommendations to the severity of the condition (e.g., for high severity, recommend seeking medical attention; for low severity, suggest home care like rest or ice).
   - Include specific steps (e.g., "Apply ice for 15 minutes every 2 hours to reduce swelling") and general advice (e.g., "Avoid activities that exacerbate the pain, such as running").
   - If red flags are present, emphasize the need for professional evaluation (e.g., "Due to the high severity and fever, seek immediate medical attention to rule out infection.").
"#;

const TRAINING_EXAMPLES: &str = r#"
5. **Training Examples**:
   - **Example 1 (Acute Injury)**:
     - Input: Sharp pain in the right knee (patellar region) for 3 days, severity 7, swelling present, age 25, gender male, pain worsens with movement, no medical history.
     - Output:
       - Diagnosis: "**Patellar tendinitis** - The patient presents with sharp pain in the patellar region for 3 days, with a severity of 7 and swelling. The pain worsens with movement, indicating a likely musculoskeletal injury. Given the location and symptoms, patellar tendinitis is the most probable diagnosis, likely due to overuse or acute stress on the patellar tendon."
       - Recommendations: "Rest the knee and avoid activities like running or jumping. Apply ice for 15 minutes every 2 hours to reduce swelling. If pain persists beyond a week or worsens, consult a healthcare provider for further evaluation."
   - **Example 2 (Chronic Condition)**:
     - Input: Dull pain in the left shoulder (glenohumeral joint) for 2 months, severity 4, stiffness present, age 60, gender female, history of arthritis, pain worsens with movement.
     - Output:
       - Diagnosis: "**Shoulder osteoarthritis** - The patient presents with dull pain in the left shoulder for 2 months, with a severity of 4 and stiffness. The pain worsens with movement, and the patient has a history of arthritis. Given the age, chronicity, and symptoms, shoulder osteoarthritis is the most likely diagnosis, affecting the glenohumeral joint."
       - Recommendations: "Apply heat to the shoulder for 15 minutes daily to reduce stiffness. Perform gentle range-of-motion exercises, avoiding painful movements. Consult a physician for possible imaging or anti-inflammatory medication if symptoms persist."
   - **Example 3 (Systemic Issue)**:
     - Input: Aching pain in multiple locations (left shoulder, right knee) for 6 weeks, severity 5, fatigue present, age 40, gender female, no medical history, pain unchanged with movement.
     - Output:
       - Diagnosis: "**Fibromyalgia** - The patient presents with aching pain in multiple locations (left shoulder and right knee) for 6 weeks, with a severity of 5 and fatigue. The pain does not change with movement, suggesting a non-musculoskeletal etiology. Given the widespread pain, fatigue, age, and gender, fibromyalgia is the most likely diagnosis, a chronic condition often seen in females in this age group."
       - Recommendations: "Maintain a regular sleep schedule and reduce stress through relaxation techniques. Consider gentle exercise like walking or yoga to improve symptoms. Consult a rheumatologist for a comprehensive evaluation and possible medication to manage fibromyalgia."
   - **Example 4 (Red Flag Case)**:
     - Input: Severe pain in the upper arm (biceps/triceps region) for 2 days, severity 9, fever present, age 35, gender male, history of recent trauma, pain worsens with movement.
     - Output:
       - Diagnosis: "**Possible deep tissue infection (cellulitis or abscess)** - The patient presents with severe pain in the upper arm for 2 days, with a severity of 9 and fever. The pain worsens with movement, and there is a history of recent trauma. The combination of high severity, fever, and trauma raises concern for a deep tissue infection such as cellulitis or an abscess, which requires urgent evaluation."
       - Recommendations: "Seek immediate medical attention at an emergency department to rule out infection. Do not delay, as fever and severe pain may indicate a serious condition requiring antibiotics or surgical intervention. Avoid using the arm until evaluated by a healthcare provider."
"#;

const OUTPUT_FORMAT: &str = r#"
### Output Format:
Return your response in the following JSON format:
{
  "diagnosis": "**Condition** - Detailed clinical reasoning referencing specific patient inputs.",
  "recommendations": "Specific, safe steps for the patient to follow, tailored to the severity and condition."
}
Ensure the condition name in the diagnosis is wrapped in ** markers (e.g., **Patellar tendinitis**) to indicate it should be highlighted in the frontend. The response must be concise yet detailed, professional, and suitable for a non-medical audience.
"#;

/// Render the patient information block
fn patient_section(body_parts: &str, patient: &PatientDetails) -> String {
    format!(
        "
### Patient Information:
- Pain locations: {}
- Pain type: {}
- Duration: {}
- Severity (1-10): {}
- Additional symptoms: {}
- Extra details: {}
- Medical history: {}
- Age: {}
- Gender: {}
- Does the pain worsen with movement?: {}
",
        body_parts,
        patient.pain_type,
        patient.duration,
        patient.severity,
        patient.additional,
        patient.extra_details,
        patient.medical_history,
        patient.age,
        patient.gender,
        patient.follow_up_answer,
    )
}

/// Compose the full prompt for an already-joined body-part string
pub fn compose(body_parts: &str, patient: &PatientDetails) -> String {
    [
        ROLE_PREAMBLE,
        &patient_section(body_parts, patient),
        INSTRUCTIONS,
        TRAINING_EXAMPLES,
        OUTPUT_FORMAT,
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body_parts;
    use crate::models::DiagnosisRequest;
    use serde_json::json;

    fn patient(body: serde_json::Value) -> PatientDetails {
        DiagnosisRequest::from_value(body)
            .unwrap()
            .into_patient()
            .unwrap()
    }

    fn compose_for(patient: &PatientDetails) -> String {
        compose(&body_parts::describe_all(&patient.locations), patient)
    }

    #[test]
    fn test_embeds_normalized_inputs() {
        let details = patient(json!({
            "locations": ["left_elbow"],
            "painType": "sharp",
            "severity": 7
        }));
        let prompt = compose_for(&details);
        assert!(prompt.contains("- Pain locations: left elbow (lateral epicondyle)\n"));
        assert!(prompt.contains("- Pain type: sharp\n"));
        assert!(prompt.contains("- Severity (1-10): 7\n"));
        assert!(prompt.contains("- Duration: unknown\n"));
        assert!(prompt.contains("- Does the pain worsen with movement?: unspecified\n"));
    }

    #[test]
    fn test_joins_multiple_locations() {
        let details = patient(json!({ "locations": ["right_knee", "ankle"] }));
        let prompt = compose_for(&details);
        assert!(prompt.contains("- Pain locations: right knee (patellar region), ankle\n"));
    }

    #[test]
    fn test_contains_all_worked_examples() {
        let prompt = compose_for(&patient(json!({ "locations": [] })));
        for marker in [
            "**Example 1 (Acute Injury)**",
            "**Example 2 (Chronic Condition)**",
            "**Example 3 (Systemic Issue)**",
            "**Example 4 (Red Flag Case)**",
        ] {
            assert!(prompt.contains(marker), "missing {}", marker);
        }
    }

    #[test]
    fn test_output_contract_is_present() {
        let prompt = compose_for(&patient(json!({ "locations": ["upper_arm"] })));
        assert!(prompt.contains("\"diagnosis\": \"**Condition**"));
        assert!(prompt.contains("\"recommendations\":"));
        assert!(prompt.contains("wrapped in ** markers"));
        // sections are rendered in a fixed order
        let info = prompt.find("### Patient Information:").unwrap();
        let instructions = prompt.find("### Instructions:").unwrap();
        let format = prompt.find("### Output Format:").unwrap();
        assert!(info < instructions && instructions < format);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let details = patient(json!({ "locations": ["left_shoulder"], "age": 60 }));
        assert_eq!(compose_for(&details), compose_for(&details));
    }
}
