//! JSON Schema for the structured decision shape.

use serde_json::{json, Value};
use tracing::warn;

/// Schema every structured decision must satisfy.
///
/// `action` may be an object naming a tool or a `"tool: input"` string.
/// `answer` and `final_answer` accept any scalar; numbers and booleans are
/// rendered to text by the parser.
pub fn decision_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "action": {
                "type": ["object", "string", "null"],
                "properties": {
                    "name": { "type": "string" },
                    "tool": { "type": "string" },
                    "input": { "type": ["string", "number", "boolean", "null"] },
                    "query": { "type": ["string", "number", "boolean", "null"] },
                    "reason": { "type": ["string", "null"] },
                    "thought": { "type": ["string", "null"] }
                },
                "anyOf": [
                    { "required": ["name"] },
                    { "required": ["tool"] },
                    { "type": ["string", "null"] }
                ]
            },
            "answer": { "type": ["string", "number", "boolean", "null"] },
            "final_answer": { "type": ["string", "number", "boolean", "null"] },
            "thought": { "type": ["string", "null"] },
            "reason": { "type": ["string", "null"] },
            "stop": { "type": ["boolean", "null"] }
        },
        "anyOf": [
            { "required": ["action"] },
            { "required": ["answer"] },
            { "required": ["final_answer"] }
        ]
    })
}

/// Validate `value` against [`decision_schema`], returning one message per
/// violation. An empty vector means the value conforms.
pub fn violations(value: &Value) -> Vec<String> {
    let schema = decision_schema();
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "decision schema failed to compile; skipping validation");
            return Vec::new();
        }
    };

    validator
        .iter_errors(value)
        .map(|error| format!("{} (at '{}')", error, error.instance_path))
        .collect()
}
