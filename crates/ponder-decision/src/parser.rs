//! [`ResponseParser`]: the tolerant [`DecisionParser`] implementation.

use ponder_contracts::{Decision, ToolId};
use ponder_core::traits::DecisionParser;
use serde_json::{Map, Value};
use tracing::debug;

use crate::fence::strip_fences;
use crate::lines::{parse_lines, LineDirective};
use crate::schema;

const INPUT_KEYS: [&str; 3] = ["input", "query", "action_input"];
const RATIONALE_KEYS: [&str; 3] = ["reason", "thought", "rationale"];
const ANSWER_KEYS: [&str; 2] = ["answer", "final_answer"];

const EMPTY_ANSWER: &str = "final answer is empty";

/// Turns raw model text into a [`Decision`].
///
/// Parsing runs in three stages:
///
/// 1. Strip code fences and language tags.
/// 2. Structured shape: a JSON object with `action` and/or `answer`
///    (`final_answer` is accepted as an alias). The object may be embedded in
///    surrounding prose. It is validated against
///    [`schema::decision_schema`] before interpretation. A non-null `action`
///    wins over `answer`.
/// 3. Line-oriented shape: `Thought:` / `Action:` / `Answer:` lines.
///
/// Anything else becomes [`Decision::Malformed`]. Parsing never fails.
#[derive(Debug, Clone)]
pub struct ResponseParser {
    line_fallback: bool,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self { line_fallback: true }
    }

    /// Disable the line-oriented stage; only structured replies are accepted.
    pub fn structured_only() -> Self {
        Self { line_fallback: false }
    }

    // ── Structured shape ────────────────────────────────────────────────────

    /// `None` when the body holds no JSON object carrying a directive key,
    /// or when the object is embedded in text that has directive lines of
    /// its own (`Action: web_search: {"answer": 42}`).
    fn parse_structured(&self, body: &str, available: &[ToolId]) -> Option<Decision> {
        let (value, outside) = extract_object(body)?;
        if outside.is_some_and(|text| parse_lines(&text).is_some()) {
            return None;
        }
        let map = value.as_object()?;

        if !["action", "answer", "final_answer"].iter().any(|k| map.contains_key(*k)) {
            return None;
        }

        let found = schema::violations(&value);
        if !found.is_empty() {
            return Some(Decision::malformed(
                body,
                format!("response does not match the decision schema: {}", found.join("; ")),
            ));
        }

        let rationale = text_field(map, &RATIONALE_KEYS);

        if let Some(action) = non_null(map, "action") {
            return Some(match structured_action(action, map, rationale, available) {
                Ok(decision) => decision,
                Err(reason) => Decision::malformed(body, reason),
            });
        }

        let answer = text_field(map, &ANSWER_KEYS);
        let answered = ANSWER_KEYS.iter().any(|k| non_null(map, k).is_some());
        Some(match answer {
            answer if !answer.is_empty() => Decision::FinalAnswer { answer, rationale },
            _ if answered => Decision::malformed(body, EMPTY_ANSWER),
            _ if map.get("stop").and_then(Value::as_bool) == Some(false) => Decision::malformed(
                body,
                "response sets stop to false without choosing an action",
            ),
            _ => Decision::malformed(body, "response carries neither an action nor an answer"),
        })
    }

    // ── Line-oriented shape ─────────────────────────────────────────────────

    fn parse_line_oriented(&self, body: &str, available: &[ToolId]) -> Option<Decision> {
        let decision = match parse_lines(body)? {
            LineDirective::Action { tool, input, thought } => match resolve_tool(&tool, available) {
                Ok(tool) => Decision::Action {
                    tool,
                    input,
                    rationale: thought,
                },
                Err(reason) => Decision::malformed(body, reason),
            },
            LineDirective::Answer { answer, .. } if answer.is_empty() => {
                Decision::malformed(body, EMPTY_ANSWER)
            }
            LineDirective::Answer { answer, thought } => Decision::FinalAnswer {
                answer,
                rationale: thought,
            },
        };
        Some(decision)
    }
}

impl DecisionParser for ResponseParser {
    fn parse(&self, raw: &str, available: &[ToolId]) -> Decision {
        let body = strip_fences(raw);
        if body.is_empty() {
            return Decision::malformed(raw, "response is empty");
        }

        if let Some(decision) = self.parse_structured(body, available) {
            debug!(shape = "structured", malformed = decision.is_malformed(), "response parsed");
            return decision;
        }

        if self.line_fallback {
            if let Some(decision) = self.parse_line_oriented(body, available) {
                debug!(shape = "lines", malformed = decision.is_malformed(), "response parsed");
                return decision;
            }
        }

        debug!("response matched no known shape");
        Decision::malformed(
            raw,
            "response matched neither the structured nor the line-oriented shape",
        )
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn structured_action(
    action: &Value,
    top: &Map<String, Value>,
    rationale: String,
    available: &[ToolId],
) -> Result<Decision, String> {
    let (name, input, rationale) = match action {
        Value::String(text) => {
            let (name, input) = text.split_once(':').unwrap_or((text.as_str(), ""));
            (name.trim().to_string(), input.trim().to_string(), rationale)
        }
        Value::Object(obj) => {
            let name = obj
                .get("name")
                .or_else(|| obj.get("tool"))
                .and_then(Value::as_str)
                .ok_or_else(|| "action does not name a tool".to_string())?;
            let own_rationale = text_field(obj, &RATIONALE_KEYS);
            let rationale = if own_rationale.is_empty() {
                rationale
            } else {
                own_rationale
            };
            (name.trim().to_string(), text_field(obj, &INPUT_KEYS), rationale)
        }
        other => return Err(format!("action must be an object or a string, got {other}")),
    };

    let input = if input.is_empty() {
        text_field(top, &INPUT_KEYS)
    } else {
        input
    };

    Ok(Decision::Action {
        tool: resolve_tool(&name, available)?,
        input,
        rationale,
    })
}

fn resolve_tool(name: &str, available: &[ToolId]) -> Result<ToolId, String> {
    let listing = || {
        available
            .iter()
            .map(ToolId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let tool: ToolId = name
        .parse()
        .map_err(|_| format!("unknown tool '{name}'; available tools: {}", listing()))?;

    if !available.contains(&tool) {
        return Err(format!(
            "tool '{tool}' is not available; available tools: {}",
            listing()
        ));
    }
    Ok(tool)
}

/// Find a JSON object in `body`: the whole body, a JSON string holding an
/// object, or the span from the first `{` to the last `}`. For an embedded
/// span the surrounding text is returned alongside.
fn extract_object(body: &str) -> Option<(Value, Option<String>)> {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => return Some((value, None)),
        Ok(Value::String(inner)) => {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(inner.trim()) {
                return Some((value, None));
            }
        }
        _ => {}
    }

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&body[start..=end]) {
        Ok(value @ Value::Object(_)) => {
            let outside = format!("{}{}", &body[..start], &body[end + 1..]);
            Some((value, Some(outside)))
        }
        _ => None,
    }
}

fn non_null<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

/// First non-empty text among `keys`, or an empty string.
fn text_field(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| non_null(map, k))
        .map(scalar_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}
