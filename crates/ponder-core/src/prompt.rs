//! Prompt construction and the text of every message the controller writes.
//!
//! The seeded system prompt describes both response shapes the decision
//! parser accepts. Each turn the retained transcript is followed by a
//! transient directive naming the query, the iteration budget and the
//! available tools; the directive is sent to the model but never stored.

use serde_json::json;

use ponder_contracts::{
    error::PonderError,
    execution::IterationState,
    message::Message,
    tool::{Observation, ToolId},
};

/// Built-in system prompt, used unless `LoopConfig::system_prompt` is set.
pub fn default_system_prompt(tools: &[ToolId]) -> String {
    let structured = json!({
        "thought": "why this step helps",
        "action": { "name": "<tool>", "input": "<query for the tool>" }
    });
    let final_answer = json!({
        "thought": "why the gathered context is sufficient",
        "answer": "<final answer>"
    });

    let mut prompt = String::from(
        "You answer questions by alternating Thought, Action and Observation.\n\
         Each turn, either run exactly one tool or give the final answer.\n\
         Tool results are returned to you as Observation messages.\n\n\
         Available tools:\n",
    );
    for tool in tools {
        prompt.push_str(&format!("- {}: {}\n", tool, tool.description()));
    }
    prompt.push_str(&format!(
        "\nRespond with a single JSON object, either\n{structured}\nor\n{final_answer}\n\n\
         If you cannot produce JSON, use lines instead:\n\
         Thought: <reasoning>\n\
         Action: <tool>: <input>\n\
         or\n\
         Answer: <final answer>\n\n\
         Prefer wikipedia for factual queries and fall back to web search when \
         the encyclopedia is incomplete. Combine sources when necessary.\n"
    ));
    prompt
}

/// The transient directive appended to the retained transcript each turn.
pub fn directive(query: &str, tools: &[ToolId], iteration: &IterationState) -> Message {
    let names: Vec<&str> = tools.iter().map(ToolId::as_str).collect();
    let budget = if iteration.remaining() == 0 {
        "No tool calls remain: respond with your final answer now.".to_string()
    } else {
        format!("Tool calls remaining: {}.", iteration.remaining())
    };
    Message::system(format!(
        "Answer the following request as best you can: {query}\n\
         Available tools: {}\n{budget}",
        names.join(", ")
    ))
}

pub fn action_message(tool: ToolId, input: &str, rationale: &str) -> String {
    with_thought(rationale, format!("Action: {tool}: {input}"))
}

pub fn answer_message(answer: &str, rationale: &str) -> String {
    with_thought(rationale, format!("Answer: {answer}"))
}

pub fn observation_message(observation: &Observation) -> String {
    format!("Observation ({}): {}", observation.source, observation.text)
}

pub fn malformed_message(raw_text: &str, reason: &str) -> String {
    format!(
        "Your previous response could not be used ({reason}). \
         It was:\n{raw_text}\n\
         Reply with either an action on one of the available tools or a final answer."
    )
}

pub fn gateway_retry_message(err: &PonderError) -> String {
    format!("The previous model call failed ({err}). Retrying.")
}

/// The answer returned when the gateway keeps failing.
pub fn gateway_failure_answer(err: &PonderError) -> String {
    format!("An error occurred while processing your query: the language model is unavailable ({err}).")
}

/// The degraded answer returned when the iteration bound is reached.
pub fn exhausted_answer(max: u32, observations: &[Observation], include_partial: bool) -> String {
    let mut answer = format!(
        "I apologize, but I couldn't find a definitive answer within the allowed number of iterations ({max})."
    );
    let findings: Vec<&Observation> = observations.iter().filter(|o| !o.failed).collect();
    if include_partial && !findings.is_empty() {
        answer.push_str("\n\nPartial findings:");
        for observation in findings {
            answer.push_str(&format!("\n- {}: {}", observation.source, observation.text));
        }
    }
    answer
}

fn with_thought(rationale: &str, line: String) -> String {
    let rationale = rationale.trim();
    if rationale.is_empty() {
        line
    } else {
        format!("Thought: {rationale}\n{line}")
    }
}
