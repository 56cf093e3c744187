//! Scenario 1: Capital Lookup
//!
//! The happy path. The model asks the encyclopedia, reads the observation
//! and answers in the structured JSON shape.
//!
//!   1. Model: `{"action": {"name": "wikipedia", "input": "Paris"}}`
//!   2. Encyclopedia returns the Paris article
//!   3. Model: `{"answer": "Paris"}`
//!
//! The seeded transcript ends with five messages: system prompt, question,
//! action, observation, answer.

use serde_json::json;

use ponder_config::PonderConfig;
use ponder_contracts::{error::PonderResult, execution::RunReport};

use crate::gateway::ScriptedGateway;

use super::{harness, print_report, print_trace, print_transcript};

pub const QUESTION: &str = "What is the capital of France?";

pub fn gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .reply_json(json!({
            "thought": "The encyclopedia will know this.",
            "action": { "name": "wikipedia", "input": "Paris" }
        }))
        .reply_json(json!({ "answer": "Paris" }))
}

/// Run Scenario 1: Capital Lookup.
pub fn run_scenario(config: &PonderConfig) -> PonderResult<RunReport> {
    println!("=== Scenario 1: Capital Lookup ===");
    println!();
    println!("  Question: {}", QUESTION);
    println!();

    let mut h = harness(gateway(), config)?;
    let report = h.controller.run(QUESTION)?;

    print_transcript(h.controller.transcript());
    print_report(&report);
    print_trace(&h.trace)?;
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use ponder_contracts::execution::Termination;

    use super::*;
    use crate::scenarios::load_config;

    #[test]
    fn test_capital_lookup_answers_paris() {
        let report = run_scenario(&load_config(None).unwrap()).unwrap();
        assert_eq!(report.answer, "Paris");
        assert_eq!(report.termination, Termination::Answered);
        assert_eq!(report.tool_invocations, 1);
        assert_eq!(report.transcript_len, 5);
    }
}
