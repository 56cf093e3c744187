//! Scenario 3: Self-Correction
//!
//! The model's first two replies are unusable: plain prose, then a tool that
//! does not exist. Each is recorded as feedback, consumes an iteration, and
//! the model corrects itself with a fenced JSON action.
//!
//!   1. Model: prose → malformed (iteration 1)
//!   2. Model: `{"action": {"name": "calculator"}}` → malformed (iteration 2)
//!   3. Model: fenced `{"action": {"tool": "wikipedia", "query": "Mount Everest"}}`
//!   4. Model: `{"final_answer": "..."}`

use serde_json::json;

use ponder_config::PonderConfig;
use ponder_contracts::{error::PonderResult, execution::RunReport};

use crate::gateway::ScriptedGateway;

use super::{harness, print_report, print_trace, print_transcript};

pub const QUESTION: &str = "How tall is the highest mountain on Earth?";

pub fn gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .reply("Probably Everest, but I am not sure how tall it is.")
        .reply_json(json!({
            "action": { "name": "calculator", "input": "8848 + 1" }
        }))
        .reply("```json\n{\"thought\": \"Use a real tool.\", \"action\": {\"tool\": \"wikipedia\", \"query\": \"Mount Everest\"}}\n```")
        .reply_json(json!({ "final_answer": "Mount Everest, at 8,849 metres." }))
}

/// Run Scenario 3: Self-Correction.
pub fn run_scenario(config: &PonderConfig) -> PonderResult<RunReport> {
    println!("=== Scenario 3: Self-Correction ===");
    println!();
    println!("  Question: {}", QUESTION);
    println!();

    let mut h = harness(gateway(), config)?;
    let report = h.controller.run(QUESTION)?;

    print_transcript(h.controller.transcript());
    print_report(&report);
    print_trace(&h.trace)?;
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use ponder_contracts::execution::Termination;

    use super::*;
    use crate::scenarios::load_config;

    #[test]
    fn test_model_recovers_after_two_malformed_replies() {
        let report = run_scenario(&load_config(None).unwrap()).unwrap();
        assert_eq!(report.termination, Termination::Answered);
        assert_eq!(report.answer, "Mount Everest, at 8,849 metres.");
        assert_eq!(report.iterations, 3);
        assert_eq!(report.tool_invocations, 1);
    }
}
