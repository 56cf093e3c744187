//! Scenario 2: Tool Failure Containment
//!
//! The encyclopedia has no article on the weather. Its failure becomes an
//! observation; the model reads it and switches to web search. Replies use
//! the line-oriented shape, including `PAUSE` markers and a tool alias.
//!
//!   1. Model: `Action: wikipedia: weather in Oslo`
//!   2. Encyclopedia fails → `Observation (wikipedia): Error: ...`
//!   3. Model: `Action: google: weather in Oslo`
//!   4. Web search returns the forecast page
//!   5. Model: `Answer: ...`

use ponder_config::PonderConfig;
use ponder_contracts::{error::PonderResult, execution::RunReport};

use crate::gateway::ScriptedGateway;

use super::{harness, print_report, print_trace, print_transcript};

pub const QUESTION: &str = "What is the weather in Oslo today?";

pub fn gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .reply("Thought: Let me check the encyclopedia.\nAction: wikipedia: weather in Oslo\nPAUSE")
        .reply("Thought: No article. A web search should help.\nAction: google: weather in Oslo\nPAUSE")
        .reply("Thought: The forecast page has it.\nAnswer: About 4 degrees with light rain.")
}

/// Run Scenario 2: Tool Failure Containment.
pub fn run_scenario(config: &PonderConfig) -> PonderResult<RunReport> {
    println!("=== Scenario 2: Tool Failure Containment ===");
    println!();
    println!("  Question: {}", QUESTION);
    println!();

    let mut h = harness(gateway(), config)?;
    let report = h.controller.run(QUESTION)?;

    print_transcript(h.controller.transcript());
    print_report(&report);
    print_trace(&h.trace)?;
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(report)
}
