//! Scenario 4: Iteration Exhaustion
//!
//! The model never settles on an answer. After `max_iterations` lookups the
//! controller stops asking and returns a degraded answer listing the partial
//! findings gathered along the way.

use ponder_config::PonderConfig;
use ponder_contracts::{error::PonderResult, execution::RunReport};

use crate::gateway::ScriptedGateway;

use super::{harness, print_report, print_trace, print_transcript};

pub const QUESTION: &str = "Who was Ada Lovelace and what is celebrated in her name?";

/// A model that proposes a lookup `replies` times in a row.
pub fn gateway(replies: u32) -> ScriptedGateway {
    (0..replies).fold(ScriptedGateway::new(), |gateway, n| {
        if n % 2 == 0 {
            gateway.reply("Thought: I need more detail.\nAction: wikipedia: Ada Lovelace")
        } else {
            gateway.reply("Thought: Maybe the web knows more.\nAction: web_search: Ada Lovelace Day")
        }
    })
}

/// Run Scenario 4: Iteration Exhaustion.
pub fn run_scenario(config: &PonderConfig) -> PonderResult<RunReport> {
    println!("=== Scenario 4: Iteration Exhaustion ===");
    println!();
    println!("  Question: {}", QUESTION);
    println!("  Iteration bound: {}", config.agent.max_iterations);
    println!();

    // One reply per iteration plus the one that finds none left.
    let mut h = harness(gateway(config.agent.max_iterations + 1), config)?;
    let report = h.controller.run(QUESTION)?;

    print_transcript(h.controller.transcript());
    print_report(&report);
    print_trace(&h.trace)?;
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(report)
}
