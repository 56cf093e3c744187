//! Scenario 5: Gateway Outage
//!
//! Two queries on one controller, separated by `reset()`:
//!
//!   A. The gateway fails twice in a row. One retry is allowed, so the query
//!      ends with an error answer instead of an error.
//!   B. The gateway fails once, recovers on the retry, and answers.

use ponder_config::PonderConfig;
use ponder_contracts::{error::PonderResult, execution::RunReport};

use crate::gateway::ScriptedGateway;

use super::{harness, print_report, print_trace, print_transcript};

pub const QUESTION: &str = "Where is the Eiffel Tower?";

pub fn gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .fail("connection reset by peer")
        .fail("connection reset by peer")
        .fail("503 service unavailable")
        .reply("Answer: In Paris, on the Champ de Mars.")
}

/// Run Scenario 5: Gateway Outage. Returns the reports of both queries.
pub fn run_scenario(config: &PonderConfig) -> PonderResult<(RunReport, RunReport)> {
    println!("=== Scenario 5: Gateway Outage ===");
    println!();
    println!("  Question: {}", QUESTION);
    println!("  Generation retries allowed: {}", config.agent.generation_retries);
    println!();

    let mut h = harness(gateway(), config)?;

    println!("  A. Gateway down for two consecutive calls");
    let outage = h.controller.run(QUESTION)?;
    print_transcript(h.controller.transcript());
    print_report(&outage);

    h.controller.reset();

    println!("  B. Gateway recovers on the retry");
    let recovered = h.controller.run(QUESTION)?;
    print_transcript(h.controller.transcript());
    print_report(&recovered);

    print_trace(&h.trace)?;
    println!();
    println!("  Scenario 5 complete.");
    println!();

    Ok((outage, recovered))
}
