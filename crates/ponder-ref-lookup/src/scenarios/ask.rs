//! Free-form question against the offline tools.
//!
//! Uses [`LookupGateway`] in place of a model: it consults the encyclopedia,
//! falls back to web search, and answers from whatever it finds.

use ponder_config::PonderConfig;
use ponder_contracts::{error::PonderResult, execution::RunReport};

use crate::gateway::LookupGateway;

use super::{harness, print_report, print_trace, print_transcript};

pub fn run_query(question: &str, config: &PonderConfig) -> PonderResult<RunReport> {
    println!("=== Ask: {} ===", question);
    println!();

    let mut h = harness(LookupGateway, config)?;
    let report = h.controller.run(question)?;

    print_transcript(h.controller.transcript());
    print_report(&report);
    print_trace(&h.trace)?;
    println!();

    Ok(report)
}
