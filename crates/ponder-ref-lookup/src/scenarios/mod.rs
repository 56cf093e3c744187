//! Reference scenarios.
//!
//! Each scenario wires real Ponder components (controller, registry,
//! response parser, hash-chained trace) to the offline tools and a scripted
//! gateway, runs one or more queries, and prints the outcome.

use std::path::Path;

use ponder_config::PonderConfig;
use ponder_contracts::{
    error::PonderResult,
    execution::RunReport,
};
use ponder_core::{traits::ModelGateway, Controller, Transcript};
use ponder_decision::ResponseParser;
use ponder_trace::InMemoryTraceSink;

use crate::tools::reference_registry;

pub mod ask;
pub mod capital_lookup;
pub mod exhausted;
pub mod gateway_outage;
pub mod self_correction;
pub mod tool_failure;

/// Embedded reference configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Load `path`, or the embedded reference configuration when `None`.
pub fn load_config(path: Option<&Path>) -> PonderResult<PonderConfig> {
    match path {
        Some(path) => PonderConfig::from_file(path),
        None => PonderConfig::from_toml_str(DEFAULT_CONFIG),
    }
}

/// A controller plus a handle on its in-memory trace.
pub struct Harness {
    pub controller: Controller,
    pub trace: InMemoryTraceSink,
}

/// Wire `gateway` to the reference tools with `config`'s loop settings,
/// retention policy and optional trace file.
pub fn harness(gateway: impl ModelGateway + 'static, config: &PonderConfig) -> PonderResult<Harness> {
    let trace = InMemoryTraceSink::new();

    let mut controller = Controller::new(
        Box::new(gateway),
        reference_registry(),
        Box::new(ResponseParser::new()),
        config.agent.clone(),
    )
    .with_retention(config.retention_policy())
    .with_trace_sink(Box::new(trace.clone()));

    if let Some(file) = config.trace_sink()? {
        controller = controller.with_trace_sink(Box::new(file));
    }

    Ok(Harness { controller, trace })
}

// ── Output helpers ────────────────────────────────────────────────────────────

pub(crate) fn print_transcript(transcript: &Transcript) {
    println!("  Transcript ({} message(s)):", transcript.len());
    for message in transcript.render() {
        let mut lines = message.content().lines();
        println!("    {:<9} {}", format!("{}:", message.role()), lines.next().unwrap_or(""));
        for line in lines {
            println!("    {:<9} {}", "", line);
        }
    }
    println!();
}

pub(crate) fn print_report(report: &RunReport) {
    println!("  Termination:       {}", report.termination);
    println!("  Iterations used:   {}", report.iterations);
    println!("  Tool invocations:  {}", report.tool_invocations);
    println!("  Answer:            {}", report.answer.replace('\n', "\n                     "));
    println!();
}

pub(crate) fn print_trace(trace: &InMemoryTraceSink) -> PonderResult<()> {
    let log = trace.export_log()?;
    println!(
        "  Trace chain integrity:  {} ({} event(s) in chain)",
        if trace.verify_integrity() { "VERIFIED" } else { "FAILED" },
        log.events.len()
    );
    Ok(())
}
