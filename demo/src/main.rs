//! Ponder Offline Lookup Reference: Demo CLI
//!
//! Runs one or all of the reference scenarios, or a free-form question
//! against the offline tools. Each scenario uses the real controller,
//! response parser and hash-chained trace with a scripted model.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- capital-lookup
//!   cargo run -p demo -- --config my.toml --trace trace.log self-correction
//!   cargo run -p demo -- ask "Tell me about the Eiffel Tower"

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ponder_contracts::error::PonderResult;
use ponder_ref_lookup::scenarios::{
    ask, capital_lookup, exhausted, gateway_outage, load_config, self_correction, tool_failure,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Ponder: bounded Reason/Act/Observe loop demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Ponder offline lookup reference demo",
    long_about = "Runs Ponder reference scenarios showing tool dispatch, failure\n\
                  containment, self-correction, iteration bounds and gateway retries."
)]
struct Cli {
    /// TOML configuration file. The embedded reference configuration is
    /// used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Append a plain-text trace of every run to this file.
    #[arg(long, global = true)]
    trace: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five scenarios in sequence.
    RunAll,
    /// Scenario 1: Capital Lookup (structured happy path).
    CapitalLookup,
    /// Scenario 2: Tool Failure Containment (line-oriented replies).
    ToolFailure,
    /// Scenario 3: Self-Correction (malformed replies fed back).
    SelfCorrection,
    /// Scenario 4: Iteration Exhaustion (degraded answer).
    Exhausted,
    /// Scenario 5: Gateway Outage (retry, failure, reset).
    GatewayOutage,
    /// Ask a free-form question; a fixed lookup strategy stands in for the model.
    Ask {
        /// The question to answer.
        question: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    match run(cli) {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run(cli: Cli) -> PonderResult<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.trace {
        config.trace.path = Some(path);
    }
    info!(
        max_iterations = config.agent.max_iterations,
        trace_file = ?config.trace.path,
        "configuration ready"
    );

    match cli.command {
        Command::RunAll => {
            capital_lookup::run_scenario(&config)?;
            tool_failure::run_scenario(&config)?;
            self_correction::run_scenario(&config)?;
            exhausted::run_scenario(&config)?;
            gateway_outage::run_scenario(&config)?;
        }
        Command::CapitalLookup => {
            capital_lookup::run_scenario(&config)?;
        }
        Command::ToolFailure => {
            tool_failure::run_scenario(&config)?;
        }
        Command::SelfCorrection => {
            self_correction::run_scenario(&config)?;
        }
        Command::Exhausted => {
            exhausted::run_scenario(&config)?;
        }
        Command::GatewayOutage => {
            gateway_outage::run_scenario(&config)?;
        }
        Command::Ask { question } => {
            ask::run_query(&question, &config)?;
        }
    }
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Ponder: Bounded Reasoning Loop");
    println!("Offline Lookup Reference Demo");
    println!("===============================");
    println!();
    println!("Per query, until an answer or the iteration bound:");
    println!("  [1] THINK   the retained transcript plus a directive is sent to the model");
    println!("  [2] PARSE   the reply becomes an Action, a Final Answer, or Malformed feedback");
    println!("  [3] ACT     an action is dispatched through the closed tool registry");
    println!("  [4] OBSERVE the tool result (or failure) is appended for the next turn");
    println!();
}
