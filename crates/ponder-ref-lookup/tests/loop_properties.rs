//! End-to-end properties of the reasoning loop, driven through the real
//! response parser, registry and controller.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use serde_json::json;

use ponder_contracts::{
    config::LoopConfig,
    error::{PonderError, PonderResult},
    execution::Termination,
    message::{Message, Role},
    tool::ToolId,
    trace::TraceKind,
};
use ponder_core::{
    traits::ModelGateway, CancellationToken, Cancellable, Controller, RecentWindow, ToolRegistry,
};
use ponder_decision::ResponseParser;
use ponder_ref_lookup::{reference_registry, ScriptedGateway};
use ponder_trace::InMemoryTraceSink;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn controller(gateway: impl ModelGateway + 'static, registry: ToolRegistry, max: u32) -> Controller {
    Controller::new(
        Box::new(gateway),
        registry,
        Box::new(ResponseParser::new()),
        LoopConfig::default().with_max_iterations(max),
    )
}

/// A registry whose tools count their invocations.
fn counting_registry(
    wikipedia_reply: Result<&'static str, &'static str>,
) -> (ToolRegistry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = ToolRegistry::new();

    let counter = Arc::clone(&calls);
    registry.register_fn(ToolId::Wikipedia, move |_query: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        wikipedia_reply.map(str::to_string).map_err(|reason| PonderError::Tool {
            tool: "wikipedia".to_string(),
            reason: reason.to_string(),
        })
    });

    let counter = Arc::clone(&calls);
    registry.register_fn(ToolId::WebSearch, move |_query: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok("search result".to_string())
    });

    (registry, calls)
}

/// A gateway that returns the same reply forever and counts calls.
struct Repeating {
    reply: String,
    calls: Arc<AtomicUsize>,
}

impl ModelGateway for Repeating {
    fn generate(&self, _prompt: &[Message]) -> PonderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

fn repeating(reply: &str) -> (Repeating, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (
        Repeating { reply: reply.to_string(), calls: Arc::clone(&calls) },
        calls,
    )
}

// ── Happy path ────────────────────────────────────────────────────────────────

#[test]
fn happy_path_returns_answer_with_five_messages() {
    let gateway = ScriptedGateway::new()
        .reply_json(json!({"action": {"name": "wikipedia"}, "input": "Paris"}))
        .reply_json(json!({"answer": "Paris"}));
    let (registry, calls) = counting_registry(Ok("Paris is the capital of France."));
    let mut ctl = controller(gateway, registry, 3);

    let answer = ctl.execute("What is the capital of France?").unwrap();

    assert_eq!(answer, "Paris");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let roles: Vec<Role> = ctl.transcript().render().iter().map(|m| m.role()).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::System, Role::Assistant]
    );
    assert_eq!(
        ctl.transcript().render()[3].content(),
        "Observation (wikipedia): Paris is the capital of France."
    );
}

// ── Termination ───────────────────────────────────────────────────────────────

#[test]
fn always_malformed_model_terminates_within_bound() {
    for max in 0..5 {
        let (gateway, calls) = repeating("I refuse to follow the format.");
        let (registry, tool_calls) = counting_registry(Ok("unused"));
        let mut ctl = controller(gateway, registry, max);

        let report = ctl.run("anything").unwrap();

        assert_eq!(report.termination, Termination::Exhausted);
        assert!(calls.load(Ordering::SeqCst) <= max as usize + 1, "max = {max}");
        assert_eq!(tool_calls.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn always_acting_model_terminates_within_bound() {
    for max in 0..5 {
        let (gateway, calls) = repeating("Action: wikipedia: Paris");
        let (registry, tool_calls) = counting_registry(Ok("facts"));
        let mut ctl = controller(gateway, registry, max);

        let report = ctl.run("anything").unwrap();

        assert_eq!(report.termination, Termination::Exhausted);
        assert_eq!(calls.load(Ordering::SeqCst), max as usize + 1);
        assert_eq!(tool_calls.load(Ordering::SeqCst), max as usize);
    }
}

#[test]
fn zero_bound_degrades_without_invoking_tools() {
    let (gateway, _) = repeating(r#"{"action": {"name": "wikipedia", "input": "X"}}"#);
    let (registry, tool_calls) = counting_registry(Ok("facts"));
    let mut ctl = controller(gateway, registry, 0);

    let answer = ctl.execute("X").unwrap();

    assert!(!answer.is_empty());
    assert_eq!(tool_calls.load(Ordering::SeqCst), 0);
}

// ── Monotonic transcript ─────────────────────────────────────────────────────

#[test]
fn transcript_grows_and_never_rewrites() {
    let sink = InMemoryTraceSink::new();
    let gateway = ScriptedGateway::new()
        .reply("garbage")
        .reply("Action: wikipedia: Paris")
        .fail("timeout")
        .reply("Action: web_search: Paris")
        .reply("Answer: Paris");
    let (registry, _) = counting_registry(Ok("facts"));
    let mut ctl = controller(gateway, registry, 5).with_trace_sink(Box::new(sink.clone()));

    let before: Vec<Message> = ctl.transcript().render().to_vec();
    ctl.execute("capital of France?").unwrap();
    let after = ctl.transcript().render();

    assert!(after.len() > before.len());
    assert_eq!(&after[..before.len()], before.as_slice(), "prefix must be unchanged");

    // Every message the controller created reached the trace in order.
    let log = sink.export_log().unwrap();
    let traced: Vec<String> = log
        .events
        .iter()
        .filter_map(|e| match &e.entry.kind {
            TraceKind::Message { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect();
    let stored: Vec<String> = after.iter().map(|m| m.content().to_string()).collect();
    assert_eq!(traced, stored);
    assert!(sink.verify_integrity());
}

// ── Tool-failure containment ─────────────────────────────────────────────────

#[test]
fn failing_tool_is_observed_not_raised() {
    let gateway = ScriptedGateway::new()
        .reply("Action: wikipedia: Paris")
        .reply("Answer: unknown");
    let (registry, _) = counting_registry(Err("HTTP 503"));
    let mut ctl = controller(gateway, registry, 3);

    let answer = ctl.execute("capital of France?").unwrap();

    assert_eq!(answer, "unknown");
    let failure = ctl
        .transcript()
        .render()
        .iter()
        .find(|m| m.content().starts_with("Observation (wikipedia): Error:"))
        .expect("failure observation recorded");
    assert!(failure.content().contains("HTTP 503"));
}

// ── Unknown-tool safety ──────────────────────────────────────────────────────

#[test]
fn unregistered_tool_goes_through_malformed_path() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = ToolRegistry::new();
    registry.register_fn(ToolId::Wikipedia, move |_q: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok("facts".to_string())
    });

    let gateway = ScriptedGateway::new()
        .reply_json(json!({"action": {"name": "web_search", "input": "Paris"}}))
        .reply_json(json!({"action": {"name": "teleport", "input": "Paris"}}))
        .reply("Answer: Paris");
    let mut ctl = controller(gateway, registry, 3);

    let report = ctl.run("capital of France?").unwrap();

    assert_eq!(report.answer, "Paris");
    assert_eq!(report.iterations, 2, "each malformed reply consumes an iteration");
    assert_eq!(report.tool_invocations, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let feedback = ctl
        .transcript()
        .render()
        .iter()
        .filter(|m| m.content().starts_with("Your previous response could not be used"))
        .count();
    assert_eq!(feedback, 2);
}

// ── Precedence ───────────────────────────────────────────────────────────────

#[test]
fn action_and_answer_together_dispatch_the_action() {
    let gateway = ScriptedGateway::new()
        .reply(r#"{"action": {"name": "wikipedia", "reason": "r"}, "answer": "x"}"#)
        .reply("Answer: done");
    let (registry, calls) = counting_registry(Ok("facts"));
    let mut ctl = controller(gateway, registry, 3);

    let report = ctl.run("capital of France?").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1, "wikipedia was dispatched");
    assert_eq!(report.answer, "done", "the first reply did not terminate");
    assert_eq!(
        ctl.transcript().render()[2].content(),
        "Thought: r\nAction: wikipedia: capital of France?"
    );
}

#[test]
fn json_in_action_input_is_dispatched_not_answered() {
    let gateway = ScriptedGateway::new()
        .reply("Thought: search the literal payload\nAction: web_search: {\"answer\": 42}")
        .reply("Answer: done");
    let (registry, calls) = counting_registry(Ok("facts"));
    let mut ctl = controller(gateway, registry, 3);

    let report = ctl.run("what does the payload mean?").unwrap();

    assert_eq!(report.answer, "done");
    assert_eq!(report.tool_invocations, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ── Empty answers ────────────────────────────────────────────────────────────

#[test]
fn blank_answer_is_fed_back_and_corrected() {
    let gateway = ScriptedGateway::new()
        .reply(r#"{"answer": "   "}"#)
        .reply("Answer:")
        .reply("Answer: Paris");
    let (registry, _) = counting_registry(Ok("facts"));
    let mut ctl = controller(gateway, registry, 3);

    let report = ctl.run("capital of France?").unwrap();

    assert_eq!(report.termination, Termination::Answered);
    assert_eq!(report.answer, "Paris");
    assert_eq!(report.iterations, 2, "each blank answer consumes an iteration");
    let feedback = ctl
        .transcript()
        .render()
        .iter()
        .filter(|m| m.content().contains("final answer is empty"))
        .count();
    assert_eq!(feedback, 2);
}

#[test]
fn only_blank_answers_end_exhausted_not_answered() {
    let (gateway, _) = repeating(r#"{"answer": ""}"#);
    let (registry, _) = counting_registry(Ok("facts"));
    let mut ctl = controller(gateway, registry, 2);

    let report = ctl.run("capital of France?").unwrap();

    assert_eq!(report.termination, Termination::Exhausted);
    assert!(!report.answer.is_empty());
}

// ── Gateway failures ─────────────────────────────────────────────────────────

#[test]
fn empty_reply_counts_as_generation_failure() {
    let gateway = ScriptedGateway::new().reply("   ").reply("");
    let mut ctl = controller(gateway, reference_registry(), 3);

    let report = ctl.run("anything").unwrap();

    assert_eq!(report.termination, Termination::GatewayFailed);
    assert!(report.answer.contains("empty response"));
}

#[test]
fn cancelled_gateway_ends_the_query_with_an_error_answer() {
    let token = CancellationToken::new();
    token.cancel();
    let gateway = Cancellable::new(ScriptedGateway::new().reply("Answer: never seen"), token);
    let mut ctl = controller(gateway, reference_registry(), 3);

    let report = ctl.run("anything").unwrap();

    assert_eq!(report.termination, Termination::GatewayFailed);
    assert!(report.answer.contains("cancelled"));
}

// ── Programmer errors ────────────────────────────────────────────────────────

#[test]
fn only_programmer_errors_escape() {
    let mut ctl = controller(ScriptedGateway::new(), ToolRegistry::new(), 3);
    assert!(matches!(ctl.execute("q"), Err(PonderError::NoToolsRegistered)));

    let mut ctl = controller(ScriptedGateway::new(), reference_registry(), 3);
    assert!(matches!(ctl.execute(""), Err(PonderError::EmptyQuery)));
}

// ── Retention ────────────────────────────────────────────────────────────────

#[test]
fn retention_bounds_the_prompt_but_not_the_transcript() {
    let gateway = ScriptedGateway::new()
        .reply("Action: wikipedia: Paris")
        .reply("Action: wikipedia: Lyon")
        .reply("Answer: both");
    let handle = gateway.clone();
    let mut ctl = Controller::new(
        Box::new(gateway),
        reference_registry(),
        Box::new(ResponseParser::new()),
        LoopConfig::default(),
    )
    .with_retention(Box::new(RecentWindow::new(2)));

    ctl.execute("compare Paris and Lyon").unwrap();

    assert_eq!(ctl.transcript().len(), 7);
    for prompt in handle.prompts() {
        // Pinned system prompt, at most two recent messages, the directive.
        assert!(prompt.len() <= 4, "prompt had {} messages", prompt.len());
        assert_eq!(prompt[0].role(), Role::System);
    }
}
