//! The loop controller: the bounded Reason → Act → Observe state machine.
//!
//!   THINKING → (ACTING → OBSERVING → THINKING)* → ANSWERED | EXHAUSTED
//!
//! Each THINKING cycle renders the retained transcript, appends a transient
//! directive, calls the gateway once and parses the reply. A final answer
//! terminates. An action consumes one iteration, is dispatched through the
//! registry, and its observation is recorded before the next cycle. A
//! malformed reply is recorded as feedback and also consumes an iteration.
//! When no iteration remains the query terminates as exhausted with a
//! degraded answer.
//!
//! Gateway failures (including empty replies and cancellations) are retried
//! up to `LoopConfig::generation_retries` consecutive times without consuming
//! an iteration; past that the query terminates with an error answer.
//!
//! Every cycle appends at least one message, so the transcript grows strictly
//! within a query, and the loop performs at most `max_iterations + 1`
//! successful model calls.

use tracing::{debug, info, warn};

use ponder_contracts::{
    config::{LoopConfig, ObservationPolicy},
    decision::Decision,
    error::{PonderError, PonderResult},
    execution::{IterationState, RunReport, Termination},
    message::{ExecutionId, Message, Role},
    tool::{Observation, ToolId},
    trace::TraceEntry,
};

use crate::{
    prompt,
    registry::ToolRegistry,
    retention::KeepAll,
    traits::{DecisionParser, ModelGateway, RetentionPolicy, TraceSink},
    transcript::Transcript,
};

/// Drives one conversation against an injected gateway, registry and parser.
///
/// Construct one controller per independent conversation. Its transcript and
/// registry are exclusively owned; only the tools behind the registry may be
/// shared with other controllers.
pub struct Controller {
    gateway: Box<dyn ModelGateway>,
    registry: ToolRegistry,
    parser: Box<dyn DecisionParser>,
    retention: Box<dyn RetentionPolicy>,
    sinks: Vec<Box<dyn TraceSink>>,
    config: LoopConfig,
    transcript: Transcript,
    execution_id: ExecutionId,
    /// Number of transcript messages already sent to the trace sinks.
    traced: usize,
}

/// Per-query bookkeeping.
struct RunState {
    iteration: IterationState,
    observations: Vec<Observation>,
    tool_invocations: u32,
    consecutive_failures: u32,
    cycle: u32,
}

impl Controller {
    /// Create a controller. The transcript is seeded with the system prompt
    /// unless `config.seed_system_prompt` is false.
    pub fn new(
        gateway: Box<dyn ModelGateway>,
        registry: ToolRegistry,
        parser: Box<dyn DecisionParser>,
        config: LoopConfig,
    ) -> Self {
        let transcript = seed(&config, &registry);
        Self {
            gateway,
            registry,
            parser,
            retention: Box::new(KeepAll),
            sinks: Vec::new(),
            config,
            transcript,
            execution_id: ExecutionId::new(),
            traced: 0,
        }
    }

    /// Replace the render-time retention policy (default: keep everything).
    pub fn with_retention(mut self, retention: Box<dyn RetentionPolicy>) -> Self {
        self.retention = retention;
        self
    }

    /// Add a trace sink. Every sink receives every entry.
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn execution_id(&self) -> &ExecutionId {
        &self.execution_id
    }

    /// Discard the conversation and start a new execution.
    pub fn reset(&mut self) {
        self.transcript = seed(&self.config, &self.registry);
        self.execution_id = ExecutionId::new();
        self.traced = 0;
    }

    /// Answer `query`. Always returns a string for model or tool misbehaviour;
    /// only programmer errors are returned as `Err`.
    pub fn execute(&mut self, query: &str) -> PonderResult<String> {
        self.run(query).map(|report| report.answer)
    }

    /// Answer `query` and report how the loop terminated.
    ///
    /// # Errors
    ///
    /// `PonderError::EmptyQuery` for a blank query and
    /// `PonderError::NoToolsRegistered` for an empty registry. Nothing else.
    pub fn run(&mut self, query: &str) -> PonderResult<RunReport> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PonderError::EmptyQuery);
        }
        if self.registry.is_empty() {
            return Err(PonderError::NoToolsRegistered);
        }

        let available = self.registry.identifiers();
        let mut run = RunState {
            iteration: IterationState::new(self.config.max_iterations),
            observations: Vec::new(),
            tool_invocations: 0,
            consecutive_failures: 0,
            cycle: 0,
        };

        info!(
            execution_id = %self.execution_id,
            max_iterations = self.config.max_iterations,
            tools = ?available,
            "query started"
        );
        self.push(Role::User, query);

        loop {
            // ── THINKING ─────────────────────────────────────────────────────
            run.cycle += 1;
            self.trace(&TraceEntry::iteration(run.cycle));

            let raw = match self.think(query, &available, &run.iteration) {
                Ok(raw) => {
                    run.consecutive_failures = 0;
                    raw
                }
                Err(err) => {
                    run.consecutive_failures += 1;
                    if run.consecutive_failures > self.config.generation_retries {
                        warn!(
                            execution_id = %self.execution_id,
                            failures = run.consecutive_failures,
                            error = %err,
                            "model gateway failed repeatedly, giving up"
                        );
                        let answer = prompt::gateway_failure_answer(&err);
                        self.push(Role::Assistant, answer.as_str());
                        return Ok(self.finish(answer, Termination::GatewayFailed, &run));
                    }
                    warn!(
                        execution_id = %self.execution_id,
                        error = %err,
                        "model gateway failed, retrying"
                    );
                    self.push(Role::System, prompt::gateway_retry_message(&err));
                    continue;
                }
            };

            match self.parser.parse(&raw, &available) {
                Decision::FinalAnswer { answer, rationale } => {
                    self.push(Role::Assistant, prompt::answer_message(&answer, &rationale));
                    return Ok(self.finish(answer, Termination::Answered, &run));
                }

                Decision::Action { tool, input, rationale } => {
                    let input = if input.trim().is_empty() {
                        debug!(tool = %tool, "action has no input, falling back to the query");
                        query.to_string()
                    } else {
                        input
                    };
                    self.push(Role::Assistant, prompt::action_message(tool, &input, &rationale));

                    if !run.iteration.try_advance() {
                        return Ok(self.exhaust(&run));
                    }

                    // ── ACTING ───────────────────────────────────────────────
                    debug!(
                        execution_id = %self.execution_id,
                        iteration = run.iteration.current(),
                        tool = %tool,
                        "dispatching action"
                    );
                    let observation = self.registry.dispatch(tool, &input);
                    run.tool_invocations += 1;

                    // ── OBSERVING ────────────────────────────────────────────
                    self.observe(&observation);
                    run.observations.push(observation);
                }

                Decision::Malformed { raw_text, reason } => {
                    warn!(
                        execution_id = %self.execution_id,
                        reason = %reason,
                        "model response could not be parsed"
                    );
                    self.push(Role::System, prompt::malformed_message(&raw_text, &reason));

                    if !run.iteration.try_advance() {
                        return Ok(self.exhaust(&run));
                    }
                }
            }
        }
    }

    // ── State helpers ────────────────────────────────────────────────────────

    /// Build the prompt from the retained transcript plus the directive and
    /// call the gateway once. An empty reply is a generation failure.
    fn think(&self, query: &str, available: &[ToolId], iteration: &IterationState) -> PonderResult<String> {
        let mut prompt = self.retention.retain(self.transcript.render());
        prompt.push(prompt::directive(query, available, iteration));

        debug!(
            execution_id = %self.execution_id,
            prompt_messages = prompt.len(),
            transcript_len = self.transcript.len(),
            "calling model gateway"
        );

        let text = self.gateway.generate(&prompt)?;
        if text.trim().is_empty() {
            return Err(PonderError::Generation {
                reason: "model returned an empty response".to_string(),
            });
        }
        Ok(text)
    }

    fn observe(&mut self, observation: &Observation) {
        let content = prompt::observation_message(observation);
        match self.config.observations {
            ObservationPolicy::Transcript => self.push(Role::System, content),
            ObservationPolicy::TraceOnly => {
                self.trace(&TraceEntry::message(&Message::system(content), false));
            }
        }
    }

    fn exhaust(&mut self, run: &RunState) -> RunReport {
        info!(
            execution_id = %self.execution_id,
            max_iterations = run.iteration.max(),
            "iteration bound reached without a final answer"
        );
        let answer = prompt::exhausted_answer(
            run.iteration.max(),
            &run.observations,
            self.config.include_partial_context,
        );
        self.push(Role::Assistant, answer.as_str());
        self.finish(answer, Termination::Exhausted, run)
    }

    fn finish(&mut self, answer: String, termination: Termination, run: &RunState) -> RunReport {
        self.trace(&TraceEntry::terminated(termination));
        let execution_id = self.execution_id.to_string();
        for sink in &self.sinks {
            if let Err(err) = sink.finalize(&execution_id) {
                warn!(execution_id = %execution_id, error = %err, "trace sink finalize failed");
            }
        }

        info!(
            execution_id = %execution_id,
            termination = %termination,
            iterations = run.iteration.current(),
            tool_invocations = run.tool_invocations,
            "query finished"
        );

        RunReport {
            execution_id: self.execution_id.clone(),
            answer,
            termination,
            iterations: run.iteration.current(),
            tool_invocations: run.tool_invocations,
            transcript_len: self.transcript.len(),
        }
    }

    // ── Transcript and trace plumbing ────────────────────────────────────────

    fn push(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.append(role, content);

        let pending: Vec<TraceEntry> = self.transcript.render()[self.traced..]
            .iter()
            .map(|message| TraceEntry::message(message, true))
            .collect();
        self.traced = self.transcript.len();
        for entry in &pending {
            self.trace(entry);
        }
    }

    fn trace(&self, entry: &TraceEntry) {
        if self.sinks.is_empty() {
            return;
        }
        let execution_id = self.execution_id.to_string();
        for sink in &self.sinks {
            if let Err(err) = sink.record(&execution_id, entry) {
                warn!(execution_id = %execution_id, error = %err, "trace sink write failed");
            }
        }
    }
}

fn seed(config: &LoopConfig, registry: &ToolRegistry) -> Transcript {
    if !config.seed_system_prompt {
        return Transcript::new();
    }
    let prompt = config
        .system_prompt
        .clone()
        .unwrap_or_else(|| prompt::default_system_prompt(&registry.identifiers()));
    Transcript::seeded(prompt)
}

// ── Tests ────────────────────────────────────────────────────────────────────
