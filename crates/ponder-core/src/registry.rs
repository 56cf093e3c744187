//! Tool registry: closed identifier → callable.
//!
//! Dispatch never fails. A tool error becomes an `Observation` whose text is
//! a diagnostic, because a failed lookup is useful context for the next
//! reasoning step rather than a reason to abandon the query.

use std::{collections::HashMap, fmt, sync::Arc};

use tracing::{debug, warn};

use ponder_contracts::{
    error::{PonderError, PonderResult},
    tool::{Observation, ToolId},
};

use crate::traits::Tool;

/// Text substituted for a tool that succeeds with empty output.
pub const EMPTY_RESULT: &str = "No results found.";

/// Owns the tools one or more controllers may dispatch to.
///
/// Cloning is cheap and shares the underlying tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<ToolId, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tool` under `id`.
    ///
    /// Registering an identifier that is already present replaces the
    /// earlier tool: the last registration wins, and no error is raised.
    pub fn register(&mut self, id: ToolId, tool: impl Tool + 'static) {
        if self.tools.insert(id, Arc::new(tool)).is_some() {
            debug!(tool = %id, "tool re-registered, previous registration replaced");
        } else {
            debug!(tool = %id, "tool registered");
        }
    }

    pub fn resolve(&self, id: ToolId) -> PonderResult<&dyn Tool> {
        self.tools
            .get(&id)
            .map(|tool| tool.as_ref())
            .ok_or_else(|| PonderError::UnknownTool { name: id.to_string() })
    }

    /// Register a plain function or closure under `id`.
    pub fn register_fn<F>(&mut self, id: ToolId, f: F)
    where
        F: Fn(&str) -> PonderResult<String> + Send + Sync + 'static,
    {
        self.register(id, f);
    }

    /// Invoke the tool registered under `id` with `query`.
    pub fn dispatch(&self, id: ToolId, query: &str) -> Observation {
        let tool = match self.resolve(id) {
            Ok(tool) => tool,
            Err(err) => {
                warn!(tool = %id, "dispatch to unregistered tool");
                return Observation::failure(id, err);
            }
        };

        match tool.invoke(query) {
            Ok(text) if text.trim().is_empty() => {
                debug!(tool = %id, "tool returned empty output");
                Observation::success(id, EMPTY_RESULT)
            }
            Ok(text) => {
                debug!(tool = %id, bytes = text.len(), "tool executed successfully");
                Observation::success(id, text)
            }
            Err(err) => {
                warn!(tool = %id, error = %err, "tool invocation failed");
                Observation::failure(id, err)
            }
        }
    }

    /// Registered identifiers in a stable order.
    pub fn identifiers(&self) -> Vec<ToolId> {
        let mut ids: Vec<ToolId> = self.tools.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, id: ToolId) -> bool {
        self.tools.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.identifiers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::*;

    #[test]
    fn last_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolId::Wikipedia, |_: &str| Ok("first".to_string()));
        registry.register_fn(ToolId::Wikipedia, |_: &str| Ok("second".to_string()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.dispatch(ToolId::Wikipedia, "q").text, "second");
    }

    #[test]
    fn resolve_unknown_tool_fails() {
        let registry = ToolRegistry::new();
        match registry.resolve(ToolId::WebSearch) {
            Err(PonderError::UnknownTool { name }) => assert_eq!(name, "web_search"),
            Err(other) => panic!("expected UnknownTool, got {:?}", other),
            Ok(_) => panic!("expected UnknownTool, got a tool"),
        }
    }

    #[test]
    fn dispatch_passes_query_through() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolId::Wikipedia, |q: &str| Ok(format!("summary of {q}")));

        let obs = registry.dispatch(ToolId::Wikipedia, "Paris");
        assert_eq!(obs.source, ToolId::Wikipedia);
        assert_eq!(obs.text, "summary of Paris");
        assert!(!obs.failed);
    }

    #[test]
    fn dispatch_converts_tool_error_into_observation() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolId::WebSearch, |_: &str| -> PonderResult<String> {
            Err(PonderError::Tool {
                tool: "web_search".to_string(),
                reason: "connection refused".to_string(),
            })
        });

        let obs = registry.dispatch(ToolId::WebSearch, "anything");
        assert!(obs.failed);
        assert!(obs.text.starts_with("Error: "));
        assert!(obs.text.contains("connection refused"));
    }

    #[test]
    fn dispatch_to_unregistered_tool_is_an_error_observation() {
        let registry = ToolRegistry::new();
        let obs = registry.dispatch(ToolId::None, "x");
        assert!(obs.failed);
        assert!(obs.text.contains("unknown tool"));
    }

    #[test]
    fn empty_output_is_replaced() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolId::Wikipedia, |_: &str| Ok("  ".to_string()));
        assert_eq!(registry.dispatch(ToolId::Wikipedia, "q").text, EMPTY_RESULT);
    }

    #[test]
    fn clones_share_tools() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolId::Wikipedia, move |_: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("ok".to_string())
        });
        let shared = registry.clone();

        registry.dispatch(ToolId::Wikipedia, "a");
        shared.dispatch(ToolId::Wikipedia, "b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn identifiers_are_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolId::WebSearch, |_: &str| Ok(String::new()));
        registry.register_fn(ToolId::Wikipedia, |_: &str| Ok(String::new()));
        assert_eq!(registry.identifiers(), vec![ToolId::Wikipedia, ToolId::WebSearch]);
    }
}
