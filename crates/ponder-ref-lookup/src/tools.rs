//! Lookup tools over the offline reference data.
//!
//! Each tool returns its JSON result rendered as compact text, the shape a
//! model sees in its observation. A miss is a tool error; the registry
//! turns it into a failure observation.

use tracing::debug;

use ponder_contracts::{
    error::{PonderError, PonderResult},
    tool::ToolId,
};
use ponder_core::{registry::ToolRegistry, traits::Tool};

use crate::mock_data::{lookup_article, search_web};

/// Encyclopedia summary lookup: `{"query", "title", "summary"}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncyclopediaTool;

impl Tool for EncyclopediaTool {
    fn invoke(&self, query: &str) -> PonderResult<String> {
        debug!(tool = "wikipedia", query = %query, "encyclopedia lookup");
        lookup_article(query)
            .map(|article| article.to_string())
            .ok_or_else(|| PonderError::Tool {
                tool: ToolId::Wikipedia.to_string(),
                reason: format!("no article found for '{}'", query.trim()),
            })
    }
}

/// Web search: `{"top_results": [{"position", "title", "link", "snippet"}]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSearchTool;

impl Tool for WebSearchTool {
    fn invoke(&self, query: &str) -> PonderResult<String> {
        debug!(tool = "web_search", query = %query, "web search");
        search_web(query)
            .map(|results| results.to_string())
            .ok_or_else(|| PonderError::Tool {
                tool: ToolId::WebSearch.to_string(),
                reason: format!("no search results for '{}'", query.trim()),
            })
    }
}

/// A registry holding both reference tools.
pub fn reference_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(ToolId::Wikipedia, EncyclopediaTool);
    registry.register(ToolId::WebSearch, WebSearchTool);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encyclopedia_hit_is_json() {
        let text = EncyclopediaTool.invoke("Eiffel Tower").unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["title"], "Eiffel Tower");
    }

    #[test]
    fn test_encyclopedia_miss_is_tool_error() {
        match EncyclopediaTool.invoke("Atlantis") {
            Err(PonderError::Tool { tool, reason }) => {
                assert_eq!(tool, "wikipedia");
                assert!(reason.contains("Atlantis"));
            }
            other => panic!("expected Tool error, got {:?}", other),
        }
    }

    #[test]
    fn test_web_search_miss_is_tool_error() {
        assert!(matches!(
            WebSearchTool.invoke("xylophone quartet"),
            Err(PonderError::Tool { .. })
        ));
    }

    #[test]
    fn test_reference_registry_dispatch() {
        let registry = reference_registry();
        assert_eq!(registry.identifiers(), vec![ToolId::Wikipedia, ToolId::WebSearch]);

        let hit = registry.dispatch(ToolId::WebSearch, "weather in Oslo");
        assert!(!hit.failed);
        assert!(hit.text.contains("top_results"));

        let miss = registry.dispatch(ToolId::Wikipedia, "Atlantis");
        assert!(miss.failed);
        assert!(miss.text.starts_with("Error: "));
    }
}
