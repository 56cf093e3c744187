//! # ponder-config
//!
//! TOML configuration for the Ponder reasoning loop.
//!
//! [`PonderConfig`] groups the loop bounds (`[agent]`, deserialized straight
//! into `LoopConfig`), the render-time retention policy (`[retention]`) and
//! optional plain-text trace output (`[trace]`).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ponder_config::PonderConfig;
//!
//! let config = PonderConfig::from_file(Path::new("config/default.toml"))?;
//! let controller = Controller::new(gateway, registry, parser, config.agent.clone())
//!     .with_retention(config.retention_policy());
//! ```

pub mod settings;

pub use settings::{PonderConfig, RetentionConfig, TraceConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use ponder_contracts::{
        config::{LoopConfig, ObservationPolicy},
        error::PonderError,
        message::Message,
    };

    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = PonderConfig::from_toml_str("").unwrap();
        assert_eq!(config.agent, LoopConfig::default());
        assert_eq!(config.retention, RetentionConfig::KeepAll);
        assert_eq!(config.trace.path, None);
    }

    #[test]
    fn test_full_document() {
        let toml = r#"
            [agent]
            max_iterations = 5
            generation_retries = 2
            observations = "trace-only"
            include_partial_context = false
            system_prompt = "You are terse."

            [retention]
            strategy = "recent-window"
            max_messages = 6

            [trace]
            path = "/tmp/ponder.log"
        "#;

        let config = PonderConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.agent.max_iterations, 5);
        assert_eq!(config.agent.generation_retries, 2);
        assert_eq!(config.agent.observations, ObservationPolicy::TraceOnly);
        assert!(!config.agent.include_partial_context);
        assert!(config.agent.seed_system_prompt);
        assert_eq!(config.agent.system_prompt.as_deref(), Some("You are terse."));
        assert_eq!(config.retention, RetentionConfig::RecentWindow { max_messages: 6 });
        assert_eq!(
            config.trace.path.as_deref(),
            Some(std::path::Path::new("/tmp/ponder.log"))
        );
    }

    #[test]
    fn test_partial_agent_table() {
        let config = PonderConfig::from_toml_str("[agent]\nmax_iterations = 1\n").unwrap();
        assert_eq!(config.agent.max_iterations, 1);
        assert_eq!(config.agent.generation_retries, 1);
    }

    #[test]
    fn test_char_budget_policy_is_built() {
        let config =
            PonderConfig::from_toml_str("[retention]\nstrategy = \"char-budget\"\nmax_chars = 10\n")
                .unwrap();
        let policy = config.retention_policy();

        let messages = vec![
            Message::system("sys"),
            Message::user("a long question here"),
            Message::assistant("short"),
        ];
        let kept = policy.retain(&messages);
        assert_eq!(kept.first(), Some(&messages[0]), "system prompt stays pinned");
        assert_eq!(kept.last(), Some(&messages[2]), "newest message is always kept");
        assert!(kept.len() < messages.len());
    }

    #[test]
    fn test_zero_bound_is_rejected() {
        let result =
            PonderConfig::from_toml_str("[retention]\nstrategy = \"recent-window\"\nmax_messages = 0\n");
        match result {
            Err(PonderError::ConfigError { reason }) => assert!(reason.contains("max_messages")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let result = PonderConfig::from_toml_str("[retention]\nstrategy = \"forget-everything\"\n");
        assert!(matches!(result, Err(PonderError::ConfigError { .. })));
    }

    #[test]
    fn test_toml_parse_error() {
        let result = PonderConfig::from_toml_str("this is not valid toml ][[[");
        match result {
            Err(PonderError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse config TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = PonderConfig::from_file(std::path::Path::new("/nonexistent/ponder.toml"));
        assert!(matches!(result, Err(PonderError::ConfigError { .. })));
    }

    #[test]
    fn test_no_trace_path_means_no_sink() {
        let config = PonderConfig::default();
        assert!(config.trace_sink().unwrap().is_none());
    }
}
