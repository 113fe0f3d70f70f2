use crate::config::{ConfigError, ConfigSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

pub const PREFIX_STRATEGY_VAR: &str = "TRELLIS_PREFIX_STRATEGY";
pub const METHOD_NEGOTIATION_VAR: &str = "TRELLIS_METHOD_NEGOTIATION";
pub const TRACE_REQUESTS_VAR: &str = "TRELLIS_TRACE_REQUESTS";

/// Configuration trait for environment-driven configuration
pub trait AppConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}

/// How route prefixes are threaded into nested modules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixStrategy {
    /// A nested module sees the full prefix accumulated from the root
    #[default]
    Accumulated,
    /// A nested module sees only its parent's own prefix
    SingleLevel,
}

impl FromStr for PrefixStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accumulated" | "additive" => Ok(PrefixStrategy::Accumulated),
            "single-level" | "single_level" | "single" => Ok(PrefixStrategy::SingleLevel),
            _ => Err(ConfigError::invalid_value(
                "prefix_strategy",
                s,
                "accumulated or single-level",
            )),
        }
    }
}

impl std::fmt::Display for PrefixStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            PrefixStrategy::Accumulated => "accumulated",
            PrefixStrategy::SingleLevel => "single-level",
        };
        write!(f, "{}", value)
    }
}

/// Settings for one composition pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionConfig {
    pub prefix_strategy: PrefixStrategy,
    /// Answer `OPTIONS` with an `Allow` header on every mounted route path
    pub method_negotiation: bool,
    /// Wrap the composed handler in a request tracing layer
    pub trace_requests: bool,
    #[serde(skip)]
    sources: HashMap<String, ConfigSource>,
}

impl CompositionConfig {
    pub fn new() -> Self {
        Self {
            prefix_strategy: PrefixStrategy::default(),
            method_negotiation: true,
            trace_requests: false,
            sources: HashMap::new(),
        }
    }

    pub fn with_prefix_strategy(mut self, strategy: PrefixStrategy) -> Self {
        self.prefix_strategy = strategy;
        self.sources
            .insert("prefix_strategy".to_string(), ConfigSource::Programmatic);
        self
    }

    pub fn with_method_negotiation(mut self, enabled: bool) -> Self {
        self.method_negotiation = enabled;
        self.sources
            .insert("method_negotiation".to_string(), ConfigSource::Programmatic);
        self
    }

    pub fn with_trace_requests(mut self, enabled: bool) -> Self {
        self.trace_requests = enabled;
        self.sources
            .insert("trace_requests".to_string(), ConfigSource::Programmatic);
        self
    }
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_value(field, value, "true or false")),
    }
}

impl AppConfigTrait for CompositionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Ok(value) = env::var(PREFIX_STRATEGY_VAR) {
            config.prefix_strategy = value.parse()?;
            config.sources.insert(
                "prefix_strategy".to_string(),
                ConfigSource::env(PREFIX_STRATEGY_VAR, value.as_str()),
            );
        }

        if let Ok(value) = env::var(METHOD_NEGOTIATION_VAR) {
            config.method_negotiation = parse_bool("method_negotiation", &value)?;
            config.sources.insert(
                "method_negotiation".to_string(),
                ConfigSource::env(METHOD_NEGOTIATION_VAR, value.as_str()),
            );
        }

        if let Ok(value) = env::var(TRACE_REQUESTS_VAR) {
            config.trace_requests = parse_bool("trace_requests", &value)?;
            config.sources.insert(
                "trace_requests".to_string(),
                ConfigSource::env(TRACE_REQUESTS_VAR, value.as_str()),
            );
        }

        Ok(config)
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert(
            "prefix_strategy".to_string(),
            ConfigSource::Default(PrefixStrategy::default().to_string()),
        );
        sources.insert(
            "method_negotiation".to_string(),
            ConfigSource::Default("true".to_string()),
        );
        sources.insert(
            "trace_requests".to_string(),
            ConfigSource::Default("false".to_string()),
        );
        sources.extend(self.sources.clone());
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var(PREFIX_STRATEGY_VAR);
        env::remove_var(METHOD_NEGOTIATION_VAR);
        env::remove_var(TRACE_REQUESTS_VAR);
    }

    #[test]
    #[serial]
    fn test_defaults_from_empty_environment() {
        clear_env();
        let config = CompositionConfig::from_env().unwrap();

        assert_eq!(config.prefix_strategy, PrefixStrategy::Accumulated);
        assert!(config.method_negotiation);
        assert!(!config.trace_requests);
        assert!(config.config_sources()["prefix_strategy"].is_default());
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        clear_env();
        env::set_var(PREFIX_STRATEGY_VAR, "single-level");
        env::set_var(METHOD_NEGOTIATION_VAR, "off");
        env::set_var(TRACE_REQUESTS_VAR, "1");

        let config = CompositionConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.prefix_strategy, PrefixStrategy::SingleLevel);
        assert!(!config.method_negotiation);
        assert!(config.trace_requests);
        assert!(config.config_sources()["trace_requests"].is_env_var());
    }

    #[test]
    #[serial]
    fn test_invalid_strategy_is_rejected() {
        clear_env();
        env::set_var(PREFIX_STRATEGY_VAR, "sideways");
        let result = CompositionConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_builder_marks_programmatic_sources() {
        let config = CompositionConfig::new().with_prefix_strategy(PrefixStrategy::SingleLevel);
        assert_eq!(
            config.config_sources()["prefix_strategy"],
            ConfigSource::Programmatic
        );
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&PrefixStrategy::SingleLevel).unwrap();
        assert_eq!(json, "\"single-level\"");
    }
}
