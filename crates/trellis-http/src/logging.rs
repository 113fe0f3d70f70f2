//! Structured logging setup
//!
//! Composition emits `tracing` events under the `trellis::resolver`,
//! `trellis::instantiator`, `trellis::composer` and `trellis::walker`
//! targets. [`init_logging`] installs a subscriber for them; `RUST_LOG`
//! overrides the configured filter.

use serde_json::{json, Map, Value};
use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Plain,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Fallback level when no filter is set (e.g. "info")
    pub level: String,
    pub format: LogFormat,
    /// Include file and line number information
    pub include_location: bool,
    pub include_timestamp: bool,
    /// Fields reported with the initialization event
    pub global_fields: Map<String, Value>,
    /// Filter directives such as "trellis=debug,tower_http=info"
    pub env_filter: Option<String>,
    pub service_name: Option<String>,
    pub service_version: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            include_timestamp: true,
            global_fields: Map::new(),
            env_filter: None,
            service_name: None,
            service_version: None,
        }
    }
}

impl LoggingConfig {
    /// JSON output, composition summaries only
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            env_filter: Some("trellis=info,tower_http=warn,axum=warn".to_string()),
            ..Self::default()
        }
        .with_global_field("env", "production")
    }

    /// Pretty output including per-requirement resolution events
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            include_location: true,
            env_filter: Some("trellis=debug,tower_http=debug".to_string()),
            ..Self::default()
        }
        .with_global_field("env", "development")
    }

    /// Minimal output
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Plain,
            include_timestamp: false,
            env_filter: Some("trellis=error".to_string()),
            ..Self::default()
        }
        .with_global_field("env", "test")
    }

    pub fn with_global_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.global_fields.insert(key.into(), value.into());
        self
    }

    pub fn with_service(mut self, name: &str, version: &str) -> Self {
        self.service_name = Some(name.to_string());
        self.service_version = Some(version.to_string());
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Directives used when `RUST_LOG` is not set
    pub fn filter_directives(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(&self.level)
    }

    fn layer(&self) -> BoxedLayer {
        let base = fmt::layer()
            .with_writer(io::stdout)
            .with_file(self.include_location)
            .with_line_number(self.include_location);

        match (self.format, self.include_timestamp) {
            (LogFormat::Json, true) => base.json().boxed(),
            (LogFormat::Json, false) => base.json().without_time().boxed(),
            (LogFormat::Pretty, true) => base.pretty().boxed(),
            (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (LogFormat::Plain, true) => base.boxed(),
            (LogFormat::Plain, false) => base.without_time().boxed(),
        }
    }

    fn summary(&self) -> Value {
        let mut summary = json!({
            "level": self.level,
            "format": format!("{:?}", self.format),
            "filter": self.filter_directives(),
        });
        if let Some(name) = &self.service_name {
            summary["service_name"] = json!(name);
        }
        if let Some(version) = &self.service_version {
            summary["service_version"] = json!(version);
        }
        for (key, value) in &self.global_fields {
            summary[key.as_str()] = value.clone();
        }
        summary
    }
}

/// Install the global subscriber
///
/// Fails if the filter directives are invalid or a global subscriber is
/// already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directives()))?;

    tracing_subscriber::registry()
        .with(config.layer().with_filter(filter))
        .try_init()?;

    tracing::info!(target: "trellis::logging", config = %config.summary(), "Structured logging initialized");
    Ok(())
}
