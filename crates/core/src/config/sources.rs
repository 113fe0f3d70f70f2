use std::fmt;

/// Where a composition setting came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from an environment variable, with the raw value as given
    EnvVar { var: &'static str, raw: String },
    /// Built-in default
    Default(String),
    /// Set through a `with_*` builder method
    Programmatic,
}

impl ConfigSource {
    pub fn env(var: &'static str, raw: impl Into<String>) -> Self {
        Self::EnvVar {
            var,
            raw: raw.into(),
        }
    }

    pub fn is_env_var(&self) -> bool {
        matches!(self, ConfigSource::EnvVar { .. })
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::EnvVar { var, raw } => write!(f, "{}={}", var, raw),
            ConfigSource::Default(value) => write!(f, "default ({})", value),
            ConfigSource::Programmatic => f.write_str("set in code"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ConfigSource::env("TRELLIS_PREFIX_STRATEGY", "single-level").to_string(),
            "TRELLIS_PREFIX_STRATEGY=single-level"
        );
        assert_eq!(ConfigSource::Default("true".into()).to_string(), "default (true)");
        assert!(ConfigSource::Programmatic.to_string().contains("code"));
    }
}
