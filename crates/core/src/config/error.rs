use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

impl From<ConfigError> for crate::errors::CoreError {
    fn from(error: ConfigError) -> Self {
        crate::errors::CoreError::configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreError;

    #[test]
    fn test_converts_into_configuration_error() {
        let error: CoreError =
            ConfigError::invalid_value("prefix_strategy", "nested", "accumulated or single-level").into();

        assert!(matches!(error, CoreError::Configuration { .. }));
        assert!(error.to_string().contains("'nested'"));
    }
}
