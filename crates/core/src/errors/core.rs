use thiserror::Error;

/// Core error type for provider resolution and injection
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No provider satisfies '{requirement}' required by controller '{controller}'")]
    ProviderNotFound {
        requirement: String,
        controller: String,
    },

    #[error(
        "Controller '{controller}' has no injectable token for parameter {parameter_index} \
         ({declared} declared, constructor takes {arity})"
    )]
    MissingInjectable {
        controller: String,
        parameter_index: usize,
        arity: usize,
        declared: usize,
    },

    #[error("Controller '{controller}' asked for injected parameter {index} but only {arity} were resolved")]
    InjectionOutOfBounds {
        controller: String,
        index: usize,
        arity: usize,
    },

    #[error("Injected parameter {index} of '{controller}' is provided by '{provider}', which cannot be viewed as '{expected}'")]
    InjectionMismatch {
        controller: String,
        index: usize,
        expected: String,
        provider: String,
    },

    #[error("Provider '{provider}' failed to construct: {message}")]
    ProviderConstruction { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CoreError {
    /// Create a new provider not found error
    pub fn provider_not_found(requirement: impl Into<String>, controller: impl Into<String>) -> Self {
        Self::ProviderNotFound {
            requirement: requirement.into(),
            controller: controller.into(),
        }
    }

    /// Create a new provider construction error
    pub fn provider_construction(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderConstruction {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if no provider matched a requirement
    pub fn is_provider_not_found(&self) -> bool {
        matches!(self, Self::ProviderNotFound { .. })
    }

    /// Check if a fallback requirement list was missing a token
    pub fn is_missing_injectable(&self) -> bool {
        matches!(self, Self::MissingInjectable { .. })
    }

    /// Check if the error came from reading the injected provider list
    pub fn is_injection(&self) -> bool {
        matches!(
            self,
            Self::InjectionOutOfBounds { .. } | Self::InjectionMismatch { .. }
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
