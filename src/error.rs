use thiserror::Error;

/// Error taxonomy for the orchestration engine.
///
/// Only [`TravelError::InvalidRequest`] is meant to propagate out of the
/// orchestrator to a caller. Every other variant is handled locally by the
/// stage that produced it: the stage falls back to a deterministic estimate
/// or an empty result and records a warning instead of failing the request.
#[derive(Error, Debug, Clone)]
pub enum TravelError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("could not resolve {0}")]
    ResolutionFailure(String),

    #[error("provider error ({provider}): {message}")]
    ProviderFailure { provider: &'static str, message: String },

    #[error("validation failed: {0}")]
    ValidationFailure(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("timeout after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, TravelError>;

impl TravelError {
    /// Whether this error kind is ever allowed to propagate out of a stage.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TravelError::InvalidRequest(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TravelError::InvalidRequest(_) => "INVALID_REQUEST",
            TravelError::ResolutionFailure(_) => "RESOLUTION_FAILURE",
            TravelError::ProviderFailure { .. } => "PROVIDER_FAILURE",
            TravelError::ValidationFailure(_) => "VALIDATION_FAILURE",
            TravelError::Config(_) => "CONFIG_ERROR",
            TravelError::Serialization(_) => "SERIALIZATION_ERROR",
            TravelError::Timeout(_) => "TIMEOUT",
        }
    }

    /// Render as a warning string suitable for `TravelResponse.warnings[]`.
    pub fn as_warning(&self) -> String {
        format!("[{}] {}", self.error_code(), self)
    }
}

impl From<serde_json::Error> for TravelError {
    fn from(err: serde_json::Error) -> Self {
        TravelError::Serialization(err.to_string())
    }
}
