//! Typed failures that abort a session before any decision is emitted.

/// Configuration or parameter problems. Always fatal for the session.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid MinimumProfit: {0}")]
    MinimumProfit(String),

    #[error("invalid session parameters: {0}")]
    Params(String),

    #[error("invalid config field {field}: {reason}")]
    Field { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn field(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Field {
            field,
            reason: reason.into(),
        }
    }
}
