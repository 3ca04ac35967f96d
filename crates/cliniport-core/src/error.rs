use thiserror::Error;

/// Core error types for Cliniport vocabulary parsing
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid sensitivity tier: {0}")]
    InvalidSensitivity(String),
}

impl CoreError {
    /// Create a new InvalidSensitivity error
    pub fn invalid_sensitivity(tier: impl Into<String>) -> Self {
        Self::InvalidSensitivity(tier.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
