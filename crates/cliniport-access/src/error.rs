//! Access control error types.
//!
//! Denied access is never an error: evaluators return
//! [`AccessDecision`](crate::decision::AccessDecision) values for every
//! ordinary denial, including malformed inputs like an empty permission path.
//! The error type below covers configuration faults only, where the caller
//! handed us something that cannot be evaluated at all.

/// Errors that can occur while loading access control configuration.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// A permission tree document could not be parsed.
    #[error("Invalid permission tree: {message}")]
    InvalidPermissionTree {
        /// Description of why the tree is invalid.
        message: String,
    },

    /// The access control configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AccessError {
    /// Creates a new `InvalidPermissionTree` error.
    #[must_use]
    pub fn invalid_permission_tree(message: impl Into<String>) -> Self {
        Self::InvalidPermissionTree {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let tree = AccessError::invalid_permission_tree("expected object");
        assert_eq!(tree.to_string(), "Invalid permission tree: expected object");

        let config = AccessError::configuration("bad CIDR");
        assert_eq!(config.to_string(), "Configuration error: bad CIDR");
    }
}
