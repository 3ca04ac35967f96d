//! Session security validation.
//!
//! Session identifiers embed their creation time (`session_<epochMillis>`).
//! Validation checks session freshness against a configured timeout and does
//! basic sanity checks on the source IP. Optionally, a set of trusted CIDR
//! networks restricts where sessions may originate, the same way policy
//! matchers restrict by source network elsewhere in the product.
//!
//! A malformed session identifier or IP is an ordinary denial, not an error;
//! only an invalid configuration (bad CIDR string) errors.

use std::net::IpAddr;

use ipnetwork::IpNetwork;
use time::{Duration, OffsetDateTime};

use crate::AccessResult;
use crate::context::UserContext;
use crate::decision::{AccessDecision, DenyReason};
use crate::error::AccessError;

/// Default session timeout.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::minutes(30);

const SESSION_ID_PREFIX: &str = "session_";

// =============================================================================
// Configuration
// =============================================================================

/// Session security configuration.
#[derive(Debug, Clone)]
pub struct SessionSecurityConfig {
    /// Maximum session age before it is considered expired.
    pub timeout: Duration,

    /// Trusted source networks. Empty means no network restriction beyond
    /// the invalid-IP checks.
    pub trusted_networks: Vec<IpNetwork>,
}

impl Default for SessionSecurityConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SESSION_TIMEOUT,
            trusted_networks: Vec::new(),
        }
    }
}

impl SessionSecurityConfig {
    /// Build a configuration restricted to the given CIDR networks.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any CIDR string does not parse.
    pub fn with_trusted_networks<I, S>(cidrs: I) -> AccessResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut networks = Vec::new();
        for cidr in cidrs {
            let cidr = cidr.as_ref();
            let network = cidr.parse::<IpNetwork>().map_err(|e| {
                AccessError::configuration(format!("invalid trusted network '{cidr}': {e}"))
            })?;
            networks.push(network);
        }
        Ok(Self {
            trusted_networks: networks,
            ..Default::default()
        })
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate session freshness and source IP sanity.
///
/// `now` is passed in so the function stays pure; use
/// [`validate_session_security_now`] to evaluate against the wall clock.
#[must_use]
pub fn validate_session_security(
    user: &UserContext,
    config: &SessionSecurityConfig,
    now: OffsetDateTime,
) -> AccessDecision {
    let created_at = match session_created_at(&user.session_id) {
        Some(created_at) => created_at,
        None => {
            return deny(DenyReason::invalid_session(format!(
                "Malformed session identifier: '{}'",
                user.session_id
            )));
        }
    };

    if now - created_at > config.timeout {
        return deny(DenyReason::session_expired());
    }

    let Ok(ip) = user.ip_address.parse::<IpAddr>() else {
        return deny(DenyReason::invalid_ip(&user.ip_address));
    };
    if ip.is_unspecified() || ip.is_loopback() {
        return deny(DenyReason::invalid_ip(&user.ip_address));
    }

    if !config.trusted_networks.is_empty()
        && !config.trusted_networks.iter().any(|network| network.contains(ip))
    {
        return deny(DenyReason::untrusted_network(&user.ip_address));
    }

    AccessDecision::Allow
}

/// [`validate_session_security`] evaluated against the current wall clock.
#[must_use]
pub fn validate_session_security_now(
    user: &UserContext,
    config: &SessionSecurityConfig,
) -> AccessDecision {
    validate_session_security(user, config, OffsetDateTime::now_utc())
}

/// Extract the embedded creation timestamp from a `session_<epochMillis>` id.
fn session_created_at(session_id: &str) -> Option<OffsetDateTime> {
    let millis = session_id.strip_prefix(SESSION_ID_PREFIX)?.parse::<i64>().ok()?;
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

fn deny(reason: DenyReason) -> AccessDecision {
    tracing::debug!(code = %reason.code, message = %reason.message, "session validation failed");
    AccessDecision::Deny(reason)
}

// =============================================================================
// Tests
// =============================================================================
