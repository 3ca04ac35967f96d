//! Access decisions and denial reasons.
//!
//! Every evaluator in this crate returns an [`AccessDecision`] rather than a
//! bare boolean, so callers that need the denial reason (API handlers mapping
//! to 403 bodies, audit pipelines) get it without a second evaluation pass.
//! Callers that only want yes/no project it out with
//! [`AccessDecision::is_allowed`], or use the `can_*`/`has_*` convenience
//! wrappers next to each evaluator.

use serde::Serialize;

// =============================================================================
// Access Decision
// =============================================================================

/// Result of an access control evaluation.
#[derive(Debug, Clone)]
pub enum AccessDecision {
    /// Access is granted.
    Allow,
    /// Access is denied with a reason.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns `true` if access was granted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns `true` if access was denied.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }

    /// Get the deny reason if access was denied.
    #[must_use]
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Deny(reason) => Some(reason),
            Self::Allow => None,
        }
    }
}

// =============================================================================
// Deny Reason
// =============================================================================

/// Reason for access denial.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenyReason {
    /// Error code for programmatic handling.
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Additional details about the denial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DenyReason {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// The actor or resource belongs to a different tenant.
    #[must_use]
    pub fn cross_tenant(message: impl Into<String>) -> Self {
        Self::new("cross-tenant-access", message)
    }

    /// No user was supplied to the evaluator.
    #[must_use]
    pub fn missing_user() -> Self {
        Self::new("missing-user", "User is required")
    }

    /// No patient record was supplied to the evaluator.
    #[must_use]
    pub fn missing_patient() -> Self {
        Self::new("missing-patient", "Patient is required")
    }

    /// No permission tree was supplied.
    #[must_use]
    pub fn no_permissions() -> Self {
        Self::new("no-permissions", "No permissions provided")
    }

    /// The permission path is empty or contains a zero-length segment.
    #[must_use]
    pub fn invalid_path(path: &str) -> Self {
        Self::new("invalid-path", format!("Invalid permission path: '{path}'"))
    }

    /// A permission path segment does not exist in the tree.
    #[must_use]
    pub fn unknown_path(path: &str) -> Self {
        Self::new("unknown-path", format!("Permission '{path}' does not exist"))
    }

    /// A node on the permission path is explicitly disabled.
    #[must_use]
    pub fn not_enabled(path: &str) -> Self {
        Self::new("not-enabled", format!("Permission '{path}' is not enabled"))
    }

    /// The patient's department is not one of the user's departments.
    #[must_use]
    pub fn department_mismatch(patient_department: Option<&str>, user_departments: &[String]) -> Self {
        let mut reason = Self::new(
            "department-mismatch",
            format!(
                "Patient department {:?} is not in user departments {:?}",
                patient_department.unwrap_or("<none>"),
                user_departments
            ),
        );
        reason.details = Some(serde_json::json!({
            "patientDepartment": patient_department,
            "userDepartments": user_departments,
        }));
        reason
    }

    /// The patient has no care team at all.
    #[must_use]
    pub fn no_care_team() -> Self {
        Self::new("no-care-team", "Patient has no care team members")
    }

    /// The user's provider identity is not on the patient's care team.
    #[must_use]
    pub fn not_in_care_team(provider_id: &str) -> Self {
        Self::new(
            "not-in-care-team",
            format!("Provider '{provider_id}' is not in patient's care team"),
        )
    }

    /// No provider identity was supplied for a care-team check.
    #[must_use]
    pub fn missing_provider_id() -> Self {
        Self::new(
            "missing-provider-id",
            "User has no provider identity for care team check",
        )
    }

    /// The record belongs to a different portal user under `own_only` scope.
    #[must_use]
    pub fn not_own_record() -> Self {
        Self::new("not-own-record", "Patient record does not belong to this user")
    }

    /// The view scope string is not one of the known scopes.
    #[must_use]
    pub fn unknown_scope(scope: &str) -> Self {
        Self::new("unknown-scope", format!("Unknown view scope: {scope}"))
    }

    /// The user's permission set does not cover the requested action.
    #[must_use]
    pub fn missing_permission(action: &str) -> Self {
        Self::new(
            "missing-permission",
            format!("User lacks permission for action '{action}'"),
        )
    }

    /// Restricted resources require the admin role.
    #[must_use]
    pub fn requires_admin() -> Self {
        Self::new(
            "requires-admin",
            "Access to restricted resources requires admin role",
        )
    }

    /// The role is not on the PHI allow-list.
    #[must_use]
    pub fn phi_not_permitted(role: &str) -> Self {
        Self::new(
            "phi-access",
            format!("Role '{role}' does not have PHI access permissions"),
        )
    }

    /// A patient tried to read PHI they do not own.
    #[must_use]
    pub fn phi_not_owner() -> Self {
        Self::new("phi-ownership", "Patients can only access their own data")
    }

    /// The session is older than the configured timeout.
    #[must_use]
    pub fn session_expired() -> Self {
        Self::new("session-expired", "Session has expired")
    }

    /// The session identifier is malformed.
    #[must_use]
    pub fn invalid_session(message: impl Into<String>) -> Self {
        Self::new("invalid-session", message)
    }

    /// The source IP address is unusable (unparseable, unspecified, loopback).
    #[must_use]
    pub fn invalid_ip(ip: &str) -> Self {
        Self::new("invalid-ip", format!("Invalid IP address: {ip}"))
    }

    /// The source IP is outside every configured trusted network.
    #[must_use]
    pub fn untrusted_network(ip: &str) -> Self {
        Self::new(
            "untrusted-network",
            format!("IP address {ip} is not in a trusted network"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_decision_methods() {
        let allow = AccessDecision::Allow;
        assert!(allow.is_allowed());
        assert!(!allow.is_denied());
        assert!(allow.deny_reason().is_none());

        let deny = AccessDecision::Deny(DenyReason::missing_user());
        assert!(!deny.is_allowed());
        assert!(deny.is_denied());
        assert_eq!(deny.deny_reason().unwrap().code, "missing-user");
    }

    #[test]
    fn test_deny_reason_serializes_camel_case() {
        let reason = DenyReason::department_mismatch(Some("cardiology"), &["oncology".to_string()]);
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["code"], "department-mismatch");
        assert_eq!(json["details"]["patientDepartment"], "cardiology");
        assert_eq!(json["details"]["userDepartments"][0], "oncology");
    }

    #[test]
    fn test_invalid_ip_message_contains_marker() {
        let reason = DenyReason::invalid_ip("127.0.0.1");
        assert!(reason.message.contains("Invalid IP"));
    }
}
