//! Resource, role, and PHI access validation.
//!
//! Coarser rule-based checks over `{role, resource type, action}` triples,
//! resource sensitivity tiers, and PHI ownership. Unlike the patient
//! view-scope evaluator, tenant isolation here is unconditional: the session
//! layer always stamps `UserContext` and `ResourceContext` with tenants, so
//! an empty tenant is compared as a value rather than skipped.
//!
//! The validators never log PHI audit events. Callers inspect
//! `resource.sensitivity.requires_phi_audit()` on allowed accesses and emit
//! the audit record themselves.

use serde::{Deserialize, Serialize};

use cliniport_core::{Role, Sensitivity, tenant};

use crate::context::{AccessRule, ResourceContext, UserContext};
use crate::decision::{AccessDecision, DenyReason};

// =============================================================================
// Validation Record
// =============================================================================

/// Outcome of one `{role, resource, action}` validation.
///
/// Immutable after creation; aggregated by the compliance report in
/// [`crate::report`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlValidation {
    /// The rule that was evaluated.
    pub rule: AccessRule,

    /// Whether the access was valid.
    pub valid: bool,

    /// Denial reason for invalid accesses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AccessControlValidation {
    fn valid(rule: AccessRule) -> Self {
        Self {
            rule,
            valid: true,
            reason: None,
        }
    }

    fn invalid(rule: AccessRule, reason: &DenyReason) -> Self {
        Self {
            rule,
            valid: false,
            reason: Some(reason.message.clone()),
        }
    }
}

// =============================================================================
// Resource/Role Validation
// =============================================================================

/// Validate an action on a resource for a user.
///
/// Checks, in order: tenant isolation, the granted permission set (the
/// wildcard `*` covers any action), and the sensitivity gate (`restricted`
/// requires the admin role or the wildcard, regardless of the permission-set
/// outcome).
#[must_use]
pub fn validate_access_control(
    user: &UserContext,
    resource: &ResourceContext,
    action: &str,
) -> AccessControlValidation {
    let rule = AccessRule {
        role: user.role.clone(),
        resource: resource.resource_type.clone(),
        action: action.to_string(),
    };

    if !tenant::isolation_satisfied(&user.tenant_id, &resource.tenant_id) {
        return invalid(
            rule,
            &DenyReason::cross_tenant("User and resource belong to different tenants"),
        );
    }

    if !user.has_permission(action) {
        return invalid(rule, &DenyReason::missing_permission(action));
    }

    if resource.sensitivity == Sensitivity::Restricted
        && !user.role.is_admin()
        && !user.has_wildcard()
    {
        return invalid(rule, &DenyReason::requires_admin());
    }

    AccessControlValidation::valid(rule)
}

fn invalid(rule: AccessRule, reason: &DenyReason) -> AccessControlValidation {
    tracing::debug!(
        code = %reason.code,
        role = %rule.role,
        resource = %rule.resource,
        action = %rule.action,
        "access control validation failed"
    );
    AccessControlValidation::invalid(rule, reason)
}

// =============================================================================
// PHI Validation
// =============================================================================

/// Validate PHI access for a user.
///
/// Tenant isolation first, then the role allow-list (admin, provider, nurse,
/// patient). Patients additionally must own the record.
#[must_use]
pub fn validate_phi_access(user: &UserContext, resource: &ResourceContext) -> AccessDecision {
    if !tenant::isolation_satisfied(&user.tenant_id, &resource.tenant_id) {
        return deny(DenyReason::cross_tenant(
            "User and resource belong to different tenants",
        ));
    }

    if !user.role.has_phi_access() {
        return deny(DenyReason::phi_not_permitted(user.role.as_str()));
    }

    if user.role == Role::Patient && resource.owner_id.as_deref() != Some(user.user_id.as_str()) {
        return deny(DenyReason::phi_not_owner());
    }

    AccessDecision::Allow
}

fn deny(reason: DenyReason) -> AccessDecision {
    tracing::debug!(code = %reason.code, message = %reason.message, "PHI access denied");
    AccessDecision::Deny(reason)
}

// =============================================================================
// Tests
// =============================================================================
