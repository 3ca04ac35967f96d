//! Evaluation context types.
//!
//! These are the pre-assembled, request-scoped inputs the evaluators decide
//! over. They are constructed by upstream collaborators (session middleware,
//! record storage), passed in immutably, and discarded once the decision is
//! returned. Nothing in this crate caches or mutates them.

use serde::{Deserialize, Serialize};

use cliniport_core::{Role, Sensitivity};

// =============================================================================
// Staff User
// =============================================================================

/// A staff member as seen by the patient-access evaluators.
///
/// `is_owner` is the clinic-owner super-privilege flag. It is independent of
/// `role` and bypasses permission-tree and view-scope logic, but never tenant
/// isolation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    /// Internal user ID.
    pub id: String,

    /// Tenant the user belongs to. `None` on legacy records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    /// The user's role, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Clinic-owner super-privilege flag.
    #[serde(default)]
    pub is_owner: bool,

    /// Departments the staff member belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub departments: Vec<String>,
}

impl StaffUser {
    /// Returns `true` if the user belongs to the given department.
    #[must_use]
    pub fn in_department(&self, department: &str) -> bool {
        self.departments.iter().any(|d| d == department)
    }
}

// =============================================================================
// Patient Reference
// =============================================================================

/// The patient record a staff user is asking to view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRef {
    /// Patient record ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Tenant the record belongs to. `None` on legacy records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    /// Department the patient is assigned to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

// =============================================================================
// Ownership
// =============================================================================

/// Capability view of the clinic-owner flag.
///
/// Evaluators take `impl Ownership` where calling code may hold a full
/// [`StaffUser`], a bare boolean from a feature gate, or nothing at all, so
/// every shape is accepted uniformly without runtime type inspection.
pub trait Ownership {
    /// Returns `true` if the actor carries the clinic-owner privilege.
    fn is_owner(&self) -> bool;
}

impl Ownership for StaffUser {
    fn is_owner(&self) -> bool {
        self.is_owner
    }
}

impl Ownership for &StaffUser {
    fn is_owner(&self) -> bool {
        self.is_owner
    }
}

impl Ownership for bool {
    fn is_owner(&self) -> bool {
        *self
    }
}

impl<T: Ownership> Ownership for Option<T> {
    fn is_owner(&self) -> bool {
        self.as_ref().is_some_and(Ownership::is_owner)
    }
}

/// Newtype adapter for callers holding only the owner flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerFlag(pub bool);

impl Ownership for OwnerFlag {
    fn is_owner(&self) -> bool {
        self.0
    }
}

// =============================================================================
// User Context
// =============================================================================

/// The authenticated actor making a request, as assembled by the session
/// layer for the resource/role/PHI validators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// Internal user ID.
    pub user_id: String,

    /// The user's role.
    pub role: Role,

    /// Tenant the session belongs to.
    pub tenant_id: String,

    /// Granted capability strings. May contain the wildcard `*`.
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Session identifier, `session_<epochMillis>` format.
    pub session_id: String,

    /// Source IP address of the request.
    pub ip_address: String,

    /// User agent string of the request.
    pub user_agent: String,
}

impl UserContext {
    /// Returns `true` if the permission set contains the action or the
    /// wildcard `*`.
    #[must_use]
    pub fn has_permission(&self, action: &str) -> bool {
        self.permissions.iter().any(|p| p == action || p == "*")
    }

    /// Returns `true` if the permission set contains the wildcard `*`.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.permissions.iter().any(|p| p == "*")
    }
}

// =============================================================================
// Resource Context
// =============================================================================

/// The target being accessed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContext {
    /// Resource ID.
    pub resource_id: String,

    /// Resource type (e.g. "patient").
    pub resource_type: String,

    /// Tenant the resource belongs to.
    pub tenant_id: String,

    /// Sensitivity tier of the resource.
    #[serde(default)]
    pub sensitivity: Sensitivity,

    /// The subject whose data this is, for self-access checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

// =============================================================================
// Access Rule
// =============================================================================

/// Snapshot of the `{role, resource, action}` triple a validation decided on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    /// Role of the acting user.
    pub role: Role,

    /// Resource type the rule applies to.
    pub resource: String,

    /// Action that was requested.
    pub action: String,
}
