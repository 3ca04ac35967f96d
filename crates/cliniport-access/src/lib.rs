//! # cliniport-access
//!
//! Multi-tenant access control and permission evaluation for Cliniport.
//!
//! This crate is the decision surface shared by the API layer and the UI:
//! both call the same evaluators, so what the server enforces and what the
//! client renders can never drift apart. Everything here is pure and
//! synchronous; callers assemble the context objects from session tokens and
//! stored records, call an evaluator, and map the returned decision onto
//! HTTP semantics or rendering choices.
//!
//! ## Modules
//!
//! - [`context`] - Request-scoped actor and resource types
//! - [`decision`] - Access decisions and denial reasons
//! - [`tree`] - Hierarchical permission tree evaluation
//! - [`scope`] - Patient view-scope evaluation
//! - [`validator`] - Resource, role, and PHI access validation
//! - [`session`] - Session freshness and source IP checks
//! - [`report`] - Compliance scoring over validation batches
//!
//! ## Guarantees
//!
//! Tenant isolation is evaluated before the clinic-owner override everywhere
//! both concepts exist: an owner never crosses a tenant boundary. Denials are
//! returned as values with structured reasons, never raised as errors, and
//! the evaluators hold no state, so concurrent use needs no coordination.

pub mod context;
pub mod decision;
pub mod error;
pub mod report;
pub mod scope;
pub mod session;
pub mod tree;
pub mod validator;

pub use context::{
    AccessRule, OwnerFlag, Ownership, PatientRef, ResourceContext, StaffUser, UserContext,
};
pub use decision::{AccessDecision, DenyReason};
pub use error::AccessError;
pub use report::{calculate_access_control_score, generate_access_control_report};
pub use scope::{ScopeOptions, ViewScope, can_access_patient, evaluate_patient_access};
pub use session::{
    DEFAULT_SESSION_TIMEOUT, SessionSecurityConfig, validate_session_security,
    validate_session_security_now,
};
pub use tree::{PermissionNode, PermissionTree, SectionNode, evaluate_permission, has_permission};
pub use validator::{AccessControlValidation, validate_access_control, validate_phi_access};

/// Type alias for access control results.
pub type AccessResult<T> = Result<T, AccessError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use cliniport_access::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AccessResult;
    pub use crate::context::{
        AccessRule, OwnerFlag, Ownership, PatientRef, ResourceContext, StaffUser, UserContext,
    };
    pub use crate::decision::{AccessDecision, DenyReason};
    pub use crate::error::AccessError;
    pub use crate::report::{calculate_access_control_score, generate_access_control_report};
    pub use crate::scope::{ScopeOptions, ViewScope, can_access_patient, evaluate_patient_access};
    pub use crate::session::{
        DEFAULT_SESSION_TIMEOUT, SessionSecurityConfig, validate_session_security,
        validate_session_security_now,
    };
    pub use crate::tree::{
        PermissionNode, PermissionTree, SectionNode, evaluate_permission, has_permission,
    };
    pub use crate::validator::{
        AccessControlValidation, validate_access_control, validate_phi_access,
    };
    pub use cliniport_core::{Role, Sensitivity, isolation_applicable, isolation_satisfied};
}
