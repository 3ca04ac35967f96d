//! Patient view-scope evaluation.
//!
//! Decides whether a staff user may view a specific patient record under one
//! of four visibility scopes: clinic-wide, department, care-team, or
//! self-only. Evaluation order is strict and load-bearing:
//!
//! 1. Null guards on user and patient.
//! 2. Tenant isolation. An owner in a different tenant is still denied here;
//!    isolation dominates the owner override.
//! 3. Owner override.
//! 4. Scope dispatch.
//!
//! When either side's tenant is unset, isolation is not enforced so that
//! legacy records without a tenant stamp remain readable. This is weaker than
//! the validator path in [`crate::validator`], which always compares tenants;
//! see DESIGN.md for the recorded risk.

use std::fmt;

use serde::{Deserialize, Serialize};

use cliniport_core::tenant;

use crate::context::{PatientRef, StaffUser};
use crate::decision::{AccessDecision, DenyReason};

// =============================================================================
// View Scope
// =============================================================================

/// The breadth of patient records a staff role may see.
///
/// Unknown strings are preserved in [`ViewScope::Other`] and always deny.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViewScope {
    /// Every patient in the clinic.
    AllClinic,
    /// Patients assigned to one of the user's departments.
    Department,
    /// Patients whose care team includes the user's provider identity.
    CareTeam,
    /// Only the user's own patient record.
    OwnOnly,
    /// Unrecognized scope string; always denies.
    Other(String),
}

impl ViewScope {
    /// Canonical string form of the scope.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AllClinic => "all_clinic",
            Self::Department => "department",
            Self::CareTeam => "care_team",
            Self::OwnOnly => "own_only",
            Self::Other(scope) => scope,
        }
    }
}

impl From<&str> for ViewScope {
    fn from(value: &str) -> Self {
        match value {
            "all_clinic" => Self::AllClinic,
            "department" => Self::Department,
            "care_team" => Self::CareTeam,
            "own_only" => Self::OwnOnly,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ViewScope {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ViewScope> for String {
    fn from(scope: ViewScope) -> Self {
        scope.as_str().to_string()
    }
}

impl fmt::Display for ViewScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Scope Options
// =============================================================================

/// Scope-specific extra data for the evaluator.
#[derive(Debug, Clone, Default)]
pub struct ScopeOptions {
    /// Provider IDs on the patient's care team (`care_team` scope).
    pub care_team_provider_ids: Vec<String>,

    /// The acting user's provider identity (`care_team` scope).
    pub user_provider_id: Option<String>,

    /// The portal user the patient record belongs to (`own_only` scope).
    pub patient_user_id: Option<String>,
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluate whether a staff user may view a patient record under a scope.
#[must_use]
pub fn evaluate_patient_access(
    user: Option<&StaffUser>,
    patient: Option<&PatientRef>,
    scope: &ViewScope,
    options: &ScopeOptions,
) -> AccessDecision {
    let Some(user) = user else {
        return deny(DenyReason::missing_user());
    };
    let Some(patient) = patient else {
        return deny(DenyReason::missing_patient());
    };

    // Tenant isolation comes before everything else, the owner override
    // included. The check is skipped when either tenant is unset.
    if tenant::isolation_applicable(user.tenant_id.as_deref(), patient.tenant_id.as_deref())
        && let (Some(user_tenant), Some(patient_tenant)) =
            (user.tenant_id.as_deref(), patient.tenant_id.as_deref())
        && !tenant::isolation_satisfied(user_tenant, patient_tenant)
    {
        return deny(DenyReason::cross_tenant("Patient belongs to a different tenant"));
    }

    if user.is_owner {
        tracing::trace!(user_id = %user.id, "clinic owner override grants patient access");
        return AccessDecision::Allow;
    }

    match scope {
        ViewScope::AllClinic => AccessDecision::Allow,
        ViewScope::Department => evaluate_department(user, patient),
        ViewScope::CareTeam => evaluate_care_team(options),
        ViewScope::OwnOnly => evaluate_own_only(user, options),
        ViewScope::Other(unknown) => deny(DenyReason::unknown_scope(unknown)),
    }
}

/// Boolean projection of [`evaluate_patient_access`].
#[must_use]
pub fn can_access_patient(
    user: Option<&StaffUser>,
    patient: Option<&PatientRef>,
    scope: &ViewScope,
    options: &ScopeOptions,
) -> bool {
    evaluate_patient_access(user, patient, scope, options).is_allowed()
}

fn evaluate_department(user: &StaffUser, patient: &PatientRef) -> AccessDecision {
    match patient.department.as_deref() {
        Some(department) if !department.is_empty() && user.in_department(department) => {
            AccessDecision::Allow
        }
        department => deny(DenyReason::department_mismatch(department, &user.departments)),
    }
}

fn evaluate_care_team(options: &ScopeOptions) -> AccessDecision {
    let Some(provider_id) = options.user_provider_id.as_deref() else {
        return deny(DenyReason::missing_provider_id());
    };
    if options.care_team_provider_ids.is_empty() {
        return deny(DenyReason::no_care_team());
    }
    if options.care_team_provider_ids.iter().any(|id| id == provider_id) {
        AccessDecision::Allow
    } else {
        deny(DenyReason::not_in_care_team(provider_id))
    }
}

fn evaluate_own_only(user: &StaffUser, options: &ScopeOptions) -> AccessDecision {
    if options.patient_user_id.as_deref() == Some(user.id.as_str()) {
        AccessDecision::Allow
    } else {
        deny(DenyReason::not_own_record())
    }
}

fn deny(reason: DenyReason) -> AccessDecision {
    tracing::debug!(code = %reason.code, message = %reason.message, "patient access denied");
    AccessDecision::Deny(reason)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(tenant: &str, departments: &[&str]) -> StaffUser {
        StaffUser {
            id: "u1".to_string(),
            tenant_id: Some(tenant.to_string()),
            departments: departments.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    fn patient(tenant: &str, department: Option<&str>) -> PatientRef {
        PatientRef {
            id: Some("p1".to_string()),
            tenant_id: Some(tenant.to_string()),
            department: department.map(|d| d.to_string()),
        }
    }

    #[test]
    fn test_null_guards() {
        let user = staff("t1", &[]);
        let record = patient("t1", None);

        let decision =
            evaluate_patient_access(None, Some(&record), &ViewScope::AllClinic, &ScopeOptions::default());
        assert_eq!(decision.deny_reason().unwrap().code, "missing-user");

        let decision =
            evaluate_patient_access(Some(&user), None, &ViewScope::AllClinic, &ScopeOptions::default());
        assert_eq!(decision.deny_reason().unwrap().code, "missing-patient");
    }

    #[test]
    fn test_all_clinic_allows_same_tenant() {
        let user = staff("t1", &[]);
        let record = patient("t1", None);
        assert!(can_access_patient(
            Some(&user),
            Some(&record),
            &ViewScope::AllClinic,
            &ScopeOptions::default()
        ));
    }

    #[test]
    fn test_cross_tenant_denies_any_scope() {
        let user = staff("t1", &["d1"]);
        let record = patient("t2", Some("d1"));
        for scope in [
            ViewScope::AllClinic,
            ViewScope::Department,
            ViewScope::CareTeam,
            ViewScope::OwnOnly,
        ] {
            let decision =
                evaluate_patient_access(Some(&user), Some(&record), &scope, &ScopeOptions::default());
            assert_eq!(decision.deny_reason().unwrap().code, "cross-tenant-access", "{scope}");
        }
    }

    #[test]
    fn test_cross_tenant_beats_owner() {
        let user = StaffUser {
            id: "u1".to_string(),
            tenant_id: Some("t1".to_string()),
            is_owner: true,
            ..Default::default()
        };
        let record = patient("t2", None);
        let decision = evaluate_patient_access(
            Some(&user),
            Some(&record),
            &ViewScope::AllClinic,
            &ScopeOptions::default(),
        );
        assert_eq!(decision.deny_reason().unwrap().code, "cross-tenant-access");
    }

    #[test]
    fn test_owner_bypasses_scope_logic_within_tenant() {
        let user = StaffUser {
            id: "u1".to_string(),
            tenant_id: Some("t1".to_string()),
            is_owner: true,
            ..Default::default()
        };
        let record = patient("t1", Some("d9"));
        for scope in [ViewScope::Department, ViewScope::CareTeam, ViewScope::OwnOnly] {
            assert!(
                can_access_patient(Some(&user), Some(&record), &scope, &ScopeOptions::default()),
                "{scope}"
            );
        }
    }

    #[test]
    fn test_unset_tenant_skips_isolation() {
        let user = StaffUser {
            id: "u1".to_string(),
            tenant_id: None,
            ..Default::default()
        };
        let record = patient("t2", None);
        assert!(can_access_patient(
            Some(&user),
            Some(&record),
            &ViewScope::AllClinic,
            &ScopeOptions::default()
        ));

        let user = staff("t1", &[]);
        let record = PatientRef::default();
        assert!(can_access_patient(
            Some(&user),
            Some(&record),
            &ViewScope::AllClinic,
            &ScopeOptions::default()
        ));
    }

    #[test]
    fn test_department_scope_membership() {
        let user = staff("t1", &["d1", "d2"]);

        let record = patient("t1", Some("d1"));
        assert!(can_access_patient(
            Some(&user),
            Some(&record),
            &ViewScope::Department,
            &ScopeOptions::default()
        ));

        let record = patient("t1", Some("d3"));
        let decision = evaluate_patient_access(
            Some(&user),
            Some(&record),
            &ViewScope::Department,
            &ScopeOptions::default(),
        );
        let reason = decision.deny_reason().unwrap();
        assert_eq!(reason.code, "department-mismatch");
        assert!(reason.message.contains("d3"));
        assert!(reason.message.contains("d1"));
    }

    #[test]
    fn test_department_scope_requires_patient_department() {
        let user = staff("t1", &["d1"]);
        let record = patient("t1", None);
        assert!(!can_access_patient(
            Some(&user),
            Some(&record),
            &ViewScope::Department,
            &ScopeOptions::default()
        ));

        let record = patient("t1", Some(""));
        assert!(!can_access_patient(
            Some(&user),
            Some(&record),
            &ViewScope::Department,
            &ScopeOptions::default()
        ));
    }

    #[test]
    fn test_department_scope_denies_user_without_departments() {
        let user = staff("t1", &[]);
        let record = patient("t1", Some("d1"));
        assert!(!can_access_patient(
            Some(&user),
            Some(&record),
            &ViewScope::Department,
            &ScopeOptions::default()
        ));
    }

    #[test]
    fn test_care_team_membership() {
        let user = staff("t1", &[]);
        let record = patient("t1", None);
        let options = ScopeOptions {
            care_team_provider_ids: vec!["prov-1".to_string(), "prov-2".to_string()],
            user_provider_id: Some("prov-2".to_string()),
            ..Default::default()
        };
        assert!(can_access_patient(Some(&user), Some(&record), &ViewScope::CareTeam, &options));
    }

    #[test]
    fn test_care_team_empty_vs_non_member_are_distinct() {
        let user = staff("t1", &[]);
        let record = patient("t1", None);

        let empty = ScopeOptions {
            user_provider_id: Some("prov-1".to_string()),
            ..Default::default()
        };
        let decision =
            evaluate_patient_access(Some(&user), Some(&record), &ViewScope::CareTeam, &empty);
        assert_eq!(decision.deny_reason().unwrap().code, "no-care-team");

        let non_member = ScopeOptions {
            care_team_provider_ids: vec!["prov-9".to_string()],
            user_provider_id: Some("prov-1".to_string()),
            ..Default::default()
        };
        let decision =
            evaluate_patient_access(Some(&user), Some(&record), &ViewScope::CareTeam, &non_member);
        assert_eq!(decision.deny_reason().unwrap().code, "not-in-care-team");
    }

    #[test]
    fn test_care_team_requires_provider_identity() {
        let user = staff("t1", &[]);
        let record = patient("t1", None);
        let options = ScopeOptions {
            care_team_provider_ids: vec!["prov-1".to_string()],
            ..Default::default()
        };
        let decision =
            evaluate_patient_access(Some(&user), Some(&record), &ViewScope::CareTeam, &options);
        assert_eq!(decision.deny_reason().unwrap().code, "missing-provider-id");
    }

    #[test]
    fn test_own_only_matches_user_id() {
        let user = staff("t1", &[]);
        let record = patient("t1", None);

        let own = ScopeOptions {
            patient_user_id: Some("u1".to_string()),
            ..Default::default()
        };
        assert!(can_access_patient(Some(&user), Some(&record), &ViewScope::OwnOnly, &own));

        let other = ScopeOptions {
            patient_user_id: Some("u2".to_string()),
            ..Default::default()
        };
        let decision =
            evaluate_patient_access(Some(&user), Some(&record), &ViewScope::OwnOnly, &other);
        assert_eq!(decision.deny_reason().unwrap().code, "not-own-record");

        let missing = ScopeOptions::default();
        assert!(!can_access_patient(Some(&user), Some(&record), &ViewScope::OwnOnly, &missing));
    }

    #[test]
    fn test_unknown_scope_always_denies() {
        let user = staff("t1", &[]);
        let record = patient("t1", None);
        let scope = ViewScope::from("regional");
        let decision =
            evaluate_patient_access(Some(&user), Some(&record), &scope, &ScopeOptions::default());
        let reason = decision.deny_reason().unwrap();
        assert_eq!(reason.code, "unknown-scope");
        assert!(reason.message.contains("regional"));
    }

    #[test]
    fn test_view_scope_round_trip() {
        for name in ["all_clinic", "department", "care_team", "own_only"] {
            let scope = ViewScope::from(name);
            assert!(!matches!(scope, ViewScope::Other(_)));
            assert_eq!(scope.as_str(), name);
        }
        let scope: ViewScope = serde_json::from_str("\"care_team\"").unwrap();
        assert_eq!(scope, ViewScope::CareTeam);
        assert_eq!(serde_json::to_string(&scope).unwrap(), "\"care_team\"");
    }
}
