//! User role vocabulary.
//!
//! Roles come from session tokens and user records as plain strings. The
//! well-known clinic roles get dedicated variants; anything else round-trips
//! through [`Role::Custom`] so organization-defined roles survive
//! serialization unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user's role within a tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Tenant administrator.
    Admin,
    /// Licensed provider (physician, therapist).
    Provider,
    /// Nursing staff.
    Nurse,
    /// Patient-facing portal account.
    Patient,
    /// Non-clinical clinic staff (front desk, billing).
    ClinicUser,
    /// Unauthenticated or minimally privileged account.
    #[default]
    Guest,
    /// Organization-defined role outside the fixed set.
    Custom(String),
}

impl Role {
    /// Canonical string form of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Provider => "provider",
            Self::Nurse => "nurse",
            Self::Patient => "patient",
            Self::ClinicUser => "clinic_user",
            Self::Guest => "guest",
            Self::Custom(name) => name,
        }
    }

    /// Returns `true` for the tenant administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns `true` for clinical staff roles (provider, nurse).
    #[must_use]
    pub fn is_clinical_staff(&self) -> bool {
        matches!(self, Self::Provider | Self::Nurse)
    }

    /// Returns `true` if the role is on the PHI access allow-list.
    ///
    /// Admin, provider, and nurse may access PHI in principle; patients may
    /// access PHI subject to the ownership check in the PHI validator. All
    /// other roles are denied outright.
    #[must_use]
    pub fn has_phi_access(&self) -> bool {
        matches!(self, Self::Admin | Self::Provider | Self::Nurse | Self::Patient)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "provider" => Self::Provider,
            "nurse" => Self::Nurse,
            "patient" => Self::Patient,
            "clinic_user" => Self::ClinicUser,
            "guest" => Self::Guest,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_round_trip() {
        for name in ["admin", "provider", "nurse", "patient", "clinic_user", "guest"] {
            let role = Role::from(name);
            assert!(!matches!(role, Role::Custom(_)));
            assert_eq!(role.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_role_becomes_custom() {
        let role = Role::from("care_coordinator");
        assert_eq!(role, Role::Custom("care_coordinator".to_string()));
        assert_eq!(role.as_str(), "care_coordinator");
    }

    #[test]
    fn test_serde_round_trip() {
        let role: Role = serde_json::from_str("\"nurse\"").unwrap();
        assert_eq!(role, Role::Nurse);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"nurse\"");

        let custom: Role = serde_json::from_str("\"front_desk_lead\"").unwrap();
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"front_desk_lead\"");
    }

    #[test]
    fn test_phi_allow_list() {
        assert!(Role::Admin.has_phi_access());
        assert!(Role::Provider.has_phi_access());
        assert!(Role::Nurse.has_phi_access());
        assert!(Role::Patient.has_phi_access());
        assert!(!Role::ClinicUser.has_phi_access());
        assert!(!Role::Guest.has_phi_access());
        assert!(!Role::Custom("auditor".to_string()).has_phi_access());
    }

    #[test]
    fn test_clinical_staff() {
        assert!(Role::Provider.is_clinical_staff());
        assert!(Role::Nurse.is_clinical_staff());
        assert!(!Role::Admin.is_clinical_staff());
        assert!(!Role::Patient.is_clinical_staff());
    }
}
