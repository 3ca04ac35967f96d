//! Resource sensitivity tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Sensitivity tier of a resource.
///
/// Tiers are ordered: `Public < Confidential < Restricted`. Gates in the
/// validators are written as comparisons against this ordering rather than
/// per-variant matches.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Freely viewable within the tenant (clinic hours, provider bios).
    #[default]
    Public,
    /// Patient-identifying data; access must be audit-logged by the caller.
    Confidential,
    /// Highest tier; requires the admin role regardless of granted permissions.
    Restricted,
}

impl Sensitivity {
    /// Canonical string form of the tier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Confidential => "confidential",
            Self::Restricted => "restricted",
        }
    }

    /// Returns `true` if access at this tier must be PHI-audit-logged.
    ///
    /// The validators never log audit events themselves; callers inspect this
    /// flag and emit the audit record.
    #[must_use]
    pub fn requires_phi_audit(&self) -> bool {
        *self >= Self::Confidential
    }
}

impl FromStr for Sensitivity {
    type Err = CoreError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "public" => Ok(Self::Public),
            "confidential" => Ok(Self::Confidential),
            "restricted" => Ok(Self::Restricted),
            other => Err(CoreError::invalid_sensitivity(other)),
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
