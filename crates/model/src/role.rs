//! Actor roles for case ownership and permissions.
//!
//! Ownership and permissions are carried as explicit [`Role`] values set at
//! record creation, never re-derived from facility-name text matching. A
//! role is a role kind plus, for the facility-bound kinds, the identifier of
//! the facility it acts for. Two roles are the same actor only when both
//! parts match exactly.

use crate::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// The kind of actor a role represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Case manager coordinating referrals and funding on behalf of patients.
    CaseManager,
    /// Primary-care unit conducting home visits and local follow-up.
    PrimaryCareUnit,
    /// Hospital or clinic receiving referrals and running appointments.
    Hospital,
    /// Oversight staff with read-only access to every record.
    Oversight,
}

impl RoleKind {
    /// Parses a role kind from its string representation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] if the string does not match any
    /// known role kind.
    pub fn parse(s: &str) -> ModelResult<Self> {
        match s.to_lowercase().as_str() {
            "case_manager" => Ok(Self::CaseManager),
            "primary_care_unit" => Ok(Self::PrimaryCareUnit),
            "hospital" => Ok(Self::Hospital),
            "oversight" => Ok(Self::Oversight),
            _ => Err(ModelError::InvalidInput(format!("Invalid role kind: {}", s))),
        }
    }

    /// Returns the string representation of this role kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CaseManager => "case_manager",
            Self::PrimaryCareUnit => "primary_care_unit",
            Self::Hospital => "hospital",
            Self::Oversight => "oversight",
        }
    }

    /// Whether roles of this kind act for a specific facility.
    pub fn is_facility_bound(&self) -> bool {
        matches!(self, Self::PrimaryCareUnit | Self::Hospital)
    }
}

/// An actor in the coordination system.
///
/// Facility-bound role kinds carry the facility they act for; the other
/// kinds carry none. Use the constructors rather than building the struct
/// directly so the pairing stays consistent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// The kind of actor.
    pub kind: RoleKind,

    /// Facility identifier for facility-bound role kinds.
    pub facility: Option<String>,
}

impl Role {
    /// Creates a role, validating the kind/facility pairing.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] if a facility-bound kind is
    /// missing its facility (or given a blank one), or a non-facility kind
    /// is given one.
    pub fn new(kind: RoleKind, facility: Option<String>) -> ModelResult<Self> {
        if kind.is_facility_bound() {
            let has_facility = facility
                .as_deref()
                .map(str::trim)
                .is_some_and(|f| !f.is_empty());
            if !has_facility {
                return Err(ModelError::InvalidInput(format!(
                    "{} role requires a non-empty facility",
                    kind.as_str()
                )));
            }
        } else if facility.is_some() {
            return Err(ModelError::InvalidInput(format!(
                "{} role does not act for a facility",
                kind.as_str()
            )));
        }
        Ok(Self { kind, facility })
    }

    /// A case-manager role.
    pub fn case_manager() -> Self {
        Self {
            kind: RoleKind::CaseManager,
            facility: None,
        }
    }

    /// An oversight role.
    pub fn oversight() -> Self {
        Self {
            kind: RoleKind::Oversight,
            facility: None,
        }
    }

    /// A primary-care-unit role acting for `facility`.
    pub fn primary_care_unit(facility: impl Into<String>) -> Self {
        Self {
            kind: RoleKind::PrimaryCareUnit,
            facility: Some(facility.into()),
        }
    }

    /// A hospital role acting for `facility`.
    pub fn hospital(facility: impl Into<String>) -> Self {
        Self {
            kind: RoleKind::Hospital,
            facility: Some(facility.into()),
        }
    }

    /// Whether this is an oversight role.
    pub fn is_oversight(&self) -> bool {
        self.kind == RoleKind::Oversight
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.facility {
            Some(facility) => write!(f, "{}:{}", self.kind.as_str(), facility),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}
