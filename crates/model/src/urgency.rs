//! Urgency levels and which case kinds may carry them.

use crate::status::CaseKind;
use crate::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Urgency of a case record.
///
/// `Emergency` exists only for referrals and tele-sessions; home visits and
/// appointments top out at `Urgent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Urgent,
    Emergency,
}

impl Urgency {
    /// Parses an urgency from its string representation.
    pub fn parse(s: &str) -> ModelResult<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "urgent" => Ok(Self::Urgent),
            "emergency" => Ok(Self::Emergency),
            _ => Err(ModelError::InvalidInput(format!("Invalid urgency: {}", s))),
        }
    }

    /// Returns the string representation of this urgency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::Emergency => "emergency",
        }
    }

    /// Whether this urgency level is valid for records of `kind`.
    pub fn allowed_for(self, kind: CaseKind) -> bool {
        match self {
            Self::Normal | Self::Urgent => true,
            Self::Emergency => matches!(kind, CaseKind::Referral | CaseKind::TeleSession),
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_is_limited_to_referral_and_tele() {
        assert!(Urgency::Emergency.allowed_for(CaseKind::Referral));
        assert!(Urgency::Emergency.allowed_for(CaseKind::TeleSession));
        assert!(!Urgency::Emergency.allowed_for(CaseKind::HomeVisit));
        assert!(!Urgency::Emergency.allowed_for(CaseKind::Appointment));
    }

    #[test]
    fn normal_and_urgent_are_universal() {
        for kind in [
            CaseKind::Referral,
            CaseKind::HomeVisit,
            CaseKind::Appointment,
            CaseKind::TeleSession,
        ] {
            assert!(Urgency::Normal.allowed_for(kind));
            assert!(Urgency::Urgent.allowed_for(kind));
        }
    }

    #[test]
    fn parse_and_as_str() {
        assert_eq!(Urgency::parse("urgent").unwrap(), Urgency::Urgent);
        assert_eq!(Urgency::parse("EMERGENCY").unwrap(), Urgency::Emergency);
        assert!(Urgency::parse("asap").is_err());
        assert_eq!(Urgency::Normal.as_str(), "normal");
    }
}
