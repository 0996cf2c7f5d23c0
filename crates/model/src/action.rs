//! Transition action verbs.
//!
//! Actions are the closed set of verbs a caller may request against a case.
//! Which actions are meaningful from which status is defined by the per-kind
//! transition tables in [`crate::status`]; this module only names the verbs.

use crate::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// A transition verb requested against a case record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseAction {
    /// Accept a referral, home-visit request, or similar intake.
    Accept,
    /// Decline with a mandatory reason.
    Reject,
    /// Mark a referral's patient as treated.
    Treat,
    /// Withdraw or call off the case.
    Cancel,
    /// Begin the visit or session.
    Start,
    /// Finish the visit, appointment, or session.
    Complete,
    /// Confirm a booked appointment.
    Confirm,
    /// Mark an appointment as missed.
    Miss,
    /// Patient was not home for the visit.
    NotHome,
    /// Visit was not allowed to proceed.
    NotAllowed,
    /// Check a tele-session in for the waiting room.
    CheckIn,
    /// Flag a technical issue with a tele-session.
    ReportIssue,
    /// Push a waiting tele-session back.
    Delay,
}

impl CaseAction {
    /// Every action verb, for callers that enumerate the vocabulary.
    pub const ALL: [CaseAction; 13] = [
        Self::Accept,
        Self::Reject,
        Self::Treat,
        Self::Cancel,
        Self::Start,
        Self::Complete,
        Self::Confirm,
        Self::Miss,
        Self::NotHome,
        Self::NotAllowed,
        Self::CheckIn,
        Self::ReportIssue,
        Self::Delay,
    ];

    /// Parses an action from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - string form of the verb (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] if the string does not match any
    /// known action.
    pub fn parse(s: &str) -> ModelResult<Self> {
        match s.to_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            "treat" => Ok(Self::Treat),
            "cancel" => Ok(Self::Cancel),
            "start" => Ok(Self::Start),
            "complete" => Ok(Self::Complete),
            "confirm" => Ok(Self::Confirm),
            "miss" => Ok(Self::Miss),
            "not_home" => Ok(Self::NotHome),
            "not_allowed" => Ok(Self::NotAllowed),
            "check_in" => Ok(Self::CheckIn),
            "report_issue" => Ok(Self::ReportIssue),
            "delay" => Ok(Self::Delay),
            _ => Err(ModelError::InvalidInput(format!("Invalid action: {}", s))),
        }
    }

    /// Returns the string representation of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Treat => "treat",
            Self::Cancel => "cancel",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Confirm => "confirm",
            Self::Miss => "miss",
            Self::NotHome => "not_home",
            Self::NotAllowed => "not_allowed",
            Self::CheckIn => "check_in",
            Self::ReportIssue => "report_issue",
            Self::Delay => "delay",
        }
    }
}

impl std::fmt::Display for CaseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_action() {
        for action in CaseAction::ALL {
            assert_eq!(CaseAction::parse(action.as_str()).unwrap(), action);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(CaseAction::parse("ACCEPT").unwrap(), CaseAction::Accept);
        assert_eq!(CaseAction::parse("Not_Home").unwrap(), CaseAction::NotHome);
    }

    #[test]
    fn parse_rejects_unknown_verbs() {
        assert!(CaseAction::parse("approve").is_err());
        assert!(CaseAction::parse("").is_err());
    }
}
