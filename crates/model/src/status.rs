//! Case kinds and their status graphs.
//!
//! Each case kind has its own status enum, and each status enum carries its
//! own transition table: `successor(action)` answers "where does this verb
//! lead from here", and `None` means the edge does not exist. [`CaseStatus`]
//! is the tagged union the rest of the system stores and dispatches on, so
//! a home-visit status can never be confused with a referral status.
//!
//! Terminal statuses have no outgoing edges; once a record reaches one, no
//! action moves it again.

use crate::action::CaseAction;
use serde::{Deserialize, Serialize};

// ============================================================================
// Case kinds
// ============================================================================

/// The kind of a case record, determining which status graph applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    /// A request to move a patient's care from one facility to another.
    Referral,
    /// A scheduled in-home check conducted by a primary-care unit.
    HomeVisit,
    /// A booked facility appointment.
    Appointment,
    /// A remote consultation between a patient/local unit and a specialist.
    TeleSession,
}

impl CaseKind {
    /// Returns the entry status new records of this kind start in.
    pub fn entry_status(self) -> CaseStatus {
        match self {
            Self::Referral => CaseStatus::Referral(ReferralStatus::Pending),
            Self::HomeVisit => CaseStatus::HomeVisit(HomeVisitStatus::Pending),
            Self::Appointment => CaseStatus::Appointment(AppointmentStatus::Waiting),
            Self::TeleSession => CaseStatus::TeleSession(TeleSessionStatus::Scheduled),
        }
    }

    /// Returns the status `action` produces for this kind, from any state
    /// that has the matching edge.
    ///
    /// This names the *target* of a verb independent of the current status;
    /// whether the edge actually exists from a given status is answered by
    /// [`CaseStatus::successor`].
    pub fn action_target(self, action: CaseAction) -> Option<CaseStatus> {
        match self {
            Self::Referral => ReferralStatus::action_target(action).map(CaseStatus::Referral),
            Self::HomeVisit => HomeVisitStatus::action_target(action).map(CaseStatus::HomeVisit),
            Self::Appointment => {
                AppointmentStatus::action_target(action).map(CaseStatus::Appointment)
            }
            Self::TeleSession => {
                TeleSessionStatus::action_target(action).map(CaseStatus::TeleSession)
            }
        }
    }

    /// Returns the string representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Referral => "referral",
            Self::HomeVisit => "home_visit",
            Self::Appointment => "appointment",
            Self::TeleSession => "tele_session",
        }
    }
}

impl std::fmt::Display for CaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Per-kind status enums
// ============================================================================

/// Status of a referral case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    /// Sent to the destination facility, awaiting their decision.
    Pending,
    /// Destination facility accepted and scheduled the patient.
    Accepted,
    /// Patient was treated at the destination facility.
    Treated,
    /// Destination facility declined the referral.
    Rejected,
    /// Withdrawn by the originating side.
    Cancelled,
}

impl ReferralStatus {
    /// Returns the status `action` leads to from this one, if the edge exists.
    pub fn successor(self, action: CaseAction) -> Option<Self> {
        match (self, action) {
            (Self::Pending, CaseAction::Accept) => Some(Self::Accepted),
            (Self::Pending, CaseAction::Reject) => Some(Self::Rejected),
            (Self::Pending, CaseAction::Cancel) => Some(Self::Cancelled),
            (Self::Accepted, CaseAction::Treat) => Some(Self::Treated),
            (Self::Accepted, CaseAction::Cancel) => Some(Self::Cancelled),
            _ => None,
        }
    }

    fn action_target(action: CaseAction) -> Option<Self> {
        match action {
            CaseAction::Accept => Some(Self::Accepted),
            CaseAction::Reject => Some(Self::Rejected),
            CaseAction::Cancel => Some(Self::Cancelled),
            CaseAction::Treat => Some(Self::Treated),
            _ => None,
        }
    }

    /// Whether this status has no outgoing edges.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Treated | Self::Rejected | Self::Cancelled)
    }

    /// Returns the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Treated => "treated",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Status of a home-visit case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeVisitStatus {
    /// Requested, awaiting the conducting unit's acceptance.
    Pending,
    /// Accepted; visit date agreed, not yet under way.
    WaitVisit,
    /// Visit currently being conducted.
    InProgress,
    /// Visit finished.
    Completed,
    /// Conducting unit declined the request.
    Rejected,
    /// Nobody answered at the home.
    NotHome,
    /// The household refused the visit.
    NotAllowed,
}

impl HomeVisitStatus {
    /// Returns the status `action` leads to from this one, if the edge exists.
    pub fn successor(self, action: CaseAction) -> Option<Self> {
        match (self, action) {
            (Self::Pending, CaseAction::Accept) => Some(Self::WaitVisit),
            (Self::WaitVisit, CaseAction::Start) => Some(Self::InProgress),
            (Self::WaitVisit, CaseAction::Reject) => Some(Self::Rejected),
            (Self::WaitVisit, CaseAction::NotHome) => Some(Self::NotHome),
            (Self::WaitVisit, CaseAction::NotAllowed) => Some(Self::NotAllowed),
            (Self::InProgress, CaseAction::Complete) => Some(Self::Completed),
            _ => None,
        }
    }

    fn action_target(action: CaseAction) -> Option<Self> {
        match action {
            CaseAction::Accept => Some(Self::WaitVisit),
            CaseAction::Start => Some(Self::InProgress),
            CaseAction::Complete => Some(Self::Completed),
            CaseAction::Reject => Some(Self::Rejected),
            CaseAction::NotHome => Some(Self::NotHome),
            CaseAction::NotAllowed => Some(Self::NotAllowed),
            _ => None,
        }
    }

    /// Whether this status has no outgoing edges.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Rejected | Self::NotHome | Self::NotAllowed
        )
    }

    /// Returns the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::WaitVisit => "wait_visit",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::NotHome => "not_home",
            Self::NotAllowed => "not_allowed",
        }
    }
}

/// Status of an appointment case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, awaiting the facility's confirmation.
    Waiting,
    /// Confirmed by the facility.
    Confirmed,
    /// Patient attended and the appointment finished.
    Completed,
    /// Patient did not attend.
    Missed,
    /// Called off before it took place.
    Cancelled,
}

impl AppointmentStatus {
    /// Returns the status `action` leads to from this one, if the edge exists.
    pub fn successor(self, action: CaseAction) -> Option<Self> {
        match (self, action) {
            (Self::Waiting, CaseAction::Confirm) => Some(Self::Confirmed),
            (Self::Waiting, CaseAction::Cancel) => Some(Self::Cancelled),
            (Self::Confirmed, CaseAction::Complete) => Some(Self::Completed),
            (Self::Confirmed, CaseAction::Miss) => Some(Self::Missed),
            _ => None,
        }
    }

    fn action_target(action: CaseAction) -> Option<Self> {
        match action {
            CaseAction::Confirm => Some(Self::Confirmed),
            CaseAction::Cancel => Some(Self::Cancelled),
            CaseAction::Complete => Some(Self::Completed),
            CaseAction::Miss => Some(Self::Missed),
            _ => None,
        }
    }

    /// Whether this status has no outgoing edges.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Missed | Self::Cancelled)
    }

    /// Returns the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Missed => "missed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Status of a tele-session case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeleSessionStatus {
    /// Booked for a future slot.
    Scheduled,
    /// Checked in, waiting for the specialist.
    Waiting,
    /// A technical problem is blocking the session.
    TechIssue,
    /// Pushed back past its slot.
    Delayed,
    /// Consultation under way.
    Active,
    /// Consultation finished.
    Completed,
}

impl TeleSessionStatus {
    /// Returns the status `action` leads to from this one, if the edge exists.
    ///
    /// `Delayed` and `TechIssue` both keep a `start` edge: a pushed-back or
    /// tech-troubled session can still begin.
    pub fn successor(self, action: CaseAction) -> Option<Self> {
        match (self, action) {
            (Self::Scheduled, CaseAction::CheckIn) => Some(Self::Waiting),
            (Self::Scheduled, CaseAction::ReportIssue) => Some(Self::TechIssue),
            (Self::Waiting, CaseAction::Start) => Some(Self::Active),
            (Self::Waiting, CaseAction::Delay) => Some(Self::Delayed),
            (Self::TechIssue, CaseAction::Start) => Some(Self::Active),
            (Self::Delayed, CaseAction::Start) => Some(Self::Active),
            (Self::Active, CaseAction::Complete) => Some(Self::Completed),
            _ => None,
        }
    }

    fn action_target(action: CaseAction) -> Option<Self> {
        match action {
            CaseAction::CheckIn => Some(Self::Waiting),
            CaseAction::ReportIssue => Some(Self::TechIssue),
            CaseAction::Start => Some(Self::Active),
            CaseAction::Delay => Some(Self::Delayed),
            CaseAction::Complete => Some(Self::Completed),
            _ => None,
        }
    }

    /// Whether this status has no outgoing edges.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Waiting => "waiting",
            Self::TechIssue => "tech_issue",
            Self::Delayed => "delayed",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

// ============================================================================
// Tagged status union
// ============================================================================

/// The status of a case record, tagged by kind.
///
/// Dispatching through this union replaces the scattered per-kind string
/// literals of ad hoc status handling: every match on a `CaseStatus` is
/// checked against the full vocabulary at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    Referral(ReferralStatus),
    HomeVisit(HomeVisitStatus),
    Appointment(AppointmentStatus),
    TeleSession(TeleSessionStatus),
}

impl CaseStatus {
    /// Returns the kind whose graph this status belongs to.
    pub fn kind(&self) -> CaseKind {
        match self {
            Self::Referral(_) => CaseKind::Referral,
            Self::HomeVisit(_) => CaseKind::HomeVisit,
            Self::Appointment(_) => CaseKind::Appointment,
            Self::TeleSession(_) => CaseKind::TeleSession,
        }
    }

    /// Returns the status `action` leads to from this one, if the edge exists.
    pub fn successor(&self, action: CaseAction) -> Option<CaseStatus> {
        match self {
            Self::Referral(s) => s.successor(action).map(Self::Referral),
            Self::HomeVisit(s) => s.successor(action).map(Self::HomeVisit),
            Self::Appointment(s) => s.successor(action).map(Self::Appointment),
            Self::TeleSession(s) => s.successor(action).map(Self::TeleSession),
        }
    }

    /// Whether this status has no outgoing edges in its graph.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Referral(s) => s.is_terminal(),
            Self::HomeVisit(s) => s.is_terminal(),
            Self::Appointment(s) => s.is_terminal(),
            Self::TeleSession(s) => s.is_terminal(),
        }
    }

    /// Returns the string representation of the inner status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Referral(s) => s.as_str(),
            Self::HomeVisit(s) => s.as_str(),
            Self::Appointment(s) => s.as_str(),
            Self::TeleSession(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
