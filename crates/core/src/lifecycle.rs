//! Transition policy: who may do what, with which payload.
//!
//! The status graphs live on the status enums in `careflow-model`; this
//! module holds everything else the lifecycle engine consults before
//! committing a transition:
//! - the permission table mapping `(kind, action)` to the side of the case
//!   allowed to perform it
//! - the transition payload carrier and its per-action validation
//! - derivation of the audit-log note for an applied transition
//!
//! The permission table is resolved once when the service is constructed
//! and passed in, never read from ambient state mid-request.

use crate::error::{CoordinationError, CoordinationResult};
use crate::record::CaseRecord;
use careflow_model::{CaseAction, CaseKind, Role};
use careflow_types::NonEmptyText;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Role requirements
// ============================================================================

/// Which side of a case may perform an action.
///
/// Requirements are resolved against the record's explicit `owner_role` and
/// `counterpart_role` fields; facility names are never compared as text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleRequirement {
    /// Only the role that created the record.
    Owner,
    /// Only the role awaited on the other side of the record.
    Counterpart,
    /// Either side.
    OwnerOrCounterpart,
}

impl RoleRequirement {
    /// Whether `actor` satisfies this requirement for `record`.
    pub fn permits(self, record: &CaseRecord, actor: &Role) -> bool {
        let is_owner = record.owner_role() == actor;
        let is_counterpart = record.counterpart_role() == Some(actor);
        match self {
            Self::Owner => is_owner,
            Self::Counterpart => is_counterpart,
            Self::OwnerOrCounterpart => is_owner || is_counterpart,
        }
    }

    /// Returns the string representation of this requirement.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Counterpart => "counterpart",
            Self::OwnerOrCounterpart => "owner or counterpart",
        }
    }
}

impl std::fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Permission table
// ============================================================================

/// Mapping of `(kind, action)` to the role requirement that gates it.
#[derive(Clone, Debug)]
pub struct PermissionTable {
    rules: HashMap<(CaseKind, CaseAction), RoleRequirement>,
}

impl PermissionTable {
    /// The standard policy.
    ///
    /// The counterpart side decides and conducts (accepts, rejects, treats,
    /// starts, completes, confirms, marks missed, records visit outcomes,
    /// delays); the owning side withdraws referrals and checks tele-sessions
    /// in; appointment cancellation is open to either side.
    pub fn standard() -> Self {
        use CaseAction::*;
        use CaseKind::*;
        use RoleRequirement::*;

        let rules = [
            (Referral, Accept, Counterpart),
            (Referral, Reject, Counterpart),
            (Referral, Treat, Counterpart),
            (Referral, Cancel, Owner),
            (HomeVisit, Accept, Counterpart),
            (HomeVisit, Start, Counterpart),
            (HomeVisit, Complete, Counterpart),
            (HomeVisit, Reject, Counterpart),
            (HomeVisit, NotHome, Counterpart),
            (HomeVisit, NotAllowed, Counterpart),
            (Appointment, Confirm, Counterpart),
            (Appointment, Cancel, OwnerOrCounterpart),
            (Appointment, Complete, Counterpart),
            (Appointment, Miss, Counterpart),
            (TeleSession, CheckIn, Owner),
            (TeleSession, ReportIssue, OwnerOrCounterpart),
            (TeleSession, Start, Counterpart),
            (TeleSession, Delay, Counterpart),
            (TeleSession, Complete, Counterpart),
        ];

        Self {
            rules: rules
                .into_iter()
                .map(|(kind, action, requirement)| ((kind, action), requirement))
                .collect(),
        }
    }

    /// Overrides (or adds) a single rule, builder-style.
    pub fn with_rule(
        mut self,
        kind: CaseKind,
        action: CaseAction,
        requirement: RoleRequirement,
    ) -> Self {
        self.rules.insert((kind, action), requirement);
        self
    }

    /// Looks up the requirement gating `action` on records of `kind`.
    pub fn requirement(&self, kind: CaseKind, action: CaseAction) -> Option<RoleRequirement> {
        self.rules.get(&(kind, action)).copied()
    }

    /// Whether `actor` may perform at least one action on `record` from its
    /// current status. Drives the "awaiting action" badge counts.
    pub fn can_act(&self, record: &CaseRecord, actor: &Role) -> bool {
        CaseAction::ALL.iter().any(|&action| {
            record.status().successor(action).is_some()
                && self
                    .requirement(record.kind(), action)
                    .is_some_and(|req| req.permits(record, actor))
        })
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Transition payload
// ============================================================================

/// Caller-supplied payload accompanying a transition request.
#[derive(Clone, Debug, Default)]
pub struct TransitionPayload {
    /// Mandatory for `reject`; recorded on the record.
    pub reason: Option<String>,

    /// Mandatory for `accept`; must be today or later.
    pub date: Option<NaiveDate>,

    /// Optional free text appended to the audit-log note.
    pub note: Option<String>,

    /// Optimistic concurrency check: when present, the transition only
    /// applies if the record is still at this version.
    pub expected_version: Option<u64>,
}

impl TransitionPayload {
    /// Payload carrying nothing but an optional note.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Payload for an `accept` transition.
    pub fn accept_on(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Payload for a `reject` transition.
    pub fn reject_because(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Validated, denormalizable payload fields for one action.
#[derive(Clone, Debug, Default)]
pub(crate) struct ValidatedPayload {
    pub accepted_date: Option<NaiveDate>,
    pub reject_reason: Option<NonEmptyText>,
}

/// Checks the action-specific payload requirements.
///
/// `reject` requires a non-empty reason; `accept` requires a date that is
/// `today` or later. Other actions carry no mandatory payload.
///
/// # Errors
///
/// Returns [`CoordinationError::Validation`] naming the offending field.
pub(crate) fn validate_payload(
    action: CaseAction,
    payload: &TransitionPayload,
    today: NaiveDate,
) -> CoordinationResult<ValidatedPayload> {
    match action {
        CaseAction::Reject => {
            let reason = payload.reason.as_deref().unwrap_or_default();
            let reason = NonEmptyText::new(reason).map_err(|_| CoordinationError::Validation {
                field: "reason",
                reason: "a non-empty reason is required to reject".into(),
            })?;
            Ok(ValidatedPayload {
                reject_reason: Some(reason),
                ..ValidatedPayload::default()
            })
        }
        CaseAction::Accept => {
            let date = payload.date.ok_or(CoordinationError::Validation {
                field: "date",
                reason: "a date is required to accept".into(),
            })?;
            if date < today {
                return Err(CoordinationError::Validation {
                    field: "date",
                    reason: format!("accepted date {} is in the past", date),
                });
            }
            Ok(ValidatedPayload {
                accepted_date: Some(date),
                ..ValidatedPayload::default()
            })
        }
        _ => Ok(ValidatedPayload::default()),
    }
}

/// Derives the audit-log note for an applied transition.
pub(crate) fn transition_note(
    action: CaseAction,
    validated: &ValidatedPayload,
    payload_note: Option<&str>,
) -> String {
    let base = match action {
        CaseAction::Accept => match validated.accepted_date {
            Some(date) => format!("accepted for {}", date),
            None => "accepted".to_string(),
        },
        CaseAction::Reject => match &validated.reject_reason {
            Some(reason) => format!("rejected: {}", reason),
            None => "rejected".to_string(),
        },
        CaseAction::Treat => "patient treated".to_string(),
        CaseAction::Cancel => "cancelled".to_string(),
        CaseAction::Start => "started".to_string(),
        CaseAction::Complete => "completed".to_string(),
        CaseAction::Confirm => "confirmed".to_string(),
        CaseAction::Miss => "marked missed".to_string(),
        CaseAction::NotHome => "patient not home".to_string(),
        CaseAction::NotAllowed => "visit not allowed".to_string(),
        CaseAction::CheckIn => "checked in".to_string(),
        CaseAction::ReportIssue => "technical issue reported".to_string(),
        CaseAction::Delay => "delayed".to_string(),
    };

    match payload_note.map(str::trim) {
        Some(text) if !text.is_empty() => format!("{}; {}", base, text),
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CaseId, CaseIntake, CaseRecord};
    use careflow_model::Urgency;
    use careflow_types::{HealthNumber, NonEmptyText};
    use chrono::Utc;

    fn referral(owner: Role, counterpart: Role) -> CaseRecord {
        CaseRecord::create(
            CaseId::generate(),
            CaseIntake {
                kind: CaseKind::Referral,
                subject: HealthNumber::new("HN-2001").unwrap(),
                subject_name: NonEmptyText::new("Pranee K.").unwrap(),
                origin_facility: Some("PCU North".into()),
                destination_facility: Some("General Hospital".into()),
                urgency: Urgency::Urgent,
                counterpart_role: Some(counterpart),
                scheduled_for: Utc::now(),
                note: None,
            },
            owner,
            Utc::now(),
        )
    }

    #[test]
    fn standard_table_gates_every_graph_edge() {
        // every action with an edge anywhere in a kind's graph has a rule
        let table = PermissionTable::standard();
        for kind in [
            CaseKind::Referral,
            CaseKind::HomeVisit,
            CaseKind::Appointment,
            CaseKind::TeleSession,
        ] {
            for action in CaseAction::ALL {
                if kind.action_target(action).is_some() {
                    assert!(
                        table.requirement(kind, action).is_some(),
                        "no rule for {kind}/{action}"
                    );
                }
            }
        }
    }

    #[test]
    fn requirement_permits_matches_record_sides() {
        let owner = Role::primary_care_unit("PCU North");
        let counterpart = Role::hospital("General Hospital");
        let outsider = Role::hospital("Other Hospital");
        let record = referral(owner.clone(), counterpart.clone());

        assert!(RoleRequirement::Owner.permits(&record, &owner));
        assert!(!RoleRequirement::Owner.permits(&record, &counterpart));
        assert!(RoleRequirement::Counterpart.permits(&record, &counterpart));
        assert!(!RoleRequirement::Counterpart.permits(&record, &outsider));
        assert!(RoleRequirement::OwnerOrCounterpart.permits(&record, &owner));
        assert!(RoleRequirement::OwnerOrCounterpart.permits(&record, &counterpart));
        assert!(!RoleRequirement::OwnerOrCounterpart.permits(&record, &outsider));
    }

    #[test]
    fn can_act_reflects_current_status_and_side() {
        let owner = Role::primary_care_unit("PCU North");
        let counterpart = Role::hospital("General Hospital");
        let table = PermissionTable::standard();
        let record = referral(owner.clone(), counterpart.clone());

        // pending referral: counterpart accepts/rejects, owner may cancel
        assert!(table.can_act(&record, &counterpart));
        assert!(table.can_act(&record, &owner));
        assert!(!table.can_act(&record, &Role::oversight()));
        assert!(!table.can_act(&record, &Role::hospital("Other Hospital")));
    }

    #[test]
    fn reject_requires_non_blank_reason() {
        let today = Utc::now().date_naive();
        let blank = TransitionPayload::reject_because("   ");
        let err = validate_payload(CaseAction::Reject, &blank, today).unwrap_err();
        assert!(matches!(
            err,
            CoordinationError::Validation { field: "reason", .. }
        ));

        let ok = validate_payload(
            CaseAction::Reject,
            &TransitionPayload::reject_because("no capacity"),
            today,
        )
        .unwrap();
        assert_eq!(ok.reject_reason.unwrap().as_str(), "no capacity");
    }

    #[test]
    fn accept_requires_present_or_future_date() {
        let today = Utc::now().date_naive();

        let missing = validate_payload(CaseAction::Accept, &TransitionPayload::empty(), today);
        assert!(matches!(
            missing.unwrap_err(),
            CoordinationError::Validation { field: "date", .. }
        ));

        let yesterday = today.pred_opt().unwrap();
        let past = validate_payload(
            CaseAction::Accept,
            &TransitionPayload::accept_on(yesterday),
            today,
        );
        assert!(matches!(
            past.unwrap_err(),
            CoordinationError::Validation { field: "date", .. }
        ));

        let ok =
            validate_payload(CaseAction::Accept, &TransitionPayload::accept_on(today), today)
                .unwrap();
        assert_eq!(ok.accepted_date, Some(today));
    }

    #[test]
    fn other_actions_need_no_payload() {
        let today = Utc::now().date_naive();
        for action in [CaseAction::Start, CaseAction::Complete, CaseAction::Cancel] {
            assert!(validate_payload(action, &TransitionPayload::empty(), today).is_ok());
        }
    }

    #[test]
    fn notes_describe_the_action_and_append_free_text() {
        let today = Utc::now().date_naive();
        let validated = validate_payload(
            CaseAction::Accept,
            &TransitionPayload::accept_on(today),
            today,
        )
        .unwrap();
        assert_eq!(
            transition_note(CaseAction::Accept, &validated, None),
            format!("accepted for {}", today)
        );
        assert_eq!(
            transition_note(CaseAction::Cancel, &ValidatedPayload::default(), Some("patient request")),
            "cancelled; patient request"
        );
    }
}
