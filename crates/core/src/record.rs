//! Case records and their audit log.
//!
//! A [`CaseRecord`] is the unit the whole core operates on. Its `status`,
//! `log` and `version` fields are private: the only way they change is the
//! lifecycle engine committing a validated transition, so a record can never
//! hold a status its kind's graph cannot reach. Everything else is exposed
//! through read accessors.

use careflow_model::{CaseKind, CaseStatus, Role, Urgency};
use careflow_types::{HealthNumber, NonEmptyText};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Opaque unique identifier of a case record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CaseId(Uuid);

impl CaseId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry in a record's append-only audit log.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogEntry {
    /// Status the record held after this entry was written.
    pub status: CaseStatus,

    /// When the entry was written.
    pub timestamp: DateTime<Utc>,

    /// The role that caused it.
    pub actor: Role,

    /// Derived description of what happened.
    pub note: String,
}

/// Intake data collected by a form collaborator when a case is created.
///
/// This is a plain carrier; validation happens in
/// [`CoordinationService::create_record`](crate::service::CoordinationService::create_record).
#[derive(Clone, Debug)]
pub struct CaseIntake {
    /// Which status graph the new record lives in.
    pub kind: CaseKind,

    /// The patient the case concerns.
    pub subject: HealthNumber,

    /// Patient display name, used by text search.
    pub subject_name: NonEmptyText,

    /// Facility the case originates from.
    pub origin_facility: Option<String>,

    /// Facility the case is directed at (required for referrals and
    /// tele-sessions).
    pub destination_facility: Option<String>,

    /// Urgency of the case.
    pub urgency: Urgency,

    /// The role awaited on the other side of the case (required for
    /// referrals and tele-sessions).
    pub counterpart_role: Option<Role>,

    /// Date/time of the underlying event (visit, appointment, session).
    pub scheduled_for: DateTime<Utc>,

    /// Free-text note recorded with the creation log entry.
    pub note: Option<String>,
}

/// A case record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaseRecord {
    id: CaseId,
    subject: HealthNumber,
    subject_name: NonEmptyText,
    status: CaseStatus,
    origin_facility: Option<String>,
    destination_facility: Option<String>,
    urgency: Urgency,
    owner_role: Role,
    counterpart_role: Option<Role>,
    created_at: DateTime<Utc>,
    scheduled_for: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    accepted_date: Option<NaiveDate>,
    reject_reason: Option<NonEmptyText>,
    version: u64,
    log: Vec<LogEntry>,
}

impl CaseRecord {
    /// Builds a new record in its kind's entry status with the creation
    /// log entry written. Only the service constructs records.
    pub(crate) fn create(
        id: CaseId,
        intake: CaseIntake,
        owner_role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        let status = intake.kind.entry_status();
        let note = match intake.note.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => format!("created; {}", text),
            _ => "created".to_string(),
        };

        Self {
            id,
            subject: intake.subject,
            subject_name: intake.subject_name,
            status,
            origin_facility: intake.origin_facility,
            destination_facility: intake.destination_facility,
            urgency: intake.urgency,
            owner_role: owner_role.clone(),
            counterpart_role: intake.counterpart_role,
            created_at: now,
            scheduled_for: intake.scheduled_for,
            updated_at: now,
            accepted_date: None,
            reject_reason: None,
            version: 1,
            log: vec![LogEntry {
                status,
                timestamp: now,
                actor: owner_role,
                note,
            }],
        }
    }

    /// Commits a validated transition: new status, denormalized action
    /// fields, one appended log entry, bumped version.
    ///
    /// Callers must have already checked the graph edge, the permission
    /// table, and the payload; this method applies the whole update or is
    /// not called at all.
    pub(crate) fn commit(
        &mut self,
        status: CaseStatus,
        actor: Role,
        note: String,
        accepted_date: Option<NaiveDate>,
        reject_reason: Option<NonEmptyText>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        if accepted_date.is_some() {
            self.accepted_date = accepted_date;
        }
        if reject_reason.is_some() {
            self.reject_reason = reject_reason;
        }
        self.updated_at = now;
        self.version += 1;
        self.log.push(LogEntry {
            status,
            timestamp: now,
            actor,
            note,
        });
    }

    pub fn id(&self) -> CaseId {
        self.id
    }

    pub fn kind(&self) -> CaseKind {
        self.status.kind()
    }

    pub fn subject(&self) -> &HealthNumber {
        &self.subject
    }

    pub fn subject_name(&self) -> &NonEmptyText {
        &self.subject_name
    }

    pub fn status(&self) -> CaseStatus {
        self.status
    }

    pub fn origin_facility(&self) -> Option<&str> {
        self.origin_facility.as_deref()
    }

    pub fn destination_facility(&self) -> Option<&str> {
        self.destination_facility.as_deref()
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn owner_role(&self) -> &Role {
        &self.owner_role
    }

    pub fn counterpart_role(&self) -> Option<&Role> {
        self.counterpart_role.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn scheduled_for(&self) -> DateTime<Utc> {
        self.scheduled_for
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn accepted_date(&self) -> Option<NaiveDate> {
        self.accepted_date
    }

    pub fn reject_reason(&self) -> Option<&NonEmptyText> {
        self.reject_reason.as_ref()
    }

    /// Monotonic version, starting at 1 and incremented by every applied
    /// transition. Used for the optimistic lost-update check.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The append-only audit log; the first entry always records creation.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careflow_model::ReferralStatus;

    fn referral_intake() -> CaseIntake {
        CaseIntake {
            kind: CaseKind::Referral,
            subject: HealthNumber::new("HN-1001").unwrap(),
            subject_name: NonEmptyText::new("Somsak P.").unwrap(),
            origin_facility: Some("PCU North".into()),
            destination_facility: Some("General Hospital".into()),
            urgency: Urgency::Normal,
            counterpart_role: Some(Role::hospital("General Hospital")),
            scheduled_for: Utc::now(),
            note: None,
        }
    }

    #[test]
    fn create_starts_at_entry_status_with_one_log_entry() {
        let now = Utc::now();
        let record = CaseRecord::create(
            CaseId::generate(),
            referral_intake(),
            Role::primary_care_unit("PCU North"),
            now,
        );

        assert_eq!(record.status(), CaseStatus::Referral(ReferralStatus::Pending));
        assert_eq!(record.version(), 1);
        assert_eq!(record.log().len(), 1);
        assert_eq!(record.log()[0].status, record.status());
        assert_eq!(record.log()[0].note, "created");
        assert_eq!(record.created_at(), now);
        assert_eq!(record.updated_at(), now);
    }

    #[test]
    fn create_appends_intake_note_to_log() {
        let record = CaseRecord::create(
            CaseId::generate(),
            CaseIntake {
                note: Some("walk-in triage".into()),
                ..referral_intake()
            },
            Role::primary_care_unit("PCU North"),
            Utc::now(),
        );
        assert_eq!(record.log()[0].note, "created; walk-in triage");
    }

    #[test]
    fn commit_moves_status_and_grows_log() {
        let mut record = CaseRecord::create(
            CaseId::generate(),
            referral_intake(),
            Role::primary_care_unit("PCU North"),
            Utc::now(),
        );

        let later = Utc::now();
        let date = later.date_naive();
        record.commit(
            CaseStatus::Referral(ReferralStatus::Accepted),
            Role::hospital("General Hospital"),
            "accepted".into(),
            Some(date),
            None,
            later,
        );

        assert_eq!(record.status(), CaseStatus::Referral(ReferralStatus::Accepted));
        assert_eq!(record.version(), 2);
        assert_eq!(record.log().len(), 2);
        assert_eq!(record.accepted_date(), Some(date));
        assert_eq!(record.updated_at(), later);
    }

    #[test]
    fn record_serializes_with_snake_case_status() {
        let record = CaseRecord::create(
            CaseId::generate(),
            referral_intake(),
            Role::primary_care_unit("PCU North"),
            Utc::now(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"]["kind"], "referral");
        assert_eq!(json["status"]["status"], "pending");
        assert_eq!(json["subject"], "HN-1001");
        assert_eq!(json["version"], 1);
    }
}
