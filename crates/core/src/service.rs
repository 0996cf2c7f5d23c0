//! Coordination service: the single path by which case records change.
//!
//! The service owns a [`CaseStore`] and a [`PermissionTable`] (both supplied
//! at construction) and exposes the function contract consumed by the view
//! and intake layers: record creation, transitions, and the audit trail.
//! The per-role query surface lives in [`crate::views`] on the same type.
//!
//! A transition either applies in full (status, denormalized fields, one
//! log entry, version bump) or leaves the record untouched; the updated
//! record is only written back to the store after every check has passed.

use crate::error::{CoordinationError, CoordinationResult};
use crate::lifecycle::{
    transition_note, validate_payload, PermissionTable, TransitionPayload,
};
use crate::record::{CaseId, CaseIntake, CaseRecord, LogEntry};
use crate::store::{CaseStore, InMemoryStore};
use careflow_model::{CaseAction, CaseKind, Role};
use chrono::Utc;

/// Retry budget for the (theoretical) case-id collision at creation.
const MAX_ID_ATTEMPTS: usize = 5;

/// Service managing case record operations.
pub struct CoordinationService<S: CaseStore = InMemoryStore> {
    store: S,
    permissions: PermissionTable,
}

impl CoordinationService<InMemoryStore> {
    /// Creates a service over an empty in-memory store with the standard
    /// permission table.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new(), PermissionTable::standard())
    }
}

impl<S: CaseStore> CoordinationService<S> {
    /// Creates a service over `store`, gated by `permissions`.
    pub fn new(store: S, permissions: PermissionTable) -> Self {
        Self { store, permissions }
    }

    /// The permission table in force.
    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[CaseRecord] {
        self.store.records()
    }

    /// Looks up a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::RecordNotFound`] if absent.
    pub fn record(&self, id: CaseId) -> CoordinationResult<&CaseRecord> {
        self.store
            .get(id)
            .ok_or(CoordinationError::RecordNotFound(id))
    }

    /// The append-only audit trail of a record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::RecordNotFound`] if absent.
    pub fn audit_trail(&self, id: CaseId) -> CoordinationResult<&[LogEntry]> {
        Ok(self.record(id)?.log())
    }

    /// Creates a new case record from intake data.
    ///
    /// Validates the intake (urgency allowed for the kind; referrals and
    /// tele-sessions carry a destination facility and counterpart role),
    /// assigns a fresh id, sets the kind's entry status and writes the
    /// creation log entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::Validation`] for inconsistent intake
    /// data and [`CoordinationError::DuplicateId`] if no unused id could be
    /// allocated.
    pub fn create_record(
        &mut self,
        intake: CaseIntake,
        creator_role: Role,
    ) -> CoordinationResult<CaseRecord> {
        validate_intake(&intake, &creator_role)?;

        let mut id = CaseId::generate();
        let mut attempts = 1;
        while self.store.get(id).is_some() {
            if attempts >= MAX_ID_ATTEMPTS {
                return Err(CoordinationError::DuplicateId(id));
            }
            id = CaseId::generate();
            attempts += 1;
        }

        let record = CaseRecord::create(id, intake, creator_role, Utc::now());
        tracing::debug!(id = %record.id(), kind = %record.kind(), "case record created");
        self.store.put(record.clone());
        Ok(record)
    }

    /// Applies a transition to a record.
    ///
    /// Checks run in order: record lookup, optimistic version check, graph
    /// edge, permission, payload. Only when all pass is the record updated
    /// and written back; any failure leaves the store unchanged.
    ///
    /// # Arguments
    ///
    /// * `id` - The record to transition.
    /// * `action` - The requested verb.
    /// * `payload` - Action payload (reason, date, note, expected version).
    /// * `acting_role` - The role making the request.
    ///
    /// # Returns
    ///
    /// The updated record on success.
    ///
    /// # Errors
    ///
    /// - [`CoordinationError::RecordNotFound`] - no record with `id`
    /// - [`CoordinationError::StaleVersion`] - `payload.expected_version`
    ///   differs from the record's current version
    /// - [`CoordinationError::InvalidTransition`] - `action` has no edge
    ///   from the record's current status
    /// - [`CoordinationError::PermissionDenied`] - `acting_role` is not on
    ///   the side of the case the permission table requires
    /// - [`CoordinationError::Validation`] - missing/invalid payload field
    pub fn apply_transition(
        &mut self,
        id: CaseId,
        action: CaseAction,
        payload: &TransitionPayload,
        acting_role: &Role,
    ) -> CoordinationResult<CaseRecord> {
        let record = self.store.get(id).ok_or_else(|| {
            tracing::warn!(id = %id, action = %action, "transition requested against unknown case");
            CoordinationError::RecordNotFound(id)
        })?;

        if let Some(expected) = payload.expected_version {
            if expected != record.version() {
                return Err(CoordinationError::StaleVersion {
                    expected,
                    found: record.version(),
                });
            }
        }

        let current = record.status();
        let target = current
            .successor(action)
            .ok_or(CoordinationError::InvalidTransition {
                current,
                action,
                target: record.kind().action_target(action),
            })?;

        let requirement = self.permissions.requirement(record.kind(), action);
        let permitted = requirement.is_some_and(|req| req.permits(record, acting_role));
        if !permitted {
            return Err(CoordinationError::PermissionDenied {
                action,
                required: requirement,
                actual: acting_role.clone(),
            });
        }

        let now = Utc::now();
        let validated = validate_payload(action, payload, now.date_naive())?;
        let note = transition_note(action, &validated, payload.note.as_deref());

        let mut updated = record.clone();
        updated.commit(
            target,
            acting_role.clone(),
            note,
            validated.accepted_date,
            validated.reject_reason,
            now,
        );

        tracing::debug!(id = %id, from = %current, to = %target, action = %action, "transition applied");
        self.store.put(updated.clone());
        Ok(updated)
    }
}

/// Checks intake data consistency before a record is created.
fn validate_intake(intake: &CaseIntake, creator_role: &Role) -> CoordinationResult<()> {
    if creator_role.is_oversight() {
        return Err(CoordinationError::Validation {
            field: "creator_role",
            reason: "oversight roles are read-only and cannot create records".into(),
        });
    }

    if !intake.urgency.allowed_for(intake.kind) {
        return Err(CoordinationError::Validation {
            field: "urgency",
            reason: format!(
                "{} urgency is not available for {} records",
                intake.urgency, intake.kind
            ),
        });
    }

    if matches!(intake.kind, CaseKind::Referral | CaseKind::TeleSession) {
        let has_destination = intake
            .destination_facility
            .as_deref()
            .is_some_and(|f| !f.trim().is_empty());
        if !has_destination {
            return Err(CoordinationError::Validation {
                field: "destination_facility",
                reason: format!("{} records require a destination facility", intake.kind),
            });
        }
        if intake.counterpart_role.is_none() {
            return Err(CoordinationError::Validation {
                field: "counterpart_role",
                reason: format!("{} records require a counterpart role", intake.kind),
            });
        }
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
