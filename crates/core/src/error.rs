use crate::lifecycle::RoleRequirement;
use crate::record::CaseId;
use careflow_model::{CaseAction, CaseStatus, ModelError, Role};

/// Errors returned by the coordination core.
///
/// Every rejected request is reported through one of these variants; the
/// core never panics on bad input and never silently drops a request.
/// Callers decide which variants are user-facing (a missing rejection
/// reason) and which indicate a programming error (a stale record id).
#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    #[error("case not found: {0}")]
    RecordNotFound(CaseId),

    #[error("no `{action}` transition from `{current}`")]
    InvalidTransition {
        /// Status the record was in when the action was requested.
        current: CaseStatus,
        /// The requested action.
        action: CaseAction,
        /// Status the action would have produced for this kind, when the
        /// action belongs to the kind at all.
        target: Option<CaseStatus>,
    },

    #[error(
        "`{action}` requires the {required_role} role, actor was {actual}",
        required_role = required.map(|r| r.as_str()).unwrap_or("(none)")
    )]
    PermissionDenied {
        /// The requested action.
        action: CaseAction,
        /// Which side of the case may perform the action; `None` when no
        /// rule exists for the action at all.
        required: Option<RoleRequirement>,
        /// The role that made the request.
        actual: Role,
    },

    #[error("invalid {field}: {reason}")]
    Validation {
        /// The missing or invalid payload/intake field.
        field: &'static str,
        reason: String,
    },

    #[error("record is at version {found}, caller expected {expected}")]
    StaleVersion { expected: u64, found: u64 },

    #[error("duplicate case id: {0}")]
    DuplicateId(CaseId),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Type alias for Results that can fail with a [`CoordinationError`].
pub type CoordinationResult<T> = std::result::Result<T, CoordinationError>;
