//! Domain vocabulary for the care-coordination core.
//!
//! This crate defines the closed sets the rest of the system dispatches on:
//! - case kinds and their per-kind status enums, each carrying its own
//!   transition table
//! - the shared transition action verbs
//! - urgency levels and which kinds may use them
//! - actor roles (who owns a case, who is its counterpart)
//!
//! This crate is pure data: no store, no mutation, no clock. Statuses can
//! only be *asked* what follows them; actually moving a record between
//! statuses is the job of the lifecycle engine in `careflow-core`.

pub mod action;
pub mod role;
pub mod status;
pub mod urgency;

// Re-export the vocabulary at the crate root
pub use action::CaseAction;
pub use role::{Role, RoleKind};
pub use status::{
    AppointmentStatus, CaseKind, CaseStatus, HomeVisitStatus, ReferralStatus, TeleSessionStatus,
};
pub use urgency::Urgency;

/// Errors returned by the vocabulary crate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Type alias for Results that can fail with a [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;
