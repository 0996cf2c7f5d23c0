//! # careflow core
//!
//! Core logic for the care-coordination dashboards: the case status
//! lifecycle and the query pipeline behind every role's work queue.
//!
//! - [`record`]: the case record, its audit log, and intake carrier
//! - [`store`]: the repository seam and the in-memory store
//! - [`lifecycle`]: permission table and transition payload validation
//! - [`service`]: [`CoordinationService`], the single mutation path
//! - [`filter`]: pure filtering, ordering and date grouping
//! - [`views`]: per-role/per-tab view composition and badge counts
//!
//! **No presentation concerns**: rendering, routing and data entry belong
//! to the surrounding application; this crate exposes a function contract
//! and returns typed errors, never a rendered message.

pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod record;
pub mod service;
pub mod store;
pub mod views;

pub use error::{CoordinationError, CoordinationResult};
pub use filter::{DayGroup, FacetFilter, FilterSpec, SortOrder, StatusBucket};
pub use lifecycle::{PermissionTable, RoleRequirement, TransitionPayload};
pub use record::{CaseId, CaseIntake, CaseRecord, LogEntry};
pub use service::CoordinationService;
pub use store::{CaseStore, InMemoryStore};
pub use views::{RoleView, Tab};
