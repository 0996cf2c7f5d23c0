//! Role view composition.
//!
//! Turns the raw store into what one role's dashboard tab should show:
//! ownership scoping first, then the tab's terminal/non-terminal split,
//! then the caller's filter spec, ordered per tab. Badge counts ignore the
//! filter spec: they always reflect how many scoped records are awaiting
//! this role's action.

use crate::filter::{self, FilterSpec, SortOrder};
use crate::record::CaseRecord;
use crate::service::CoordinationService;
use crate::store::CaseStore;
use careflow_model::{ModelError, ModelResult, Role};
use serde::Serialize;

/// Dashboard tab kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    /// Records still moving through their graph, soonest first.
    Upcoming,
    /// Records in a terminal status, most recent date first.
    History,
}

impl Tab {
    /// Parses a tab from its string representation.
    pub fn parse(s: &str) -> ModelResult<Self> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "history" => Ok(Self::History),
            _ => Err(ModelError::InvalidInput(format!("Invalid tab: {}", s))),
        }
    }

    /// Returns the string representation of this tab.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::History => "history",
        }
    }

    fn includes(self, record: &CaseRecord) -> bool {
        match self {
            Self::Upcoming => !record.status().is_terminal(),
            Self::History => record.status().is_terminal(),
        }
    }

    fn sort_order(self) -> SortOrder {
        match self {
            Self::Upcoming => SortOrder::Queue,
            Self::History => SortOrder::History,
        }
    }
}

/// What one role sees on one tab.
#[derive(Clone, Debug, Serialize)]
pub struct RoleView {
    /// Scoped, bucketed, filtered and ordered records.
    pub items: Vec<CaseRecord>,

    /// Count of scoped records awaiting this role's action, independent of
    /// the active filter spec.
    pub badge_count: usize,
}

/// Whether `record` is visible to `role`: its owner, its counterpart, or
/// any oversight role.
fn visible_to(record: &CaseRecord, role: &Role) -> bool {
    role.is_oversight()
        || record.owner_role() == role
        || record.counterpart_role() == Some(role)
}

impl<S: CaseStore> CoordinationService<S> {
    /// Composes the view for `role` on `tab` under `spec`.
    ///
    /// Repeated calls with the same arguments against an unchanged store
    /// return identical output.
    pub fn get_view(&self, role: &Role, tab: Tab, spec: &FilterSpec) -> RoleView {
        let scoped: Vec<&CaseRecord> = self
            .store()
            .records()
            .iter()
            .filter(|record| visible_to(record, role))
            .collect();

        let badge_count = scoped
            .iter()
            .filter(|record| self.permissions().can_act(record, role))
            .count();

        let mut items = filter::select(
            scoped.into_iter().filter(|record| tab.includes(record)),
            spec,
        );
        filter::sort(&mut items, tab.sort_order());

        RoleView {
            items: items.into_iter().cloned().collect(),
            badge_count,
        }
    }
}
