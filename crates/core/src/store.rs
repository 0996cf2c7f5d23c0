//! Case record storage.
//!
//! The record collection sits behind the [`CaseStore`] trait so a future
//! transactional store can be swapped in without touching the lifecycle or
//! filter engines. [`InMemoryStore`] is the only implementation here: a
//! plain insertion-ordered collection, which also keeps query output
//! deterministic for repeated calls against an unchanged store.

use crate::record::{CaseId, CaseRecord};

/// Storage abstraction for case records.
///
/// `put` is an upsert: a record replaces any stored record with the same id
/// and is appended otherwise. Id uniqueness across the whole store follows
/// from that contract. Nothing ever removes a record; cancellation is a
/// logged terminal status, not a delete.
pub trait CaseStore {
    /// Looks up a record by id.
    fn get(&self, id: CaseId) -> Option<&CaseRecord>;

    /// Inserts or replaces a record by id.
    fn put(&mut self, record: CaseRecord);

    /// All records in insertion order.
    fn records(&self) -> &[CaseRecord];
}

/// In-memory, insertion-ordered record store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Vec<CaseRecord>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CaseStore for InMemoryStore {
    fn get(&self, id: CaseId) -> Option<&CaseRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn put(&mut self, record: CaseRecord) {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => *slot = record,
            None => self.records.push(record),
        }
    }

    fn records(&self) -> &[CaseRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CaseIntake;
    use careflow_model::{CaseKind, CaseStatus, ReferralStatus, Role, Urgency};
    use careflow_types::{HealthNumber, NonEmptyText};
    use chrono::Utc;

    fn sample_record(hn: &str) -> CaseRecord {
        CaseRecord::create(
            CaseId::generate(),
            CaseIntake {
                kind: CaseKind::Referral,
                subject: HealthNumber::new(hn).unwrap(),
                subject_name: NonEmptyText::new("Test Patient").unwrap(),
                origin_facility: Some("PCU North".into()),
                destination_facility: Some("General Hospital".into()),
                urgency: Urgency::Normal,
                counterpart_role: Some(Role::hospital("General Hospital")),
                scheduled_for: Utc::now(),
                note: None,
            },
            Role::primary_care_unit("PCU North"),
            Utc::now(),
        )
    }

    #[test]
    fn put_then_get_by_id() {
        let mut store = InMemoryStore::new();
        let record = sample_record("HN-0001");
        let id = record.id();
        store.put(record);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().id(), id);
        assert!(store.get(CaseId::generate()).is_none());
    }

    #[test]
    fn put_replaces_record_with_same_id() {
        let mut store = InMemoryStore::new();
        let mut record = sample_record("HN-0001");
        let id = record.id();
        store.put(record.clone());

        record.commit(
            CaseStatus::Referral(ReferralStatus::Accepted),
            Role::hospital("General Hospital"),
            "accepted".into(),
            None,
            None,
            Utc::now(),
        );
        store.put(record);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(id).unwrap().status(),
            CaseStatus::Referral(ReferralStatus::Accepted)
        );
    }

    #[test]
    fn records_preserve_insertion_order() {
        let mut store = InMemoryStore::new();
        let first = sample_record("HN-0001");
        let second = sample_record("HN-0002");
        let ids = [first.id(), second.id()];
        store.put(first);
        store.put(second);

        let stored: Vec<_> = store.records().iter().map(|r| r.id()).collect();
        assert_eq!(stored, ids);
    }
}
