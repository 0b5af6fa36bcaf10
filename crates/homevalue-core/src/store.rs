//! Property snapshot collaborator.

use std::sync::{Arc, RwLock};

use crate::{Page, PageRequest, PropertyFilter, PropertyRecord, ValidationError};

/// Shared immutable view of the property dataset.
pub type Snapshot = Arc<[PropertyRecord]>;

/// Source of property snapshots.
///
/// A snapshot is never mutated after it is handed out, so concurrent readers
/// never observe a partial update.
pub trait PropertyStore: Send + Sync {
    fn snapshot(&self) -> Snapshot;
}

/// Store backed by an in-process record list.
#[derive(Debug)]
pub struct InMemoryPropertyStore {
    records: RwLock<Snapshot>,
}

impl InMemoryPropertyStore {
    pub fn new(records: Vec<PropertyRecord>) -> Self {
        Self {
            records: RwLock::new(Arc::from(records)),
        }
    }

    /// Swaps in a new snapshot. Holders of the previous one keep it.
    pub fn replace(&self, records: Vec<PropertyRecord>) {
        let next: Snapshot = Arc::from(records);
        match self.records.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    pub fn find_by_id(&self, id: u64) -> Option<PropertyRecord> {
        self.snapshot()
            .iter()
            .find(|record| record.id == Some(id))
            .cloned()
    }

    pub fn filter(&self, filter: &PropertyFilter) -> Vec<PropertyRecord> {
        self.snapshot()
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    /// Matching records ordered by the request and cut to one page.
    pub fn page(
        &self,
        filter: &PropertyFilter,
        request: &PageRequest,
    ) -> Result<Page<PropertyRecord>, ValidationError> {
        request.validate()?;
        let mut selected = self.filter(filter);
        selected.sort_by(|left, right| request.compare(left, right));
        Ok(request.slice(&selected))
    }

    pub fn count(&self, filter: &PropertyFilter) -> usize {
        self.snapshot()
            .iter()
            .filter(|record| filter.matches(record))
            .count()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryPropertyStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PropertyStore for InMemoryPropertyStore {
    fn snapshot(&self) -> Snapshot {
        // The guarded value is a single Arc swap, a poisoned lock still holds
        // a complete snapshot.
        match self.records.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }
}
