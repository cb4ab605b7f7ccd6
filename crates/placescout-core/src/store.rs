//! In-memory result table.
//!
//! Background workers never hold a `&mut ResultStore`. They send
//! [`StoreEvent`]s to whichever task owns the store, and that task applies
//! them in arrival order via [`ResultStore::apply`].

use thiserror::Error;

use crate::record::PlaceRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("row {index} out of range (store holds {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A mutation produced off the owning task.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Swap the whole table for a freshly fetched result set.
    Replace(Vec<PlaceRecord>),
    /// Overwrite the phone cell of the row at `index`.
    PhoneUpdated { index: usize, phone: String },
}

/// Ordered collection of enriched place records.
#[derive(Debug, Default, Clone)]
pub struct ResultStore {
    records: Vec<PlaceRecord>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn append(&mut self, record: PlaceRecord) {
        self.records.push(record);
    }

    /// Clears the table and appends `records` in order.
    pub fn replace(&mut self, records: Vec<PlaceRecord>) {
        self.clear();
        for record in records {
            self.append(record);
        }
    }

    /// Owned copy of the current rows, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PlaceRecord> {
        self.records.clone()
    }

    #[must_use]
    pub fn records(&self) -> &[PlaceRecord] {
        &self.records
    }

    /// Replaces only the phone field of the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if no such row exists.
    pub fn update_phone_at(&mut self, index: usize, phone: &str) -> Result<(), StoreError> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        phone.clone_into(&mut record.phone);
        Ok(())
    }

    /// Applies a worker-produced mutation.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from [`Self::update_phone_at`].
    pub fn apply(&mut self, event: StoreEvent) -> Result<(), StoreError> {
        match event {
            StoreEvent::Replace(records) => {
                self.replace(records);
                Ok(())
            }
            StoreEvent::PhoneUpdated { index, phone } => self.update_phone_at(index, &phone),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
