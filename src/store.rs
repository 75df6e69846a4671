//! Inventory store: exclusive owner of the live record list.
//!
//! Engines borrow read-only views via [`InventoryStore::records`] and return
//! new lists; all mutation goes through the store, which pushes a full
//! deep-copy undo state before every change. Undo is linear (no redo) and
//! unbounded.

use crate::allocation::BreakList;
use crate::models::Record;
use log::{debug, info};
use std::collections::HashMap;

/// A full deep copy of the record list at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<Record>,
}

#[derive(Debug, Default)]
pub struct InventoryStore {
    records: Vec<Record>,
    undo_stack: Vec<Vec<Record>>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            undo_stack: Vec::new(),
        }
    }

    /// Read-only view of the live inventory.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replaces the whole inventory, keeping an undo state.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.save_undo_state();
        self.records = records;
    }

    /// Appends a record, keeping an undo state.
    pub fn add_record(&mut self, record: Record) {
        self.save_undo_state();
        self.records.push(record);
    }

    /// Pushes a deep copy of the current inventory onto the undo stack.
    pub fn save_undo_state(&mut self) {
        debug!(
            "Saving undo state ({} records, stack depth {})",
            self.records.len(),
            self.undo_stack.len() + 1
        );
        self.undo_stack.push(self.records.clone());
    }

    /// Restores the most recent undo state. Returns false (and logs) if the
    /// stack is empty; never an error.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                info!(
                    "Undo: restoring {} records (was {})",
                    previous.len(),
                    self.records.len()
                );
                self.records = previous;
                true
            }
            None => {
                info!("Undo: nothing to undo");
                false
            }
        }
    }

    /// A point-in-time deep copy, independent of the undo stack.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            records: self.records.clone(),
        }
    }

    /// Restores a snapshot, keeping an undo state for the overwrite.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.save_undo_state();
        self.records = snapshot.records;
    }

    /// Removes every record whose identity key over `key_fields` equals the
    /// given record's. Returns the number removed. Keeps an undo state.
    pub fn remove_matching(&mut self, key_fields: &[&str], key_record: &Record) -> usize {
        self.save_undo_state();
        let key = key_record.identity_key(key_fields);
        let before = self.records.len();
        self.records
            .retain(|r| r.identity_key(key_fields) != key);
        let removed = before - self.records.len();
        info!("Removed {} records matching key fields {:?}", removed, key_fields);
        removed
    }

    /// Depletes the inventory by a generated break list: for each break
    /// record, one structurally-equal inventory record is removed. Returns
    /// the removed records in inventory order. Keeps an undo state, so the
    /// exact removed records can be re-inserted by [`undo`](Self::undo).
    pub fn remove_break_list(&mut self, break_list: &BreakList) -> Vec<Record> {
        self.save_undo_state();

        let mut wanted: HashMap<String, usize> = HashMap::new();
        for record in break_list.records() {
            *wanted.entry(record.fingerprint()).or_insert(0) += 1;
        }

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.records.len());
        for record in self.records.drain(..) {
            match wanted.get_mut(&record.fingerprint()) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    removed.push(record);
                }
                _ => kept.push(record),
            }
        }
        self.records = kept;

        info!(
            "Removed {} of {} break-list records from inventory ({} remain)",
            removed.len(),
            break_list.len(),
            self.records.len()
        );
        removed
    }
}
