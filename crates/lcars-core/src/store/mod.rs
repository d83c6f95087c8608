//! In-memory resource stores.
//!
//! Each resource lives in a [`Repository`]: a concurrent map keyed by sequential ids that
//! start at 1. Nothing survives a restart.

mod console;
mod records;

pub use console::{Console, DEFAULT_CITY, DEFAULT_USER};
pub use records::*;

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent id-keyed store for one record type.
pub struct Repository<T> {
    rows: DashMap<u64, T>,
    next_id: AtomicU64,
}

impl<T: Clone> Repository<T> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocates the next id and stores the record built from it.
    pub fn insert_with(&self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).map(|r| r.value().clone())
    }

    /// All records in id order.
    pub fn list(&self) -> Vec<T> {
        let mut rows: Vec<(u64, T)> = self
            .rows
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, row)| row).collect()
    }

    /// Applies `change` in place and returns the updated record.
    pub fn update(&self, id: u64, change: impl FnOnce(&mut T)) -> Option<T> {
        let mut row = self.rows.get_mut(&id)?;
        change(row.value_mut());
        Some(row.value().clone())
    }

    /// Applies `change` to every record.
    pub fn update_all(&self, mut change: impl FnMut(&mut T)) {
        for mut row in self.rows.iter_mut() {
            change(row.value_mut());
        }
    }

    pub fn delete(&self, id: u64) -> bool {
        self.rows.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Clone> Default for Repository<T> {
    fn default() -> Self {
        Self::new()
    }
}
