//! Concurrent registry of cached keys
//!
//! A single coarse lock guards both the key lookup and the insertion order,
//! so the two can never disagree. Order is assigned from a monotonically
//! increasing sequence; a replaced key receives a fresh sequence and moves
//! to the back of the eviction order.

use crate::entry::{Entry, Ttl};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::time::SystemTime;

/// Key -> metadata registry with oldest-first ordering
#[derive(Debug, Default)]
pub struct Index {
    inner: RwLock<IndexInner>,
}

#[derive(Debug, Default)]
struct IndexInner {
    entries: HashMap<String, Entry>,
    /// sequence -> key, ascending = oldest first
    order: BTreeMap<u64, String>,
    next_sequence: u64,
    total_bytes: u64,
    /// Keys with a `set` between storage write and registration
    pending: HashMap<String, usize>,
}

impl IndexInner {
    fn detach(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.sequence);
        self.total_bytes = self.total_bytes.saturating_sub(entry.compressed_size);
        Some(entry)
    }
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key`, replacing any previous entry. Returns the replaced entry.
    pub fn insert(
        &self,
        key: String,
        compressed_size: u64,
        ttl: Ttl,
        inserted_at: SystemTime,
    ) -> Option<Entry> {
        let mut inner = self.inner.write();
        let previous = inner.detach(&key);

        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.order.insert(sequence, key.clone());
        inner.total_bytes += compressed_size;
        inner.entries.insert(
            key.clone(),
            Entry {
                key,
                compressed_size,
                inserted_at,
                ttl,
                sequence,
            },
        );

        previous
    }

    pub fn remove(&self, key: &str) -> Option<Entry> {
        self.inner.write().detach(key)
    }

    /// Remove `key` only if it is still the generation identified by `sequence`
    pub fn remove_if_current(&self, key: &str, sequence: u64) -> Option<Entry> {
        let mut inner = self.inner.write();
        match inner.entries.get(key) {
            Some(entry) if entry.sequence == sequence => inner.detach(key),
            _ => None,
        }
    }

    pub fn lookup(&self, key: &str) -> Option<Entry> {
        self.inner.read().entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().entries.contains_key(key)
    }

    /// Copy of all entries, oldest first
    pub fn snapshot(&self) -> Vec<Entry> {
        let inner = self.inner.read();
        inner
            .order
            .values()
            .filter_map(|key| inner.entries.get(key).cloned())
            .collect()
    }

    /// Atomically remove the oldest entry inserted before the `before` watermark
    pub fn pop_oldest(&self, before: u64) -> Option<Entry> {
        let mut inner = self.inner.write();
        let key = match inner.order.first_key_value() {
            Some((&sequence, key)) if sequence < before => key.clone(),
            _ => return None,
        };
        inner.detach(&key)
    }

    /// Sequence the next insert will receive; entries below it already exist
    pub fn next_sequence(&self) -> u64 {
        self.inner.read().next_sequence
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Sum of compressed sizes of all registered entries
    pub fn total_bytes(&self) -> u64 {
        self.inner.read().total_bytes
    }

    /// Mark `key` as being written; the mark lasts until the guard drops
    pub fn begin_write(&self, key: &str) -> PendingWrite<'_> {
        let mut inner = self.inner.write();
        *inner.pending.entry(key.to_string()).or_insert(0) += 1;

        PendingWrite {
            index: self,
            key: key.to_string(),
        }
    }

    /// Whether a file named `key` belongs to the cache (registered or mid-write)
    pub fn is_tracked(&self, key: &str) -> bool {
        let inner = self.inner.read();
        inner.entries.contains_key(key) || inner.pending.contains_key(key)
    }

    fn finish_write(&self, key: &str) {
        let mut inner = self.inner.write();
        if let Some(count) = inner.pending.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                inner.pending.remove(key);
            }
        }
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        let inner = self.inner.read();
        assert_eq!(inner.entries.len(), inner.order.len());
        for (sequence, key) in &inner.order {
            assert_eq!(inner.entries[key].sequence, *sequence);
        }
        let total: u64 = inner.entries.values().map(|e| e.compressed_size).sum();
        assert_eq!(total, inner.total_bytes);
    }
}

/// Guard returned by [`Index::begin_write`]
#[derive(Debug)]
pub struct PendingWrite<'a> {
    index: &'a Index,
    key: String,
}

impl Drop for PendingWrite<'_> {
    fn drop(&mut self) {
        self.index.finish_write(&self.key);
    }
}
