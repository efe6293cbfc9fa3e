//! Partitioned preview cache.
//!
//! Entries are addressed by a [`CacheScope`]: the partition (acting user) and
//! the entry (caller-supplied reference id). A partition is the unit of
//! invalidation. Every invalidation bumps a cache-wide generation counter; a
//! `put` stamped with an older generation is dropped, so a resolution that
//! started before an invalidation can never write stale data back. Empty
//! partitions hold no state and are pruned by [`MemoryPreviewCache::cleanup_expired`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use super::preview::ResolvedPreview;

/// Two-part cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheScope {
    pub partition: String,
    pub entry: String,
}

impl CacheScope {
    pub fn new(partition: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            entry: entry.into(),
        }
    }
}

/// Cache capability used by the reference service.
///
/// Values are `Option<ResolvedPreview>` so that "no preview" is cacheable too.
pub trait PreviewCache: Send + Sync {
    /// `None` on miss, `Some(value)` on hit.
    fn get(&self, scope: &CacheScope) -> Option<Option<ResolvedPreview>>;

    /// Generation to pass back to [`put`](Self::put) for a write into
    /// `partition`.
    fn generation(&self, partition: &str) -> u64;

    /// Store `value` unless `partition` was invalidated since `generation` was
    /// read. Returns whether the value was stored.
    fn put(&self, scope: &CacheScope, value: Option<ResolvedPreview>, generation: u64) -> bool;

    /// Drop every entry of `partition`. Visible to all reads once it returns.
    fn invalidate(&self, partition: &str);

    /// Drop every entry of every partition, including partitions of users
    /// the caller does not know about.
    fn invalidate_all(&self);
}

struct CacheEntry {
    value: Option<ResolvedPreview>,
    inserted: Instant,
}

type Partition = HashMap<String, CacheEntry>;

/// In-memory [`PreviewCache`] with a TTL and a per-partition size bound.
pub struct MemoryPreviewCache {
    partitions: DashMap<String, Partition>,
    generation: AtomicU64,
    ttl: Duration,
    max_entries: usize,
}

impl MemoryPreviewCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            partitions: DashMap::new(),
            generation: AtomicU64::new(0),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Number of partitions currently holding entries.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Remove expired entries, then every partition left empty.
    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        let before = self.partitions.len();
        self.partitions.retain(|_, entries| {
            entries.retain(|_, entry| entry.inserted.elapsed() < ttl);
            !entries.is_empty()
        });
        let pruned = before.saturating_sub(self.partitions.len());
        if pruned > 0 {
            debug!(pruned, "Pruned empty preview cache partitions");
        }
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn evict_oldest(entries: &mut Partition) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            entries.remove(&key);
        }
    }
}

impl Default for MemoryPreviewCache {
    fn default() -> Self {
        // 1 hour TTL, 1000 entries per user
        Self::new(Duration::from_secs(3600), 1000)
    }
}

impl PreviewCache for MemoryPreviewCache {
    fn get(&self, scope: &CacheScope) -> Option<Option<ResolvedPreview>> {
        let mut entries = self.partitions.get_mut(&scope.partition)?;
        let entry = entries.get(&scope.entry)?;
        let (expired, value) = (entry.inserted.elapsed() >= self.ttl, entry.value.clone());

        if expired {
            entries.remove(&scope.entry);
            return None;
        }
        Some(value)
    }

    fn generation(&self, _partition: &str) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn put(&self, scope: &CacheScope, value: Option<ResolvedPreview>, generation: u64) -> bool {
        // The generation check runs under the partition's shard lock, which
        // `invalidate` holds while bumping.
        let slot = self.partitions.entry(scope.partition.clone());
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                partition = %scope.partition,
                entry = %scope.entry,
                "Dropping cache write from before invalidation"
            );
            return false;
        }

        let mut entries = slot.or_default();
        if !entries.contains_key(&scope.entry) && entries.len() >= self.max_entries {
            Self::evict_oldest(&mut entries);
        }
        entries.insert(
            scope.entry.clone(),
            CacheEntry {
                value,
                inserted: Instant::now(),
            },
        );
        true
    }

    fn invalidate(&self, partition: &str) {
        let slot = self.partitions.entry(partition.to_string());
        self.bump_generation();
        let dropped = match slot {
            Entry::Occupied(occupied) => occupied.remove().len(),
            Entry::Vacant(_) => 0,
        };
        info!(partition, dropped, "Invalidated preview cache partition");
    }

    fn invalidate_all(&self) {
        self.bump_generation();
        let partitions = self.partitions.len();
        self.partitions.clear();
        info!(partitions, "Invalidated every preview cache partition");
    }
}
