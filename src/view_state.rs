//! Transient holders for fetched entities. Nothing here is authoritative:
//! entries are re-fetched on navigation or after a mutation, and a
//! response that lands after its consumer has moved on is dropped
//! silently rather than treated as an error.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheCounters {
    pub hits: usize,
    pub misses: usize,
    pub expirations: usize,
}

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

impl<T> Entry<T> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Short-lived per-resource cache keyed by entity id. Mutations call
/// `invalidate` for the touched key; navigation calls `clear`.
pub struct TransientCache<T> {
    entries: DashMap<String, Entry<T>>,
    ttl: Duration,
    hits: AtomicUsize,
    misses: AtomicUsize,
    expirations: AtomicUsize,
}

impl<T: Clone> TransientCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            expirations: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn put(&self, key: impl Into<String>, value: T) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop one entry, typically right after a mutation touching it.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop everything, typically on navigation.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn counters(&self) -> CacheCounters {
        CacheCounters {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}

/// Ticket handed out when a fetch begins; only the most recent ticket may
/// publish into the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// One piece of view state fed by async fetches. A publish from a
/// superseded fetch, or after the consumer detached, is a no-op: the
/// value is dropped without complaint, matching how an unmounted view
/// ignores a response that resolves late.
pub struct ViewSlot<T> {
    value: Mutex<Option<T>>,
    generation: AtomicU64,
    detached: AtomicBool,
}

impl<T> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            generation: AtomicU64::new(0),
            detached: AtomicBool::new(false),
        }
    }

    /// Start a fetch; any ticket issued earlier becomes stale.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns whether the value was accepted.
    pub fn publish(&self, ticket: FetchTicket, value: T) -> bool {
        if self.detached.load(Ordering::SeqCst)
            || ticket.0 != self.generation.load(Ordering::SeqCst)
        {
            return false;
        }
        *self.value.lock() = Some(value);
        true
    }

    /// The consumer is going away; late responses are discarded from now
    /// on.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
        self.value.lock().take();
    }

    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.value.lock().clone()
    }
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_hits_until_the_entry_expires() {
        let cache = TransientCache::new(Duration::from_millis(20));
        cache.put("lst-1", 42u32);

        assert_eq!(cache.get("lst-1"), Some(42));
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get("lst-1"), None);

        let counters = cache.counters();
        assert_eq!(counters.hits, 1);
        assert_eq!(counters.misses, 1);
        assert_eq!(counters.expirations, 1);
    }

    #[test]
    fn invalidate_drops_only_the_touched_key() {
        let cache = TransientCache::new(Duration::from_secs(60));
        cache.put("lst-1", 1u32);
        cache.put("lst-2", 2u32);

        cache.invalidate("lst-1");
        assert_eq!(cache.get("lst-1"), None);
        assert_eq!(cache.get("lst-2"), Some(2));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn latest_ticket_wins_the_slot() {
        let slot = ViewSlot::new();
        let first = slot.begin_fetch();
        let second = slot.begin_fetch();

        // The stale response arrives after a newer fetch began.
        assert!(!slot.publish(first, "stale"));
        assert_eq!(slot.get(), None);

        assert!(slot.publish(second, "fresh"));
        assert_eq!(slot.get(), Some("fresh"));
    }

    #[test]
    fn publish_after_detach_is_a_silent_no_op() {
        let slot = ViewSlot::new();
        let ticket = slot.begin_fetch();

        slot.detach();
        assert!(!slot.publish(ticket, 7u8));
        assert_eq!(slot.get(), None);
    }
}
