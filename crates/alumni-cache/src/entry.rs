//! Cache entries and their freshness state.

use std::time::Duration;

use tokio::time::Instant;

/// Freshness of an entry at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// `now < expires_at`: served without I/O.
    Fresh,
    /// Inside the stale window: served while a refresh runs in background.
    Stale,
    /// Past the stale window: must never be returned.
    Dead,
}

/// A cached value with its timing metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    expires_at: Instant,
    hit_count: u64,
    seq: u64,
}

impl<V> CacheEntry<V> {
    /// Creates an entry stored at `now` that expires after `ttl`.
    pub(crate) fn new(value: V, now: Instant, ttl: Duration, seq: u64) -> Self {
        Self {
            value,
            stored_at: now,
            expires_at: now + ttl,
            hit_count: 0,
            seq,
        }
    }

    /// Replaces the value in place, keeping the hit counter.
    pub(crate) fn refresh(&mut self, value: V, now: Instant, ttl: Duration, seq: u64) {
        self.value = value;
        self.stored_at = now;
        self.expires_at = now + ttl;
        self.seq = seq;
    }

    pub(crate) fn record_hit(&mut self) {
        self.hit_count += 1;
    }

    /// Returns the cached value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns when the value was stored or last refreshed.
    pub fn stored_at(&self) -> Instant {
        self.stored_at
    }

    /// Returns when the value stops being fresh.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns how many times the entry was served.
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Insertion sequence; orders entries stored at the same instant.
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    /// Classifies the entry at `now`.
    pub fn freshness(&self, now: Instant, stale_window: Duration) -> Freshness {
        if now < self.expires_at {
            Freshness::Fresh
        } else if now < self.expires_at + stale_window {
            Freshness::Stale
        } else {
            Freshness::Dead
        }
    }

    /// Returns true if the entry can no longer be served.
    pub fn is_dead(&self, now: Instant, stale_window: Duration) -> bool {
        self.freshness(now, stale_window) == Freshness::Dead
    }
}
