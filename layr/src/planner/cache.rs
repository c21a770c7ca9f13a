//! Prompt-keyed plan cache
//!
//! Keys are normalized prompts (trimmed, lowercased) so slightly
//! different inputs hit the same entry. Entries expire after a TTL and
//! the cache is bounded, approximating LRU via reinsertion-on-access:
//! reads promote an entry to the most-recently-used position, and at
//! capacity the oldest entry by insertion/access order is evicted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::ProjectPlan;

/// Default time-to-live for cached plans
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Default maximum number of cached plans
pub const DEFAULT_CAPACITY: usize = 20;

struct CacheEntry {
    plan: ProjectPlan,
    inserted_at: Instant,
}

/// Bounded TTL cache of generated plans
pub struct PlanCache {
    entries: HashMap<String, CacheEntry>,
    /// Key order, oldest first; access moves a key to the back
    order: Vec<String>,
    ttl: Duration,
    capacity: usize,
}

impl PlanCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            ttl,
            capacity,
        }
    }

    /// Normalize a prompt into its cache key
    fn cache_key(prompt: &str) -> String {
        prompt.trim().to_lowercase()
    }

    /// Look up a plan, evicting it if it has outlived the TTL
    ///
    /// A hit returns a copy with `generated_at` refreshed to now, so a
    /// cached result is indistinguishable in age from a fresh one, and
    /// promotes the entry to most-recently-used.
    pub fn get(&mut self, prompt: &str) -> Option<ProjectPlan> {
        let key = Self::cache_key(prompt);

        let expired = match self.entries.get(&key) {
            None => return None,
            Some(entry) => entry.inserted_at.elapsed() > self.ttl,
        };
        if expired {
            debug!(%key, "PlanCache: entry expired, evicting");
            self.remove(&key);
            return None;
        }

        self.promote(&key);
        let entry = self.entries.get(&key)?;
        let mut plan = entry.plan.clone();
        plan.generated_at = chrono::Utc::now();
        debug!(%key, "PlanCache: hit");
        Some(plan)
    }

    /// Store a copy of a plan, evicting the oldest entry at capacity
    pub fn set(&mut self, prompt: &str, plan: &ProjectPlan) {
        let key = Self::cache_key(prompt);

        if self.entries.contains_key(&key) {
            self.promote(&key);
        } else {
            if self.entries.len() >= self.capacity {
                if let Some(oldest) = self.order.first().cloned() {
                    debug!(key = %oldest, "PlanCache: at capacity, evicting oldest");
                    self.remove(&oldest);
                }
            }
            self.order.push(key.clone());
        }

        debug!(%key, "PlanCache: stored");
        self.entries.insert(
            key,
            CacheEntry {
                plan: plan.clone(),
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn promote(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let key = self.order.remove(pos);
            self.order.push(key);
        }
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}
