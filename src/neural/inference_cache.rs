//! Memoisation of predictor outputs.
//!
//! A cache may be shared by several players, so implementations take `&self`
//! and synchronise internally. Nothing beyond `try_get`/`add` is required:
//! concurrent writers race and the last write wins.

use crate::game::coord::Move;
use crate::game::position::Position;
use crate::neural::predictor::ModelOutput;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifies a leaf by the move that reached it and the resulting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub incoming: Option<Move>,
    pub stone_hash: u64,
}

impl CacheKey {
    pub fn new<P: Position>(incoming: Option<Move>, position: &P) -> Self {
        Self {
            incoming,
            stone_hash: position.stone_hash(),
        }
    }
}

pub trait InferenceCache: Send + Sync {
    fn try_get(&self, key: &CacheKey) -> Option<ModelOutput>;
    fn add(&self, key: CacheKey, output: ModelOutput);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct CacheState {
    entries: LruCache<CacheKey, ModelOutput>,
    stats: CacheStats,
}

/// Capacity-bounded least-recently-used cache.
pub struct BasicInferenceCache {
    state: Mutex<CacheState>,
}

impl BasicInferenceCache {
    pub fn new(capacity: usize) -> Self {
        let Some(capacity) = NonZeroUsize::new(capacity) else {
            panic!("inference cache capacity must be positive");
        };
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.lock().entries.cap().get()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        log::debug!("Inference cache cleared ({:?})", state.stats);
    }
}

impl InferenceCache for BasicInferenceCache {
    fn try_get(&self, key: &CacheKey) -> Option<ModelOutput> {
        let mut state = self.lock();
        let found = state.entries.get(key).cloned();
        if found.is_some() {
            state.stats.hits += 1;
        } else {
            state.stats.misses += 1;
        }
        found
    }

    fn add(&self, key: CacheKey, output: ModelOutput) {
        let mut state = self.lock();
        // `push` hands back the replaced value for an existing key, or the
        // evicted entry when the cache was full.
        let displaced = state.entries.push(key, output);
        if matches!(displaced, Some((old_key, _)) if old_key != key) {
            state.stats.evictions += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hash: u64) -> CacheKey {
        CacheKey {
            incoming: Some(Move::Point(hash as u16)),
            stone_hash: hash,
        }
    }

    #[test]
    fn test_hit_and_miss_counters() {
        let cache = BasicInferenceCache::new(4);
        assert!(cache.try_get(&key(1)).is_none());
        cache.add(key(1), ModelOutput::uniform(0.5));
        let hit = cache.try_get(&key(1)).unwrap();
        assert_eq!(hit.value, 0.5);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                evictions: 0
            }
        );
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = BasicInferenceCache::new(2);
        cache.add(key(1), ModelOutput::uniform(0.1));
        cache.add(key(2), ModelOutput::uniform(0.2));
        // Touch 1 so that 2 becomes the eviction candidate.
        assert!(cache.try_get(&key(1)).is_some());
        cache.add(key(3), ModelOutput::uniform(0.3));

        assert_eq!(cache.len(), 2);
        assert!(cache.try_get(&key(2)).is_none());
        assert!(cache.try_get(&key(1)).is_some());
        assert!(cache.try_get(&key(3)).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = BasicInferenceCache::new(2);
        cache.add(key(7), ModelOutput::uniform(0.1));
        cache.add(key(7), ModelOutput::uniform(-0.4));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.try_get(&key(7)).unwrap().value, -0.4);
        // Overwriting at capacity is not an eviction.
        cache.add(key(8), ModelOutput::uniform(0.0));
        cache.add(key(8), ModelOutput::uniform(0.2));
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_is_rejected() {
        let _ = BasicInferenceCache::new(0);
    }

    #[test]
    fn test_same_position_different_move_is_distinct() {
        let cache = BasicInferenceCache::new(4);
        let a = CacheKey {
            incoming: Some(Move::Pass),
            stone_hash: 9,
        };
        let b = CacheKey {
            incoming: None,
            stone_hash: 9,
        };
        cache.add(a, ModelOutput::uniform(1.0));
        assert!(cache.try_get(&b).is_none());
        cache.clear();
        assert!(cache.is_empty());
    }
}
