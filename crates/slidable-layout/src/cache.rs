//! Memoization for action row layout.
//!
//! A row is re-solved on every frame of a slide or expansion animation, but
//! once an animation settles the same `(descriptor, row state)` pair repeats
//! every frame. [`RowLayoutCache`] stores [`ItemLayoutResult`]s keyed by a
//! [`RowLayoutCacheKey`] built from every input the solver reads.
//!
//! # Usage
//!
//! ```ignore
//! use slidable_layout::{RowLayoutCache, RowLayoutInput};
//!
//! let mut cache = RowLayoutCache::new(32);
//! let placements = cache.layout(&input);
//! ```
//!
//! # Eviction
//!
//! When full, the entry with the fewest hits is dropped.
//! [`invalidate_all`](RowLayoutCache::invalidate_all) bumps a generation so
//! stale entries are recomputed lazily.

use rustc_hash::FxHashMap;
use slidable_core::geometry::{ActionPosition, Axis};

use crate::action::ActionLayout;
use crate::row::{ItemLayoutResult, RowLayoutInput, layout_action_row};

/// Key identifying one row layout computation.
///
/// Floats are stored by bit pattern so the key is `Eq + Hash`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RowLayoutCacheKey {
    pub position: ActionPosition,
    pub axis: Axis,
    pub width_bits: u64,
    pub height_bits: u64,
    pub layout: ActionLayout,
    /// Flex factors in item order; the length is the item count.
    pub flexes: Box<[Option<u32>]>,
    pub expanded_index: Option<usize>,
    pub progress_bits: u64,
    pub reveal_bits: u64,
}

impl RowLayoutCacheKey {
    /// Build the key for `input`.
    #[must_use]
    pub fn new(input: &RowLayoutInput<'_>) -> Self {
        let (expanded_index, progress) = match input.expansion.index {
            Some(index) => (Some(index), input.expansion.progress),
            None => (None, 0.0),
        };
        Self {
            position: input.position,
            axis: input.axis,
            width_bits: input.size.width.to_bits(),
            height_bits: input.size.height.to_bits(),
            layout: input.layout,
            flexes: input.flexes.into(),
            expanded_index,
            progress_bits: progress.to_bits(),
            reveal_bits: input.reveal.to_bits(),
        }
    }
}

#[derive(Clone, Debug)]
struct CachedRow {
    result: Option<ItemLayoutResult>,
    generation: u64,
    access_count: u32,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Default)]
pub struct RowLayoutCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Bounded memo table for [`layout_action_row`].
#[derive(Debug)]
pub struct RowLayoutCache {
    entries: FxHashMap<RowLayoutCacheKey, CachedRow>,
    generation: u64,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl RowLayoutCache {
    /// Create a cache holding at most `max_entries` results.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: FxHashMap::with_capacity_and_hasher(max_entries, Default::default()),
            generation: 0,
            max_entries,
            hits: 0,
            misses: 0,
        }
    }

    /// Solve `input`, reusing a previous result for an identical key.
    pub fn layout(&mut self, input: &RowLayoutInput<'_>) -> Option<ItemLayoutResult> {
        let key = RowLayoutCacheKey::new(input);
        if let Some(entry) = self.entries.get_mut(&key)
            && entry.generation == self.generation
        {
            self.hits += 1;
            entry.access_count = entry.access_count.saturating_add(1);
            return entry.result.clone();
        }

        self.misses += 1;
        let result = layout_action_row(input);
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict_least_used();
        }
        self.entries.insert(
            key,
            CachedRow {
                result: result.clone(),
                generation: self.generation,
                access_count: 1,
            },
        );
        result
    }

    /// Mark every entry stale.
    pub fn invalidate_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn stats(&self) -> RowLayoutCacheStats {
        let total = self.hits + self.misses;
        RowLayoutCacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: if total > 0 {
                self.hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_least_used(&mut self) {
        if let Some(key) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.access_count)
            .map(|(key, _)| key.clone())
        {
            self.entries.remove(&key);
        }
    }
}

impl Default for RowLayoutCache {
    fn default() -> Self {
        Self::new(16)
    }
}
