//! Unordered-pair cache for correlation results.
//!
//! One flat map keyed by the canonically ordered `(low, high)` tuple. Keys
//! are cloned into the tuple on every access, so `K` should be cheap to
//! clone; [`EntityId`] is reference counted.

use std::collections::HashMap;
use std::hash::Hash;

use crate::EntityId;

/// Symmetric cache keyed by an unordered pair.
///
/// `(a, b)` and `(b, a)` resolve to one slot: keys are stored with the
/// smaller element first. There is no per-entry removal; the owner clears
/// the whole cache when its inputs change.
#[derive(Debug, Clone)]
pub struct PairStatsCache<K = EntityId, V = f64> {
    slots: HashMap<(K, K), V>,
}

impl<K, V> Default for PairStatsCache<K, V> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K, V> PairStatsCache<K, V>
where
    K: Ord + Hash + Clone,
    V: Copy,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: &K, b: &K) -> Option<V> {
        let (low, high) = ordered(a, b);
        self.slots.get(&(low.clone(), high.clone())).copied()
    }

    pub fn set(&mut self, a: &K, b: &K, value: V) {
        let (low, high) = ordered(a, b);
        self.slots.insert((low.clone(), high.clone()), value);
    }

    pub fn contains(&self, a: &K, b: &K) -> bool {
        self.get(a, b).is_some()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Canonical `(low, high)` pairs with their values, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &K, V)> {
        self.slots.iter().map(|((low, high), value)| (low, high, *value))
    }
}

fn ordered<'a, K: Ord>(a: &'a K, b: &'a K) -> (&'a K, &'a K) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
