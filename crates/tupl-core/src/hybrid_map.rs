//! Associative map that holds object keys weakly and primitive keys strongly.
//!
//! `HybridMap` routes every key by its [`KeyClass`]:
//!
//! | Key class | Backing map | Key held | Compared by |
//! |-----------|-------------|----------|-------------|
//! | Object    | `weak`      | weakly   | identity (address) |
//! | Primitive | `strong`    | strongly | value (`PrimitiveKey`) |
//!
//! Both backing maps are allocated on first insert of their key class.
//!
//! ## Reclamation
//!
//! A weak entry stores a [`WeakObject`] next to its value. Once the key object
//! is dropped the entry is dead: lookups ignore it and the next sweep removes
//! it, dropping its value. Sweeps run inside `set` when the weak map reaches its
//! sweep threshold, after which the threshold is reset from the live count (see
//! [`InternerConfig::next_sweep_at`]). A map therefore never grows beyond
//! roughly twice its live population, no matter how many keys come and go.

use crate::value::{KeyClass, Object, PrimitiveKey, Value, WeakObject};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, trace};
use tupl_common::InternerConfig;

struct WeakEntry<V> {
    key: WeakObject,
    value: V,
}

/// Object-keyed map with dead-entry sweeping.
struct WeakKeyMap<V> {
    /// Keyed by object address. A live `WeakObject` pins the address.
    entries: FxHashMap<usize, WeakEntry<V>>,
    sweep_at: usize,
}

impl<V> WeakKeyMap<V> {
    fn new(config: &InternerConfig) -> Self {
        WeakKeyMap {
            entries: FxHashMap::default(),
            sweep_at: config.next_sweep_at(0),
        }
    }

    fn get(&self, key: &Object) -> Option<&V> {
        self.entries
            .get(&key.addr())
            .filter(|entry| !entry.key.is_dead())
            .map(|entry| &entry.value)
    }

    fn insert(&mut self, key: &Object, value: V, config: &InternerConfig) -> &V {
        if self.entries.len() >= self.sweep_at {
            self.sweep(config);
        }

        let entry = WeakEntry {
            key: key.downgrade(),
            value,
        };
        match self.entries.entry(key.addr()) {
            Entry::Occupied(mut slot) => {
                slot.insert(entry);
                &slot.into_mut().value
            }
            Entry::Vacant(slot) => &slot.insert(entry).value,
        }
    }

    fn sweep(&mut self, config: &InternerConfig) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.key.is_dead());
        let live = self.entries.len();
        self.sweep_at = config.next_sweep_at(live);

        let reclaimed = before - live;
        if reclaimed > 0 {
            debug!(reclaimed, live, next_sweep_at = self.sweep_at, "swept dead weak keys");
        }
        reclaimed
    }
}

/// A map keyed by [`Value`] that holds object keys weakly.
///
/// The only mutation is `set`; there is no removal. Entries leave the map when
/// their key object dies and a sweep reclaims them.
pub struct HybridMap<V> {
    weak: Option<WeakKeyMap<V>>,
    strong: Option<FxHashMap<PrimitiveKey, V>>,
    config: InternerConfig,
}

impl<V> Default for HybridMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HybridMap<V> {
    /// Create an empty map with the default sweep policy.
    pub fn new() -> Self {
        Self::with_config(InternerConfig::default())
    }

    /// Create an empty map. Nothing is allocated until the first `set`.
    pub fn with_config(config: InternerConfig) -> Self {
        HybridMap {
            weak: None,
            strong: None,
            config,
        }
    }

    /// Look up `key` in the backing map of its key class.
    pub fn get(&self, key: &Value) -> Option<&V> {
        match key.key_class() {
            KeyClass::Object(object) => self.weak.as_ref()?.get(object),
            KeyClass::Primitive(primitive) => self.strong.as_ref()?.get(&primitive),
        }
    }

    /// Insert `value` under `key`, replacing any previous value, and return a
    /// reference to the stored value.
    pub fn set(&mut self, key: &Value, value: V) -> &V {
        let config = self.config;
        match key.key_class() {
            KeyClass::Object(object) => {
                let weak = self.weak.get_or_insert_with(|| {
                    trace!("allocating weak backing map");
                    WeakKeyMap::new(&config)
                });
                weak.insert(object, value, &config)
            }
            KeyClass::Primitive(primitive) => {
                let strong = self.strong.get_or_insert_with(|| {
                    trace!("allocating strong backing map");
                    FxHashMap::default()
                });
                match strong.entry(primitive) {
                    Entry::Occupied(mut slot) => {
                        slot.insert(value);
                        slot.into_mut()
                    }
                    Entry::Vacant(slot) => slot.insert(value),
                }
            }
        }
    }

    /// Drop every entry whose key object is dead. Returns the number dropped.
    pub fn sweep(&mut self) -> usize {
        let config = self.config;
        self.weak.as_mut().map_or(0, |weak| weak.sweep(&config))
    }

    /// Total entries, dead weak entries included.
    pub fn len(&self) -> usize {
        self.weak_len() + self.strong_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weak entries, dead ones included.
    pub fn weak_len(&self) -> usize {
        self.weak.as_ref().map_or(0, |weak| weak.entries.len())
    }

    pub fn strong_len(&self) -> usize {
        self.strong.as_ref().map_or(0, |strong| strong.len())
    }

    /// Weak entries whose key object has been dropped but not yet swept.
    pub fn dead_len(&self) -> usize {
        self.weak.as_ref().map_or(0, |weak| {
            weak.entries
                .values()
                .filter(|entry| entry.key.is_dead())
                .count()
        })
    }

    /// Whether the backing map for each key class has been allocated.
    pub fn is_allocated(&self) -> (bool, bool) {
        (self.weak.is_some(), self.strong.is_some())
    }

    /// Values under live keys.
    pub(crate) fn live_values(&self) -> impl Iterator<Item = &V> {
        let weak = self
            .weak
            .iter()
            .flat_map(|weak| weak.entries.values())
            .filter(|entry| !entry.key.is_dead())
            .map(|entry| &entry.value);
        let strong = self.strong.iter().flat_map(|strong| strong.values());
        weak.chain(strong)
    }

    /// Values under every key, dead weak keys included.
    pub(crate) fn all_values(&self) -> impl Iterator<Item = &V> {
        let weak = self
            .weak
            .iter()
            .flat_map(|weak| weak.entries.values())
            .map(|entry| &entry.value);
        let strong = self.strong.iter().flat_map(|strong| strong.values());
        weak.chain(strong)
    }

    /// Move every value out, leaving both backing maps unallocated.
    pub(crate) fn drain_values(&mut self) -> impl Iterator<Item = V> + use<V> {
        let weak = self
            .weak
            .take()
            .into_iter()
            .flat_map(|weak| weak.entries.into_values())
            .map(|entry| entry.value);
        let strong = self
            .strong
            .take()
            .into_iter()
            .flat_map(|strong| strong.into_values());
        weak.chain(strong)
    }
}

#[cfg(test)]
#[path = "../tests/hybrid_map_tests.rs"]
mod tests;
