//! Trie of hybrid maps that canonicalizes value sequences.
//!
//! Each node represents one prefix. The edge from a node to its child is
//! labelled with the next element, and the node reached after the last element
//! owns the payload slot holding the canonical tuple for that exact sequence.
//!
//! Locking is per node. A child lookup takes the branch read lock and upgrades
//! to the write lock only on a miss, re-checking before insert. No caller holds
//! two node locks at once, so lock order never matters.
//!
//! A path is as deep as its sequence is long, so a node never frees its
//! descendants recursively: `Drop` unlinks them onto a heap stack first.

use crate::hybrid_map::HybridMap;
use crate::tuple::{Tuple, TupleData};
use crate::value::Value;
use std::fmt;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};
use tracing::trace;
use tupl_common::InternerConfig;

/// Canonical tuple slot of a node.
pub(crate) enum Payload {
    Vacant,
    /// Tuple of primitives only: cached for as long as the node lives.
    Strong(Tuple),
    /// Tuple holding objects. A strong handle here would keep the node's own
    /// weak keys alive through the tuple's elements.
    Weak(Weak<TupleData>),
}

impl Payload {
    fn get(&self) -> Option<Tuple> {
        match self {
            Payload::Vacant => None,
            Payload::Strong(tuple) => Some(tuple.clone()),
            Payload::Weak(weak) => weak.upgrade().map(Tuple::from_data),
        }
    }

    fn retain(tuple: &Tuple) -> Self {
        if tuple.iter().any(Value::is_object) {
            Payload::Weak(tuple.downgrade())
        } else {
            Payload::Strong(tuple.clone())
        }
    }
}

pub(crate) struct TrieNode {
    branches: RwLock<HybridMap<Arc<TrieNode>>>,
    payload: Mutex<Payload>,
    config: InternerConfig,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TrieNode {
    pub(crate) fn new(config: InternerConfig) -> Self {
        TrieNode {
            branches: RwLock::new(HybridMap::with_config(config)),
            payload: Mutex::new(Payload::Vacant),
            config,
        }
    }

    /// Child reached through `key`, created if absent.
    pub(crate) fn child(&self, key: &Value) -> Arc<TrieNode> {
        if let Some(child) = read(&self.branches).get(key) {
            return Arc::clone(child);
        }

        let mut branches = write(&self.branches);
        if let Some(child) = branches.get(key) {
            return Arc::clone(child);
        }
        trace!(key = ?key, "creating trie node");
        Arc::clone(branches.set(key, Arc::new(TrieNode::new(self.config))))
    }

    /// Read the canonical tuple, building it with `build` if there is none.
    ///
    /// The slot stays locked while `build` runs, so concurrent callers on the
    /// same node observe exactly one construction.
    pub(crate) fn payload_or_insert_with(&self, build: impl FnOnce() -> Tuple) -> Tuple {
        let mut slot = lock(&self.payload);
        if let Some(tuple) = slot.get() {
            return tuple;
        }
        let tuple = build();
        trace!(len = tuple.len(), "interned new tuple");
        *slot = Payload::retain(&tuple);
        tuple
    }

    /// Sweep dead weak keys in this node and every live descendant.
    pub(crate) fn sweep_recursive(self: &Arc<Self>) -> usize {
        let mut reclaimed = 0;
        let mut stack = vec![Arc::clone(self)];
        while let Some(node) = stack.pop() {
            let mut branches = write(&node.branches);
            reclaimed += branches.sweep();
            stack.extend(branches.live_values().cloned());
        }
        reclaimed
    }

    pub(crate) fn stats(self: &Arc<Self>) -> TrieStats {
        let mut stats = TrieStats::default();
        let mut stack = vec![Arc::clone(self)];
        while let Some(node) = stack.pop() {
            stats.nodes += 1;
            if lock(&node.payload).get().is_some() {
                stats.tuples += 1;
            }

            let branches = read(&node.branches);
            stats.strong_entries += branches.strong_len();
            stats.weak_entries += branches.weak_len();
            stats.dead_entries += branches.dead_len();
            stack.extend(branches.all_values().cloned());
        }
        stats
    }
}

impl Drop for TrieNode {
    fn drop(&mut self) {
        let branches = self
            .branches
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        let mut stack: Vec<Arc<TrieNode>> = branches.drain_values().collect();

        while let Some(child) = stack.pop() {
            // Nodes still shared elsewhere are freed by their last owner.
            if let Some(mut node) = Arc::into_inner(child) {
                let branches = node
                    .branches
                    .get_mut()
                    .unwrap_or_else(PoisonError::into_inner);
                stack.extend(branches.drain_values());
            }
        }
    }
}

/// Snapshot of a trie's size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrieStats {
    /// Allocated nodes, root included, reachable through any entry.
    pub nodes: usize,
    /// Nodes whose payload currently resolves to a live tuple.
    pub tuples: usize,
    /// Entries keyed by primitives.
    pub strong_entries: usize,
    /// Entries keyed by objects, dead ones included.
    pub weak_entries: usize,
    /// Entries whose key object is gone but which have not been swept yet.
    pub dead_entries: usize,
}

impl fmt::Display for TrieStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} tuples={} strong={} weak={} dead={}",
            self.nodes, self.tuples, self.strong_entries, self.weak_entries, self.dead_entries
        )
    }
}

#[cfg(test)]
#[path = "../tests/trie_tests.rs"]
mod tests;
