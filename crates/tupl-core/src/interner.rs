//! Interning entry point and the process-wide root registry.
//!
//! Interning walks the trie from a root node, one edge per element, creating
//! missing nodes on the way, then reads or creates the canonical tuple at the
//! terminal node. The zero-length sequence never leaves the root, so the root's
//! own payload is the single empty tuple of its pool.
//!
//! ## Pools
//!
//! | Constructor | Root | Use Case |
//! |-------------|------|----------|
//! | `Interner::global()` | registry slot `ROOT_KEY` | normal use, shared by every caller |
//! | `Interner::new()` / `with_config` | private | tests, measurements, isolated workloads |
//!
//! The global root is published in a registry under the well-known
//! `ROOT_KEY`. The registry is a static of this crate, so convergence holds
//! within one linked copy of `tupl-core`: every dependent that resolves to the
//! same semver-compatible version shares the pool. Copies linked at
//! incompatible versions own separate registries and separate pools; they only
//! agree on `TUPLE_BRAND`, so `is_tuple` still recognises the other copy's
//! tuples.

use crate::trie::{TrieNode, TrieStats};
use crate::tuple::Tuple;
use crate::value::Value;
use dashmap::DashMap;
use smallvec::SmallVec;
use std::sync::{Arc, OnceLock};
use tracing::debug;
use tupl_common::limits::INLINE_SEQUENCE_LEN;
use tupl_common::{InternerConfig, ROOT_KEY};

type SequenceBuffer = SmallVec<[Value; INLINE_SEQUENCE_LEN]>;

/// Process-wide registry of shared roots.
static ROOTS: OnceLock<DashMap<&'static str, Arc<TrieNode>>> = OnceLock::new();

fn roots() -> &'static DashMap<&'static str, Arc<TrieNode>> {
    ROOTS.get_or_init(|| {
        debug!("initializing root registry");
        DashMap::new()
    })
}

/// Root registered under `key`, created with `config` if absent.
fn shared_root(key: &'static str, config: InternerConfig) -> Arc<TrieNode> {
    let entry = roots().entry(key).or_insert_with(|| {
        debug!(key, ?config, "registering shared trie root");
        Arc::new(TrieNode::new(config))
    });
    Arc::clone(entry.value())
}

/// Handle to an interning pool.
///
/// Cloning the handle shares the pool.
#[derive(Clone)]
pub struct Interner {
    root: Arc<TrieNode>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Handle to the process-wide pool.
    pub fn global() -> Self {
        Interner {
            root: shared_root(ROOT_KEY, InternerConfig::default()),
        }
    }

    /// Configure the process-wide pool before its first use.
    ///
    /// Returns `false` (and leaves the pool untouched) if the global pool
    /// already exists.
    pub fn init_global(config: InternerConfig) -> bool {
        let mut created = false;
        roots().entry(ROOT_KEY).or_insert_with(|| {
            created = true;
            debug!(?config, "configuring shared trie root");
            Arc::new(TrieNode::new(config))
        });
        created
    }

    /// A private pool with the default configuration.
    pub fn new() -> Self {
        Self::with_config(InternerConfig::default())
    }

    /// A private pool. Tuples from it are never identical to tuples from any
    /// other pool.
    pub fn with_config(config: InternerConfig) -> Self {
        Interner {
            root: Arc::new(TrieNode::new(config)),
        }
    }

    pub(crate) fn from_root(root: Arc<TrieNode>) -> Self {
        Interner { root }
    }

    /// Canonical tuple for `items`.
    pub fn intern<I>(&self, items: I) -> Tuple
    where
        I: IntoIterator<Item = Value>,
    {
        let items: SequenceBuffer = items.into_iter().collect();
        let terminal = self.walk(&items);
        terminal.payload_or_insert_with(|| {
            Tuple::new_in(&self.root, items.into_vec().into_boxed_slice())
        })
    }

    /// Canonical tuple for `items`, copying them only if no tuple exists yet.
    pub fn intern_slice(&self, items: &[Value]) -> Tuple {
        let terminal = self.walk(items);
        terminal.payload_or_insert_with(|| Tuple::new_in(&self.root, items.into()))
    }

    /// Whether both handles share one pool.
    pub fn same_pool(&self, other: &Interner) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Whether `tuple` was interned in this pool.
    pub fn owns(&self, tuple: &Tuple) -> bool {
        self.same_pool(&tuple.interner())
    }

    /// Reclaim every entry whose key object is gone. Returns the number of
    /// entries dropped.
    ///
    /// Reclamation also happens incrementally while interning; this is only
    /// needed to release memory eagerly.
    pub fn sweep(&self) -> usize {
        let reclaimed = self.root.sweep_recursive();
        debug!(reclaimed, "full trie sweep");
        reclaimed
    }

    pub fn stats(&self) -> TrieStats {
        self.root.stats()
    }

    fn walk(&self, items: &[Value]) -> Arc<TrieNode> {
        let mut node = Arc::clone(&self.root);
        for item in items {
            node = node.child(item);
        }
        node
    }
}

/// Canonical tuple for `items` in the process-wide pool.
pub fn intern<I>(items: I) -> Tuple
where
    I: IntoIterator<Item = Value>,
{
    Interner::global().intern(items)
}

/// The process-wide empty tuple.
pub fn empty() -> Tuple {
    Interner::global().intern_slice(&[])
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
