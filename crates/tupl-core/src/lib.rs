//! Structural interning of value sequences.
//!
//! Interning a sequence returns a canonical, immutable [`Tuple`]: two sequences
//! with equal elements in the same order yield the identical tuple, so tuples
//! compare and hash in O(1) and work as map keys.
//!
//! ```
//! use tupl_core::{Object, Value, intern, is_tuple};
//!
//! let a = intern([Value::from(1), Value::from("x")]);
//! let b = intern([Value::from(1), Value::from("x")]);
//! assert!(a.ptr_eq(&b));
//! assert!(is_tuple(&a.to_value()));
//!
//! // Object elements are compared by identity.
//! let key = Object::new("payload");
//! let c = intern([Value::from(key.clone())]);
//! let d = intern([Value::from(key)]);
//! assert_eq!(c, d);
//! ```
//!
//! ## Layout
//!
//! - `value`: element model (`Value`, `Object`, `Symbol`) and key classification
//! - `hybrid_map`: map holding object keys weakly and primitive keys strongly
//! - `trie`: per-node locked trie of hybrid maps
//! - `interner`: interning entry point and the process-wide root registry
//! - `tuple`: the interned tuple and its read-only sequence operations
//!
//! Keys must keep a stable identity (objects) or value (primitives) for as long
//! as they are used; both hold by construction for `Value`.

pub mod hybrid_map;
mod interner;
mod trie;
mod tuple;
pub mod value;

pub use hybrid_map::HybridMap;
pub use interner::{Interner, empty, intern};
pub use trie::TrieStats;
pub use tuple::{Tuple, is_tuple};
pub use value::{Branded, Callable, KeyClass, Object, PrimitiveKey, Symbol, Value, WeakObject};

#[cfg(test)]
#[path = "../tests/concurrent_tests.rs"]
mod concurrent_tests;
