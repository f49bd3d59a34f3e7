//! Brand markers for structural type tests.
//!
//! An interned tuple is recognised by the value of its brand field, not by its
//! Rust type. Two copies of the engine linked into one process (for example two
//! semver-incompatible versions pulled in by different dependencies) have
//! distinct `TypeId`s for their tuple types, but they agree on the brand value
//! below and so still recognise each other's tuples.

use std::fmt;

/// A 128-bit marker compared by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Brand(u128);

impl Brand {
    /// Create a brand from its raw value.
    pub const fn new(raw: u128) -> Self {
        Brand(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u128 {
        self.0
    }
}

impl fmt::Debug for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Brand({:#034x})", self.0)
    }
}

/// Brand carried by every interned tuple.
///
/// The value spells `tupl.tuple.v1` in ASCII, zero padded. It must never change
/// between releases or tuples from different releases stop recognising each
/// other.
pub const TUPLE_BRAND: Brand = Brand(0x7475_706c_2e74_7570_6c65_2e76_3100_0000);

/// Registry slot under which the process-wide trie root is published.
pub const ROOT_KEY: &str = "tupl.intern.root/v1";
