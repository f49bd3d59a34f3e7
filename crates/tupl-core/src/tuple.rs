//! Interned tuples and the read-only sequence operations on them.
//!
//! A [`Tuple`] is the canonical object for one value sequence: interning the
//! same elements again yields the same tuple, so equality and hashing are by
//! identity and cost O(1).
//!
//! Tuples are immutable. Reads go through `Deref<Target = [Value]>`; operations
//! that produce a new sequence (`map`, `filter`, `slice`, `concat`, ...) build a
//! plain `Vec` and intern it into the pool the receiver came from.

use crate::interner::Interner;
use crate::trie::TrieNode;
use crate::value::{Branded, Object, Value};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Bound, Deref, RangeBounds};
use std::sync::{Arc, Weak};
use tupl_common::{Brand, TUPLE_BRAND};

/// Storage behind a [`Tuple`] handle.
pub(crate) struct TupleData {
    brand: Brand,
    items: Box<[Value]>,
    /// Root of the pool this tuple was interned in. Weak, because the pool's
    /// nodes hold primitive-only tuples strongly.
    pool: Weak<TrieNode>,
}

impl Branded for TupleData {
    fn brand(&self) -> Option<Brand> {
        Some(self.brand)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        f.debug_list().entries(self.items.iter()).finish()
    }
}

/// Whether `value` is an interned tuple.
///
/// The test reads the brand, so tuples produced by another copy of this engine
/// in the same process are recognised too.
pub fn is_tuple(value: &Value) -> bool {
    matches!(value, Value::Object(object) if object.brand() == Some(TUPLE_BRAND))
}

/// Canonical immutable sequence of values.
#[derive(Clone)]
pub struct Tuple(Arc<TupleData>);

impl Tuple {
    pub(crate) fn new_in(pool: &Arc<TrieNode>, items: Box<[Value]>) -> Self {
        Tuple(Arc::new(TupleData {
            brand: TUPLE_BRAND,
            items,
            pool: Arc::downgrade(pool),
        }))
    }

    pub(crate) fn from_data(data: Arc<TupleData>) -> Self {
        Tuple(data)
    }

    pub(crate) fn downgrade(&self) -> Weak<TupleData> {
        Arc::downgrade(&self.0)
    }

    /// Recover a tuple stored in a value.
    ///
    /// Returns `None` for non-tuples and for tuples branded by another copy of
    /// the engine, whose storage type this copy cannot read.
    pub fn from_value(value: &Value) -> Option<Tuple> {
        let object = value.as_object()?;
        if object.brand() != Some(TUPLE_BRAND) {
            return None;
        }
        Arc::clone(object.payload())
            .into_any()
            .downcast::<TupleData>()
            .ok()
            .map(Tuple)
    }

    /// Wrap this tuple as an object value, e.g. to nest it in another tuple.
    pub fn to_value(&self) -> Value {
        let payload: Arc<dyn Branded> = self.0.clone();
        Value::Object(Object::from_branded(payload))
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.0.items
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Tuple) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy the elements into a plain, mutable vector.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.to_vec()
    }

    /// Interner owning the pool this tuple lives in.
    ///
    /// Falls back to the global pool if an isolated pool was dropped while the
    /// tuple outlived it.
    pub fn interner(&self) -> Interner {
        self.0
            .pool
            .upgrade()
            .map(Interner::from_root)
            .unwrap_or_else(Interner::global)
    }

    // =========================================================================
    // Derived sequences
    // =========================================================================

    pub fn map(&self, f: impl FnMut(&Value) -> Value) -> Tuple {
        self.interner().intern(self.iter().map(f))
    }

    pub fn filter(&self, mut predicate: impl FnMut(&Value) -> bool) -> Tuple {
        self.interner()
            .intern(self.iter().filter(|value| predicate(value)).cloned())
    }

    /// Sub-sequence in `range`, clamped to the tuple's bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Tuple {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        }
        .min(len);

        if start == 0 && end == len {
            return self.clone();
        }
        self.interner()
            .intern_slice(&self.as_slice()[start..end.max(start)])
    }

    /// Append `parts` after this tuple's elements. A part that is itself a
    /// tuple is spread into its elements; any other value is appended as is.
    pub fn concat(&self, parts: &[Value]) -> Tuple {
        let mut items = self.to_vec();
        for part in parts {
            match Tuple::from_value(part) {
                Some(tuple) => items.extend_from_slice(tuple.as_slice()),
                None => items.push(part.clone()),
            }
        }
        self.interner().intern(items)
    }

    pub fn reversed(&self) -> Tuple {
        self.interner().intern(self.iter().rev().cloned())
    }

    /// Copy with the element at `index` replaced, or `None` if out of bounds.
    pub fn with(&self, index: usize, value: Value) -> Option<Tuple> {
        if index >= self.len() {
            return None;
        }
        let mut items = self.to_vec();
        items[index] = value;
        Some(self.interner().intern(items))
    }

    /// Copy with `value` appended.
    pub fn pushed(&self, value: Value) -> Tuple {
        let mut items = self.to_vec();
        items.push(value);
        self.interner().intern(items)
    }

    pub fn sorted_by(&self, compare: impl FnMut(&Value, &Value) -> Ordering) -> Tuple {
        let mut items = self.to_vec();
        items.sort_by(compare);
        self.interner().intern(items)
    }
}

impl Deref for Tuple {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0.items
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.items.iter()
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Tuple {}

impl Hash for Tuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe(f)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe(f)
    }
}

impl From<Tuple> for Value {
    fn from(tuple: Tuple) -> Self {
        tuple.to_value()
    }
}

impl From<&Tuple> for Value {
    fn from(tuple: &Tuple) -> Self {
        tuple.to_value()
    }
}

impl FromIterator<Value> for Tuple {
    /// Intern into the global pool.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Interner::global().intern(iter)
    }
}

#[cfg(test)]
#[path = "../tests/tuple_tests.rs"]
mod tests;
