//! Values that can appear as tuple elements.
//!
//! Every value belongs to one of two key classes:
//!
//! - **Object keys** (`Value::Object`): shared references compared by identity.
//!   The trie holds them weakly, so an entry disappears once nothing else keeps
//!   the object alive.
//! - **Primitive keys** (everything else): compared by value and held strongly.
//!
//! Primitive equality follows value-map semantics rather than IEEE equality:
//! `0.0` and `-0.0` are one key, and NaN equals itself.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tupl_common::Brand;

// =============================================================================
// Branded - identity-compared object payloads
// =============================================================================

/// Payload of an [`Object`].
///
/// The engine never looks at the payload itself, only at its brand. Plain
/// objects created with [`Object::new`] have no brand; interned tuples carry
/// [`tupl_common::TUPLE_BRAND`].
pub trait Branded: Any + Send + Sync {
    /// Brand used for structural type tests.
    fn brand(&self) -> Option<Brand> {
        None
    }

    /// Borrow the payload for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Convert a shared payload into a shared `Any` for owned downcasting.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Render the payload for `Debug`/`Display` of the owning value.
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[object]")
    }
}

/// Unbranded wrapper around an arbitrary payload.
struct Opaque<T>(T);

impl<T: Send + Sync + 'static> Branded for Opaque<T> {
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// An invocable payload, the counterpart of a function reference.
pub struct Callable(Box<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Callable {
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl Branded for Callable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[function]")
    }
}

// =============================================================================
// Object
// =============================================================================

/// A shared reference compared by identity.
///
/// Cloning an `Object` clones the handle, not the payload; clones are the same
/// object. Two objects built from equal payloads are different objects.
#[derive(Clone)]
pub struct Object(Arc<dyn Branded>);

impl Object {
    /// Allocate a new object around `payload`.
    pub fn new<T: Send + Sync + 'static>(payload: T) -> Self {
        Object(Arc::new(Opaque(payload)))
    }

    /// Allocate a new invocable object.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Object(Arc::new(Callable(Box::new(f))))
    }

    /// Wrap an existing branded payload.
    pub fn from_branded(payload: Arc<dyn Branded>) -> Self {
        Object(payload)
    }

    /// Address of the payload, stable for as long as any strong or weak handle exists.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        self.addr() == other.addr()
    }

    #[inline]
    pub fn brand(&self) -> Option<Brand> {
        self.0.brand()
    }

    /// Borrow the payload as `T` if that is its type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Call the object if it was created with [`Object::from_fn`].
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        self.downcast_ref::<Callable>().map(|callable| callable.call(args))
    }

    pub fn downgrade(&self) -> WeakObject {
        WeakObject(Arc::downgrade(&self.0))
    }

    /// Number of strong handles to this object.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub(crate) fn payload(&self) -> &Arc<dyn Branded> {
        &self.0
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe(f)
    }
}

/// A weak handle to an [`Object`].
///
/// A weak handle pins the allocation (but not the payload), so the address of a
/// dead object cannot be reused while its weak handle exists.
#[derive(Clone)]
pub struct WeakObject(Weak<dyn Branded>);

impl WeakObject {
    pub fn upgrade(&self) -> Option<Object> {
        self.0.upgrade().map(Object)
    }

    /// Whether the object has been dropped.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.0.strong_count() == 0
    }

    #[inline]
    pub fn addr(&self) -> usize {
        Weak::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for WeakObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakObject({:#x}, dead: {})", self.addr(), self.is_dead())
    }
}

// =============================================================================
// Symbol
// =============================================================================

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique primitive marker.
///
/// Every call to [`Symbol::new`] yields a symbol different from all others,
/// even with the same description. Symbols are primitives: they are compared by
/// id and held strongly as keys.
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Symbol {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(description.into()),
        }
    }

    pub fn anonymous() -> Self {
        Symbol {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

// =============================================================================
// Value
// =============================================================================

/// A tuple element.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    /// A double. `0.0`/`-0.0` are the same key, as are all NaNs.
    Number(f64),
    /// An integer. A separate key class from `Number`: `Int(1)` and
    /// `Number(1.0)` intern differently. No `From` conversion produces it, so
    /// `Value::from(1)` is always `Number(1.0)`.
    Int(i64),
    Str(Arc<str>),
    Symbol(Symbol),
    Object(Object),
}

/// Which backing map a key is routed to.
#[derive(Debug)]
pub enum KeyClass<'a> {
    Object(&'a Object),
    Primitive(PrimitiveKey),
}

/// Hashable, value-compared form of a primitive value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKey {
    Undefined,
    Null,
    Bool(bool),
    Number(u64),
    Int(i64),
    Str(Arc<str>),
    Symbol(u64),
}

/// Bit pattern every NaN is normalized to.
const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

/// Normalize a double to its key bits: one zero, one NaN.
#[inline]
pub(crate) fn number_key_bits(n: f64) -> u64 {
    if n.is_nan() {
        CANONICAL_NAN_BITS
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

impl Value {
    /// Classify this value for routing into a hybrid map.
    pub fn key_class(&self) -> KeyClass<'_> {
        match self {
            Value::Object(object) => KeyClass::Object(object),
            Value::Undefined => KeyClass::Primitive(PrimitiveKey::Undefined),
            Value::Null => KeyClass::Primitive(PrimitiveKey::Null),
            Value::Bool(b) => KeyClass::Primitive(PrimitiveKey::Bool(*b)),
            Value::Number(n) => KeyClass::Primitive(PrimitiveKey::Number(number_key_bits(*n))),
            Value::Int(i) => KeyClass::Primitive(PrimitiveKey::Int(*i)),
            Value::Str(s) => KeyClass::Primitive(PrimitiveKey::Str(Arc::clone(s))),
            Value::Symbol(sym) => KeyClass::Primitive(PrimitiveKey::Symbol(sym.id())),
        }
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Object(_), _) | (_, Value::Object(_)) => false,
            (Value::Number(a), Value::Number(b)) => number_key_bits(*a) == number_key_bits(*b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.key_class() {
            KeyClass::Object(object) => {
                state.write_u8(0xff);
                object.hash(state);
            }
            KeyClass::Primitive(key) => key.hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Int(i) => write!(f, "{i}n"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Symbol(sym) => write!(f, "{sym:?}"),
            Value::Object(object) => write!(f, "{object:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// Integers convert to `Number`. Build `Value::Int` explicitly for the integer
/// key class.
impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
#[path = "../tests/value_tests.rs"]
mod tests;
