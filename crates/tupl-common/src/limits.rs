//! Centralized limits and thresholds for the interning engine.
//!
//! # Categories
//!
//! - **Reclamation**: when weak-keyed maps drop entries whose key object died
//! - **Capacity**: inline buffer sizes used on the interning hot path

// =============================================================================
// Reclamation
// =============================================================================

/// Minimum number of weak entries a map holds before it sweeps dead keys.
///
/// Small maps are never swept: a handful of dead entries costs less than
/// walking the map on every insert. Once a map reaches this size, each insert
/// that finds the map at its sweep threshold first drops all dead entries.
pub const MIN_SWEEP_LEN: usize = 32;

/// Growth factor applied to the live entry count after a sweep.
///
/// After a sweep leaves `live` entries, the next sweep happens when the map
/// reaches `max(MIN_SWEEP_LEN, live * SWEEP_GROWTH_FACTOR)` entries. With a
/// factor of 2 the amortized sweep cost per insert is O(1) and a map never holds
/// more dead entries than live ones (beyond the `MIN_SWEEP_LEN` floor).
pub const SWEEP_GROWTH_FACTOR: usize = 2;

// =============================================================================
// Capacity
// =============================================================================

/// Sequences up to this length are buffered inline while interning.
pub const INLINE_SEQUENCE_LEN: usize = 8;
