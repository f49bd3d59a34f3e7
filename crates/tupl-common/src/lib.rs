//! Common types and utilities for the tupl interning engine.
//!
//! This crate provides the pieces every tupl crate agrees on:
//! - The tuple brand sentinel and the well-known root registry key (`Brand`)
//! - Tuning limits for weak-key reclamation
//! - Interner configuration (`InternerConfig`)
//! - Tracing subscriber setup for binaries

// Brand sentinel and registry keys shared by every copy of the engine
pub mod brand;
pub use brand::{Brand, ROOT_KEY, TUPLE_BRAND};

// Centralized limits and thresholds
pub mod limits;

// Interner configuration loaded from JSON
pub mod config;
pub use config::{ConfigError, InternerConfig};

// Tracing subscriber initialisation (binaries only)
pub mod tracing_config;
