//! Log output for the `tupl` binary.
//!
//! The engine crates only emit events. A subscriber is installed by
//! [`init_tracing`], and only when `TUPL_LOG` (or, failing that, `RUST_LOG`)
//! holds filter directives. Output always goes to stderr, since `tupl`
//! reports on stdout.
//!
//! ## Targets
//!
//! | Target | Level | Events |
//! |--------|-------|--------|
//! | `tupl_core::trie` | trace | node created for a new edge, tuple built for a new path |
//! | `tupl_core::hybrid_map` | trace | backing map allocated |
//! | `tupl_core::hybrid_map` | debug | dead weak keys swept (count, live, next threshold) |
//! | `tupl_core::interner` | debug | shared root registered, full sweep finished |
//! | `tupl_common::config` | debug | config file loaded |
//! | `tupl_cli::driver` | info | churn summary, ignored `--config` |
//!
//! `TUPL_LOG_FORMAT` picks the layout: `text`, `tree` (indented, via
//! `tracing-tree`) or `json`. Unknown names mean `text`.
//!
//! ```bash
//! # Every node the race creates, indented by span
//! TUPL_LOG=tupl_core::trie=trace TUPL_LOG_FORMAT=tree tupl race --threads 4
//!
//! # Sweep counts only, machine readable
//! TUPL_LOG=tupl_core::hybrid_map=debug TUPL_LOG_FORMAT=json tupl churn
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};
use tracing_tree::HierarchicalLayer;

/// Filter directives for the engine.
pub const LOG_ENV: &str = "TUPL_LOG";
/// Output layout, see [`LogFormat`].
pub const LOG_FORMAT_ENV: &str = "TUPL_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event, with its target.
    Text,
    /// Events nested under their spans.
    Tree,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively. Unknown names mean `Text`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default())
    }
}

/// Directives from `TUPL_LOG`, then `RUST_LOG`. `None` if neither is set.
fn filter_from_env() -> Option<EnvFilter> {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok()?;
    Some(EnvFilter::builder().parse_lossy(directives))
}

/// Install the global subscriber if logging was requested.
pub fn init_tracing() {
    let Some(filter) = filter_from_env() else {
        return;
    };
    let registry = Registry::default().with(filter);

    match LogFormat::from_env() {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Tree => registry
            .with(
                HierarchicalLayer::default()
                    .with_writer(std::io::stderr)
                    .with_indent_amount(2)
                    .with_targets(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
