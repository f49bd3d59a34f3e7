use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the tupl binary.
#[derive(Parser, Debug)]
#[command(
    name = "tupl",
    version,
    about = "Intern value sequences and inspect the interning trie"
)]
pub struct CliArgs {
    /// Interner config file (JSON: minSweepLen, sweepGrowthFactor).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Intern each sequence and report which results are identical.
    ///
    /// Sequences are comma separated literals: numbers (`1`, `-0`, `NaN`),
    /// integers (`42n`), `true`/`false`, `null`, `undefined`, quoted strings,
    /// named symbols (`@tag`), named objects (`&obj`), fresh objects (`&`), and
    /// bare words (strings). Names are shared across all sequences of one run.
    Intern {
        #[arg(required = true, allow_hyphen_values = true)]
        sequences: Vec<String>,
    },

    /// Intern and discard sequences ending in a fresh object, then report how
    /// much of the trie was reclaimed.
    Churn {
        /// Number of intern-and-discard rounds.
        #[arg(long, default_value_t = 10_000)]
        rounds: usize,

        /// Literal prefix placed before the fresh object in every round.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        prefix: String,
    },

    /// Race threads to intern the same sequence for the first time.
    Race {
        /// Number of threads.
        #[arg(long, default_value_t = 8)]
        threads: usize,

        /// Length of the raced sequence.
        #[arg(long, default_value_t = 4)]
        len: usize,
    },
}
