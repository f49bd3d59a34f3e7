//! Command execution for the tupl binary.
//!
//! Every command writes its report to the given writer so the driver can be
//! exercised without a terminal.

use crate::args::{CliArgs, Command};
use crate::literal::LiteralParser;
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::io::Write;
use std::sync::{Arc, Barrier};
use std::thread;
use tracing::info;
use tupl_common::InternerConfig;
use tupl_core::{Interner, Object, Tuple, Value};

/// Run one parsed command line.
pub fn run(args: CliArgs, out: &mut impl Write) -> Result<()> {
    let config = match &args.config {
        Some(path) => InternerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => InternerConfig::default(),
    };

    match args.command {
        Command::Intern { sequences } => run_intern(&sequences, config, out),
        Command::Churn { rounds, prefix } => run_churn(rounds, &prefix, config, out),
        Command::Race { threads, len } => run_race(threads, len, config, out),
    }
}

/// Intern every sequence into the global pool and report identical results.
pub fn run_intern(
    sequences: &[String],
    config: InternerConfig,
    out: &mut impl Write,
) -> Result<()> {
    if !Interner::init_global(config) {
        info!("global pool already initialized; --config ignored");
    }
    let interner = Interner::global();
    let mut parser = LiteralParser::new();
    let mut seen: Vec<Tuple> = Vec::with_capacity(sequences.len());

    for (index, text) in sequences.iter().enumerate() {
        let items = parser
            .parse_sequence(text)
            .with_context(|| format!("parsing sequence {index}: {text:?}"))?;
        let tuple = interner.intern(items);

        let status = match seen.iter().position(|prev| prev.ptr_eq(&tuple)) {
            Some(first) => format!("same as [{first}]").cyan(),
            None => "new".green(),
        };
        writeln!(out, "[{index}] {tuple} {status}")?;
        seen.push(tuple);
    }
    Ok(())
}

/// Intern and discard `rounds` sequences that end in a fresh object.
pub fn run_churn(
    rounds: usize,
    prefix: &str,
    config: InternerConfig,
    out: &mut impl Write,
) -> Result<()> {
    let prefix = LiteralParser::new()
        .parse_sequence(prefix)
        .context("parsing --prefix")?;
    let interner = Interner::with_config(config);

    for round in 0..rounds {
        let mut items = prefix.clone();
        items.push(Value::from(Object::new(round)));
        interner.intern(items);
    }

    let before = interner.stats();
    let reclaimed = interner.sweep();
    let after = interner.stats();
    info!(rounds, reclaimed, "churn finished");

    writeln!(out, "rounds:       {rounds}")?;
    writeln!(out, "before sweep: {before}")?;
    writeln!(out, "reclaimed:    {reclaimed}")?;
    writeln!(out, "after sweep:  {after}")?;
    Ok(())
}

/// Race `threads` threads to intern `0n..lenn` into a fresh pool.
pub fn run_race(
    threads: usize,
    len: usize,
    config: InternerConfig,
    out: &mut impl Write,
) -> Result<()> {
    if threads == 0 {
        bail!("--threads must be at least 1");
    }

    let interner = Interner::with_config(config);
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let interner = interner.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let items: Vec<Value> = (0..len as i64).map(Value::Int).collect();
                barrier.wait();
                interner.intern(items)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(threads);
    for handle in handles {
        match handle.join() {
            Ok(tuple) => results.push(tuple),
            Err(_) => bail!("interning thread panicked"),
        }
    }

    let identical = results.windows(2).all(|pair| pair[0].ptr_eq(&pair[1]));
    let stats = interner.stats();
    writeln!(out, "threads:   {threads}")?;
    writeln!(out, "identical: {identical}")?;
    writeln!(out, "trie:      {stats}")?;

    if !identical {
        bail!("threads observed different tuples for the same sequence");
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
