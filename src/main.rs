// Horn clause query driver.
//
// Usage:
//   hornlite [--max-depth N] [-q QUERY]... <kb-file>...
//
// Loads every knowledge-base file in order, then answers each `-q` query, or
// one query per line from stdin when no `-q` is given.

use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use hornlite::{load_knowledge_base, parse_query, Literal, Prover, ProverConfig, Substitution};

const USAGE: &str = "usage: hornlite [--max-depth N] [-q QUERY]... <kb-file>...";

#[derive(Debug, Default)]
struct Args {
    files: Vec<String>,
    queries: Vec<String>,
    config: ProverConfig,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    while let Some(a) = it.next() {
        match a.as_str() {
            "-q" | "--query" => {
                let q = it.next().context("-q needs a query")?;
                args.queries.push(q);
            }
            "--max-depth" => {
                let n = it.next().context("--max-depth needs a number")?;
                let n = n.parse().with_context(|| format!("bad depth {n:?}"))?;
                args.config.max_depth = Some(n);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            s if s.starts_with('-') && s.len() > 1 => bail!("unknown option {s}\n{USAGE}"),
            file => args.files.push(file.to_string()),
        }
    }
    if args.files.is_empty() {
        bail!("{USAGE}");
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;

    let kb = load_knowledge_base(args.files.as_slice()).context("failed to load knowledge base")?;
    let mut prover = Prover::with_config(&kb, args.config);
    let mut out = io::stdout().lock();
    let mut err = io::stderr();

    if !args.queries.is_empty() {
        for q in &args.queries {
            run_query(&mut prover, q, &mut out, &mut err)?;
        }
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        let q = line.trim();
        if q.is_empty() || q.starts_with('%') {
            continue;
        }
        run_query(&mut prover, q, &mut out, &mut err)?;
    }

    Ok(())
}

/// Answers one query on `out`. A query that does not parse is reported on
/// `err` and skipped.
fn run_query(
    prover: &mut Prover<'_>,
    text: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    let goals = match parse_query(text) {
        Ok(g) => g,
        Err(e) => return writeln!(err, "{text}: {e}"),
    };

    match prover.ask_all(&goals) {
        Some(s) => print_answer(&goals, &s, out),
        None => writeln!(out, "no"),
    }
}

fn print_answer(goals: &[Literal], s: &Substitution, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "yes")?;
    for (v, t) in s.answer(goals) {
        writeln!(out, "  {v} = {t}")?;
    }
    Ok(())
}
