use std::{
    fs::File,
    io::BufReader,
    path::Path,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sparsemat::{generator::random_sparse, read_matrix, save_matrix, LoadReport, SparseMatrix};

mod args;

use args::{Args, Command, OperandArgs};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sparsemat={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path, quiet: bool) -> Result<(SparseMatrix, LoadReport)> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let len = file.metadata().map(|m| m.len()).unwrap_or(0);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(len)
    };
    pb.set_style(
        ProgressStyle::with_template("{msg} [{elapsed_precise}] {wide_bar} {bytes}/{total_bytes}")?
            .progress_chars("=> "),
    );
    pb.set_message(format!("Loading {}", path.display()));

    let start = Instant::now();
    let loaded = read_matrix(BufReader::new(pb.wrap_read(file)))
        .with_context(|| format!("failed to load {}", path.display()));
    pb.finish_and_clear();
    let (m, report) = loaded?;

    println!(
        "Loaded {} in {:?} ({}x{}, {} non-zero elements)",
        path.display(),
        start.elapsed(),
        m.n_rows(),
        m.n_cols(),
        m.nnz()
    );
    if report.skipped > 0 {
        println!(
            "Processed {} entries, skipped {} outside the matrix bounds",
            report.processed, report.skipped
        );
    }
    Ok((m, report))
}

fn save(m: &SparseMatrix, path: &Path) -> Result<()> {
    let start = Instant::now();
    save_matrix(m, path).with_context(|| format!("failed to save {}", path.display()))?;
    println!("Result saved to {} in {:?}", path.display(), start.elapsed());
    println!(
        "Final result: {}x{} matrix with {} non-zero elements",
        m.n_rows(),
        m.n_cols(),
        m.nnz()
    );
    Ok(())
}

fn run_operation(command: &Command, op: &OperandArgs, quiet: bool) -> Result<()> {
    let (name, default_output) = command
        .operation()
        .context("not a matrix operation")?;
    let (lhs, _) = load(&op.lhs, quiet)?;
    let (rhs, _) = load(&op.rhs, quiet)?;

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("{} in progress", name));

    let start = Instant::now();
    let result = match command {
        Command::Add(_) => lhs.add(&rhs),
        Command::Subtract(_) => lhs.subtract(&rhs),
        _ => lhs.multiply_parallel(&rhs, op.n_workers),
    };
    spinner.finish_and_clear();
    let result = result.with_context(|| format!("{} failed", name))?;
    println!("{} completed in {:?}", name, start.elapsed());
    info!(nnz = result.nnz(), "operation finished");

    let output = op
        .output
        .clone()
        .unwrap_or_else(|| default_output.into());
    save(&result, &output)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match &args.command {
        Command::Add(op) | Command::Subtract(op) | Command::Multiply(op) => {
            run_operation(&args.command, op, args.quiet)
        }
        Command::Info { path } => {
            let (_, report) = load(path, args.quiet)?;
            println!(
                "{} entries processed, {} skipped",
                report.processed, report.skipped
            );
            Ok(())
        }
        Command::Generate(g) => {
            let m = random_sparse(g.n_rows, g.n_cols, g.nnz, g.min..=g.max, g.rng_seed)
                .context("cannot generate matrix")?;
            save(&m, &g.output)
        }
    }
}
