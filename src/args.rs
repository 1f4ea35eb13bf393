use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sparsemat::Value;

#[derive(Parser, Debug)]
#[command(version, about = "Sparse integer matrix arithmetic on coordinate-list files")]
pub struct Args {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Do not draw progress bars
    #[arg(short, long, default_value_t = false, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add two matrices
    Add(OperandArgs),
    /// Subtract the second matrix from the first
    Subtract(OperandArgs),
    /// Multiply two matrices
    Multiply(OperandArgs),
    /// Print the shape and entry counts of a matrix file
    Info {
        /// Matrix file to inspect
        path: PathBuf,
    },
    /// Write a random sparse matrix
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
pub struct OperandArgs {
    /// Left-hand matrix file
    pub lhs: PathBuf,
    /// Right-hand matrix file
    pub rhs: PathBuf,
    /// Where to write the result (defaults to output/<operation>_result.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Number of worker threads used by multiplication
    #[arg(long = "workers", default_value_t = 1)]
    pub n_workers: usize,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Number of rows
    pub n_rows: usize,
    /// Number of columns
    pub n_cols: usize,
    /// Number of non-zero cells
    #[arg(long)]
    pub nnz: usize,
    /// Smallest value drawn
    #[arg(long, default_value_t = -9, allow_hyphen_values = true)]
    pub min: Value,
    /// Largest value drawn
    #[arg(long, default_value_t = 9, allow_hyphen_values = true)]
    pub max: Value,
    /// RNG seed
    #[arg(long, default_value_t = 4102000)]
    pub rng_seed: u64,
    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,
}

impl Command {
    /// Display name and default output file of a binary operation.
    pub fn operation(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Command::Add(_) => Some(("Addition", "output/addition_result.txt")),
            Command::Subtract(_) => Some(("Subtraction", "output/subtraction_result.txt")),
            Command::Multiply(_) => Some(("Multiplication", "output/multiplication_result.txt")),
            Command::Info { .. } | Command::Generate(_) => None,
        }
    }
}
