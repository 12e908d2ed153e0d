use clap::Parser;
use std::path::PathBuf;

/// Encrypted circuit evaluator - runs an equation netlist gate by gate over
/// encrypted bits and checks the result against a plaintext shadow
#[derive(Parser, Debug)]
#[command(name = "he-eval")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Circuit in equation (.eqn) format
    #[arg(value_name = "CIRCUIT")]
    pub(crate) circuit: PathBuf,

    /// Per-gate trace logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub(crate) debug: bool,

    /// Only print the final timing line
    #[arg(short, long)]
    pub(crate) quiet: bool,

    /// Input bits, one per input in INORDER order
    #[arg(
        short = 'i',
        long = "inputs",
        value_name = "BITS",
        help = "Explicit input bits, e.g. 0110 (random if omitted)"
    )]
    pub(crate) inputs: Option<String>,

    /// Seed for random inputs and encryption randomness
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    pub(crate) seed: Option<u64>,

    /// Level budget of the backend
    #[arg(
        short = 'l',
        long = "levels",
        value_name = "N",
        help = "Override the backend level budget (default: circuit depth)"
    )]
    pub(crate) levels: Option<usize>,

    /// Show a progress bar while evaluating
    #[arg(long)]
    pub(crate) progress: bool,
}

impl Cli {
    /// Parse command line arguments
    pub(crate) fn parse_args() -> Self {
        Cli::parse()
    }
}
