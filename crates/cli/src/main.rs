//! `he-eval`, evaluates an equation netlist over the simulation backend.

mod cli;

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use heckt_eval::{EvalError, Evaluator, SimBackend, SimParams, parse_bits, random_inputs};
use heckt_ir::Equation;
use heckt_ir::eqn::parse_eqn;
use heckt_regalloc::RegisterAllocator;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::SeedableRng;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Cli;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let args = Cli::parse_args();
    init_tracing(&args);

    let start = Instant::now();
    run(&args)?;
    println!("total: {}ms", start.elapsed().as_millis());

    Ok(())
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_tracing(args: &Cli) {
    let default = if args.debug {
        "trace"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prints how long each pipeline phase took, unless quiet.
struct Phases {
    quiet: bool,
}

impl Phases {
    fn time<T>(&self, label: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        if !self.quiet {
            println!("{label}... {}ms", start.elapsed().as_millis());
        }
        out
    }
}

fn run(args: &Cli) -> Result<()> {
    let quiet = args.quiet;
    let phases = Phases { quiet };

    let src = fs::read_to_string(&args.circuit)
        .with_context(|| format!("failed to read {}", args.circuit.display()))?;

    let file = phases
        .time("Parsing circuit", || parse_eqn(&src))
        .context("failed to parse circuit")?;
    let circuit = phases
        .time("Normalizing", || file.into_circuit())
        .context("invalid circuit")?;

    let stats = circuit.stats();
    if !quiet {
        println!(
            "Inputs: {}, outputs: {}, gates: {} (AND {}, XOR {}, OR {}, WIRE {})",
            stats.inputs,
            stats.outputs,
            stats.total_gates(),
            stats.and_gates,
            stats.xor_gates,
            stats.or_gates,
            stats.wire_gates
        );
    }

    let depth = phases.time("Computing depth", || circuit.depth());
    let alloc = phases
        .time("Allocating slots", || RegisterAllocator::from_circuit(&circuit))
        .context("register allocation failed")?;
    if !quiet {
        println!("Depth: {depth}");
        println!("Colors: {}", alloc.slot_count());
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let inputs = match &args.inputs {
        Some(bits) => parse_bits(bits).context("invalid --inputs")?,
        None => random_inputs(&mut rng, circuit.num_inputs()),
    };

    let params = SimParams::for_depth(args.levels.unwrap_or(depth));
    let (backend, secret_key) = phases.time("Generating keys", || {
        SimBackend::keygen(params, &mut rng)
    });
    if !quiet {
        println!(
            "Seed: {seed}, levels: {}, modulus bits: {}",
            params.levels,
            params.modulus_bits()
        );
    }

    let mut evaluator = phases
        .time("Encrypting inputs", || {
            Evaluator::new(circuit.inputs(), backend, &alloc, &inputs)
        })
        .context("failed to encrypt inputs")?;
    if !quiet {
        for (name, value) in circuit.inputs().iter().zip(inputs.iter().by_vals()) {
            println!("input {name} = {}", value as u8);
        }
    }

    let progress = args.progress && !quiet;
    phases
        .time("Evaluating", || {
            evaluate(&mut evaluator, circuit.equations(), progress)
        })
        .context("evaluation failed")?;

    let report = phases
        .time("Validating", || {
            evaluator.validate(circuit.outputs(), &secret_key)
        })
        .context("output validation failed")?;
    if !quiet {
        for out in report.outputs() {
            println!("output {} = {}", out.net, out.decrypted as u8);
        }
    }

    let ev_stats = evaluator.stats();
    let counters = evaluator.backend().counters();
    debug!(
        gates = ev_stats.gates(),
        releases = ev_stats.releases,
        live_slots = ev_stats.live_slots,
        multiplications = counters.multiplications,
        additions = counters.additions,
        relinearizations = counters.relinearizations,
        max_level = counters.max_level,
        "evaluation stats"
    );

    Ok(())
}

fn evaluate(
    evaluator: &mut Evaluator<'_, SimBackend>,
    equations: &[Equation],
    progress: bool,
) -> Result<(), EvalError> {
    if !progress {
        return evaluator.evaluate(equations);
    }

    let pb = ProgressBar::new(equations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos:>7}/{len:7} [{elapsed_precise}] {msg} [{per_sec}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Evaluating gates...");

    for (i, eqn) in equations.iter().enumerate() {
        evaluator.feed_gate(eqn)?;
        if i % 1024 == 0 {
            pb.set_position(i as u64);
        }
    }

    pb.finish_with_message("done");
    Ok(())
}
