//! Minimize one of the built-in objectives and print the verified result.
//!
//! Run with: cargo run --release --example minimize -- <function> <precision>
//!
//! e.g. `cargo run --release --example minimize -- booth 0.001`
//!
//! Set `RUST_LOG=interval_bnb=debug` to see per-worker progress.

use std::process::ExitCode;
use std::time::Instant;

use interval_bnb::{FunctionRegistry, MinimizeError, SearchOptions};
use tracing_subscriber::EnvFilter;

fn usage(registry: &FunctionRegistry) -> String {
    let names: Vec<&str> = registry.names().collect();
    format!(
        "usage: minimize <function> <precision>\nPossible choices: {}",
        names.join(" ")
    )
}

fn run(args: &[String], registry: &FunctionRegistry) -> Result<(), MinimizeError> {
    let [name, precision] = args else {
        return Err(MinimizeError::InvalidArgs(usage(registry)));
    };
    let func = registry.get(name)?;
    let precision: f64 = precision
        .parse()
        .map_err(|_| MinimizeError::InvalidArgs(format!("cannot parse precision '{precision}'")))?;

    let options = SearchOptions::with_precision(precision);
    let start = Instant::now();
    let result = func.minimize(&options)?;
    let elapsed = start.elapsed();

    println!("{result}");
    if let Some(hull) = result.bounding_box() {
        println!("Minimizers lie within: {hull:.16}");
    }
    if let Some(known) = func.known_minimum() {
        println!("Known minimum: {known}");
    }
    println!(
        "Evaluations: {}  pruned: {}  purged: {}  time: {:.3}s",
        result.stats.nfev,
        result.stats.pruned,
        result.stats.purged,
        elapsed.as_secs_f64()
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let registry = FunctionRegistry::builtin();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args, &registry) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
