use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use macroforth::{Env, EvalConfig, ZeroCheck};
use tracing_subscriber::{EnvFilter, fmt};

/// Evaluate a macroforth program and print the final stack
#[derive(Parser, Debug)]
#[command(name = "macroforth")]
struct Args {
    /// Check for a zero divisor before every arithmetic operator, not only `/`
    #[arg(long)]
    strict_zero_check: bool,

    /// Abort after dispatching this many words
    #[arg(long)]
    max_steps: Option<usize>,

    /// Print the recorded macros after the stack
    #[arg(long)]
    macros: bool,

    /// Program to run, one command line per line (reads stdin if omitted)
    path: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // RUST_LOG controls verbosity, warn when unset.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let lines = match read_lines(args.path.as_ref()) {
        Ok(lines) => lines,
        Err(err) => {
            eprintln!("failed to read input: {}", err);
            process::exit(1);
        },
    };

    let config = EvalConfig {
        zero_check: if args.strict_zero_check {
            ZeroCheck::AnyOperator
        } else {
            ZeroCheck::DivisionOnly
        },
        max_steps: args.max_steps,
    };

    let mut env = Env::with_config(config);

    if let Err(err) = env.run(&lines) {
        eprintln!("{}", err);
        process::exit(1);
    }

    println!("{}", env.stack());

    if args.macros {
        print!("{}", env.macros());
    }
}

fn read_lines(path: Option<&PathBuf>) -> io::Result<Vec<String>> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            Ok(source.lines().map(str::to_owned).collect())
        },

        None => io::stdin().lock().lines().collect(),
    }
}
