//! Reads a count `n` followed by `n` integers from stdin and prints each one
//! as a roman numeral, one per line.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use bank_sim::roman::to_roman;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        error!("failed to read input: {e}");
        return ExitCode::FAILURE;
    }

    let mut tokens = input.split_whitespace();
    let count: usize = match tokens.next().map(str::parse::<usize>) {
        Some(Ok(count)) => count,
        Some(Err(e)) => {
            error!("invalid count: {e}");
            return ExitCode::FAILURE;
        }
        None => return ExitCode::SUCCESS,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for token in tokens.take(count) {
        let numeral = match token.parse::<i64>() {
            Ok(n) => to_roman(n),
            Err(e) => {
                warn!(token, "not a number: {e}");
                continue;
            }
        };
        match numeral {
            Ok(numeral) => {
                if let Err(e) = writeln!(out, "{numeral}") {
                    error!("failed to write output: {e}");
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => warn!("{e}"),
        }
    }

    ExitCode::SUCCESS
}
