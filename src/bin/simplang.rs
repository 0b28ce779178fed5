//! simplang interpreter command-line.
//!
//! Runs the program in FILE, passing the integer ARGS to its `main` function, and prints the
//! result.  Diagnostics go to stderr and the exit status is non-zero.

use std::fs;
use std::process;

use anyhow::{self, Context};
use clap::Parser;

use simplang::interpreter::interpret;

/// Evaluate a simplang program.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file of the program.
    file: String,

    /// Arguments bound to the parameters of `main`.
    #[arg(allow_negative_numbers = true)]
    args: Vec<i64>,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let source =
        fs::read_to_string(&args.file).with_context(|| format!("failed to open {}", args.file))?;

    // `Display` of the error already includes its source, so no cause chain here.
    match interpret(&source, &args.args) {
        Ok(result) => println!("{}", result),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }

    Ok(())
}
