//! Example: Execute dfascript programs from files
//!
//! Usage: cargo run --example run_file <program.dfs>

use anyhow::{bail, Context, Result};
use dfascript::{Error, Interpreter, InterpreterConfig, WriterSink};
use std::env;
use std::fs;
use std::io;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --example run_file <program.dfs>");
        eprintln!("\nExample program in demos/:");
        eprintln!("  - sample.dfs");
        bail!("missing program path");
    }

    let file_path = &args[1];
    let code = fs::read_to_string(file_path)
        .with_context(|| format!("reading '{}'", file_path))?;

    println!("Executing: {}", file_path);
    println!("{}", "=".repeat(60));

    let mut interpreter =
        Interpreter::with_sink(InterpreterConfig::default(), WriterSink::new(io::stdout()));
    let outcome = interpreter.compile(&code);

    println!("{}", "=".repeat(60));
    println!("Output: {}", interpreter.output());

    match outcome {
        Ok(()) => Ok(()),
        Err(Error::Collected { count }) => {
            for err in interpreter.errors() {
                eprintln!("  {:?}: {}", err.classify(), err);
            }
            bail!("{} error(s) in '{}'", count, file_path)
        }
        Err(err) => Err(err.into()),
    }
}
