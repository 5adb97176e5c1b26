//! Example: Print the DFA table and the tokens of a program
//!
//! Usage: cargo run --example tokenize [--json] <program.dfs>

use anyhow::{Context, Result};
use dfascript::{lexicon, Scanner};
use std::env;
use std::fs;

fn main() -> Result<()> {
    let mut json = false;
    let mut path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => path = Some(arg),
        }
    }

    let code = match path {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("reading '{}'", path))?
        }
        None => "IF(rate >= 0.5) PRINT('rate: ' + rate); // done".to_string(),
    };

    let tokens = Scanner::new(&code)?.scan_tokens();
    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    println!("{}", lexicon()?.table());
    for token in &tokens {
        println!("{}", token);
    }
    Ok(())
}
