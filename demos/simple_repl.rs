//! Simple REPL (Read-Eval-Print Loop) for dfascript
//!
//! Usage: cargo run --example simple_repl

use anyhow::Result;
use dfascript::{Interpreter, InterpreterConfig, WriterSink};
use std::io::{self, Write};

fn main() -> Result<()> {
    println!("dfascript interactive REPL");
    println!();
    println!("Type statements and press Enter. Bindings persist between lines.");
    println!("Type 'exit' or press Ctrl+C to quit.");
    println!("Type 'help' for examples.");
    println!();

    let mut interpreter = new_interpreter();
    let mut line_num = 1;

    loop {
        print!("dfs[{}]> ", line_num);
        io::stdout().flush()?;

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("Error reading input: {}", err);
                continue;
            }
        }

        match input.trim() {
            "" => continue,
            "exit" | "quit" => {
                println!("Goodbye!");
                break;
            }
            "help" => {
                print_help();
                continue;
            }
            "clear" => {
                interpreter.reset();
                println!("Environment cleared!");
                continue;
            }
            "env" => {
                for (name, value) in interpreter.environment().iter() {
                    println!("  {} = {}", name, value);
                }
                continue;
            }
            line => {
                let before = interpreter.errors().len();
                if interpreter.compile(line).is_err() {
                    for err in &interpreter.errors()[before..] {
                        eprintln!("  Error: {}", err);
                    }
                }
            }
        }

        line_num += 1;
    }
    Ok(())
}

fn new_interpreter() -> Interpreter<WriterSink<io::Stdout>> {
    Interpreter::with_sink(InterpreterConfig::default(), WriterSink::new(io::stdout()))
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  help   - Show this help");
    println!("  env    - List bindings, newest first");
    println!("  clear  - Clear environment");
    println!("  exit   - Exit REPL");
    println!();
    println!("Examples:");
    println!("  x = 3 + 4 * 2;");
    println!("  PRINT('x is ' + x);");
    println!("  IF(x > 10) PRINT('big');");
    println!("  PRINT('ab' * 3);");
    println!("  r = SQRT(x ** 2);");
    println!();
}
