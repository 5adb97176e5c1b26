//! # dfascript - a DFA lexer and an evaluating interpreter
//!
//! dfascript scans a tiny scripting language with a hand-authored DFA that is
//! compiled into a dense transition table, then parses and evaluates the token
//! stream in a single recursive-descent pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use dfascript::{Interpreter, Value};
//!
//! # fn main() -> dfascript::Result<()> {
//! let mut interpreter = Interpreter::new();
//! interpreter.compile(r#"
//!     total = 3 + 4 * 2;
//!     IF(total > 10) PRINT('big ');
//!     PRINT('hi' * 3);
//! "#)?;
//!
//! assert_eq!(interpreter.lookup("total"), Some(&Value::Number(11.0)));
//! assert_eq!(interpreter.output(), "big hihihi");
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! - **Values**: numbers (`12`, `12.5e-3`), text (`'hi'`, `"hi"`), and the
//!   booleans produced by comparisons
//! - **Statements**: `x = expr;`, `PRINT(expr);`, `IF(cond) x = expr;`,
//!   `IF(cond) PRINT(expr);`
//! - **Operators**: `+ - * / % **`, unary `-`, `== != < <= > >=`, `SQRT(expr)`
//! - **Comments**: `// ...` and `# ...` to the end of the line
//!
//! Undefined identifiers read as `0.0`. `+` concatenates as soon as one side
//! is not a number, and `text * n` repeats the text.
//!
//! ## Architecture
//!
//! ```text
//! Source → Scanner (CompiledTable<Symbol>) → Tokens → Interpreter → Environment
//! ```
//!
//! - [`Graph`] / [`CompiledTable`] - DFA authoring and table compilation
//! - [`Scanner`] - table-driven tokenizer over the built-in [`Lexicon`]
//! - [`Interpreter`] - grammar, evaluation and session state
//! - [`Environment`] - persistent, shadowing variable bindings
//! - [`EventSink`] - observer for prints, assignments and guards
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). By default an
//! interpreter collects errors and keeps going; see [`ErrorPolicy`].
//!
//! ```rust
//! use dfascript::{Error, Interpreter};
//!
//! let mut interpreter = Interpreter::new();
//! assert_eq!(interpreter.compile("x = ;"), Err(Error::Collected { count: 1 }));
//! assert_eq!(
//!     interpreter.errors()[0].to_string(),
//!     "atom: expected expression, found `;`"
//! );
//! ```

pub mod automaton;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod runtime;

pub use automaton::{CompiledTable, Graph, StateId, NO_TRANSITION};
pub use error::{Error, ErrorSeverity, Result};
pub use interpreter::{ErrorPolicy, Interpreter, InterpreterConfig, ACCUMULATOR};
pub use lexer::{
    lexicon, CommentFilter, HasNextPolicy, Lexicon, Scanner, Symbol, SymbolClassifier, Token,
    TokenKind, TokenSource,
};
pub use runtime::{Environment, EventSink, NoopSink, RecordingSink, TracingSink, Value, WriterSink};

/// Scans `source` with the built-in lexicon, `EOF` token included
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Ok(Scanner::new(source)?.scan_tokens())
}
