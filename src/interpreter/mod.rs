//! Interpreter sessions
//!
//! An [`Interpreter`] owns an environment that survives from one
//! [`Interpreter::compile`] call to the next, the errors collected so far and
//! the [`EventSink`] that observes prints, assignments and guards.

mod config;
mod grammar;

pub use config::{ErrorPolicy, InterpreterConfig};
pub use grammar::{ACCUMULATOR, MAX_REPEAT_LEN};

use grammar::Parser;

use crate::error::{Error, Result};
use crate::lexer::{lexicon, CommentFilter, Scanner, TokenSource};
use crate::runtime::{Environment, EventSink, NoopSink, Value};

/// Parses and evaluates dfascript programs
///
/// ```
/// use dfascript::{Interpreter, Value};
///
/// let mut interpreter = Interpreter::new();
/// interpreter.compile("x = 3 + 4 * 2; PRINT('x is ' + x);").unwrap();
///
/// assert_eq!(interpreter.environment().lookup("x"), Some(&Value::Number(11.0)));
/// assert_eq!(interpreter.output(), "x is 11.0");
/// ```
#[derive(Debug)]
pub struct Interpreter<K: EventSink = NoopSink> {
    config: InterpreterConfig,
    environment: Environment,
    errors: Vec<Error>,
    sink: K,
}

impl Interpreter<NoopSink> {
    /// Creates an interpreter with the default configuration
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self::with_sink(config, NoopSink)
    }
}

impl Default for Interpreter<NoopSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventSink> Interpreter<K> {
    /// Creates an interpreter reporting to `sink`
    pub fn with_sink(config: InterpreterConfig, sink: K) -> Self {
        Interpreter {
            config,
            environment: Environment::empty(),
            errors: Vec::new(),
            sink,
        }
    }

    /// Scans and runs `program` with the built-in lexicon
    ///
    /// Returns [`Error::Collected`] when the run added errors under the
    /// collecting policy, or the first error under fail-fast.
    pub fn compile(&mut self, program: &str) -> Result<()> {
        let mut scanner =
            Scanner::with_lexicon(lexicon()?, program).with_policy(self.config.has_next);
        if self.config.skip_comments {
            self.compile_from(&mut CommentFilter::new(scanner))
        } else {
            self.compile_from(&mut scanner)
        }
    }

    /// Runs a program pulled from any token source
    ///
    /// Comments are not filtered here; wrap the source in a
    /// [`CommentFilter`] when it can produce them.
    pub fn compile_from<T: TokenSource>(&mut self, source: &mut T) -> Result<()> {
        if !self.config.keep_bindings {
            self.environment = Environment::empty();
        }
        let snapshot = self.environment.clone();
        let before = self.errors.len();

        let mut parser = Parser::new(
            source,
            self.environment.clone(),
            &mut self.sink,
            &mut self.errors,
            self.config.error_policy,
        );
        let outcome = parser.run();
        let environment = parser.into_environment();

        match outcome {
            Ok(()) => {
                self.environment = environment;
                match self.errors.len() - before {
                    0 => Ok(()),
                    count => Err(Error::Collected { count }),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "aborted program");
                self.environment = snapshot;
                Err(err)
            }
        }
    }

    /// Every error reported since the session started or was last reset
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Replaces the environment, e.g. with an earlier snapshot
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    /// Binds `identifier` before the next program runs
    pub fn define(&mut self, identifier: impl Into<String>, value: Value) {
        self.environment = self.environment.define(identifier, value);
    }

    /// Current value of `identifier`
    pub fn lookup(&self, identifier: &str) -> Option<&Value> {
        self.environment.lookup(identifier)
    }

    /// Everything printed into the current environment
    pub fn output(&self) -> &str {
        self.environment
            .lookup(ACCUMULATOR)
            .and_then(Value::as_text)
            .unwrap_or("")
    }

    /// Forgets all bindings and errors
    pub fn reset(&mut self) {
        self.environment = Environment::empty();
        self.errors.clear();
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;
    use crate::runtime::RecordingSink;

    #[test]
    fn test_bindings_survive_between_programs() {
        let mut interpreter = Interpreter::new();
        interpreter.compile("x = 2;").unwrap();
        interpreter.compile("y = x * 10;").unwrap();
        assert_eq!(interpreter.lookup("y"), Some(&Value::Number(20.0)));
    }

    #[test]
    fn test_fresh_bindings_per_program() {
        let config = InterpreterConfig {
            keep_bindings: false,
            ..InterpreterConfig::default()
        };
        let mut interpreter = Interpreter::with_config(config);
        interpreter.compile("x = 2;").unwrap();
        interpreter.compile("y = x;").unwrap();
        assert_eq!(interpreter.lookup("y"), Some(&Value::Number(0.0)));
        assert!(interpreter.lookup("x").is_none());
    }

    #[test]
    fn test_collected_count_is_per_program() {
        let mut interpreter = Interpreter::new();
        assert_eq!(interpreter.compile("x = ; y = ;"), Err(Error::Collected { count: 2 }));
        assert_eq!(interpreter.compile("z = ;"), Err(Error::Collected { count: 1 }));
        assert_eq!(interpreter.errors().len(), 3);

        interpreter.reset();
        assert!(interpreter.errors().is_empty());
        assert!(interpreter.environment().is_empty());
    }

    #[test]
    fn test_fail_fast_restores_environment() {
        let mut interpreter = Interpreter::with_config(InterpreterConfig::fail_fast());
        interpreter.compile("a = 1;").unwrap();

        let err = interpreter.compile("a = 2; b = 'x' - 1; c = 3;").unwrap_err();
        assert_eq!(err.rule(), Some("additive"));
        assert_eq!(interpreter.lookup("a"), Some(&Value::Number(1.0)));
        assert!(interpreter.lookup("c").is_none());
        assert_eq!(interpreter.errors(), &[err]);
    }

    #[test]
    fn test_comments_are_skipped_by_default() {
        let mut interpreter = Interpreter::new();
        interpreter.compile("x = 1; // note\n# more\ny = 2;").unwrap();
        assert_eq!(interpreter.lookup("y"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_comments_reach_grammar_when_not_skipped() {
        let config = InterpreterConfig {
            skip_comments: false,
            ..InterpreterConfig::default()
        };
        let mut interpreter = Interpreter::with_config(config);
        let result = interpreter.compile("# note\nx = 1;");
        assert_eq!(result, Err(Error::Collected { count: 1 }));
        assert_eq!(interpreter.errors()[0].rule(), Some("statement"));
    }

    #[test]
    fn test_custom_token_source() {
        let mut interpreter = Interpreter::with_sink(InterpreterConfig::default(), RecordingSink::default());
        let mut scanner = Scanner::new("PRINT(4 ** 0.5);").unwrap();
        assert_eq!(scanner.peek_symbol(), crate::lexer::Symbol::LetterNotE);

        interpreter.compile_from(&mut scanner).unwrap();
        assert_eq!(interpreter.sink().prints, vec![Value::Number(2.0)]);
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_define_seeds_environment() {
        let mut interpreter = Interpreter::new();
        interpreter.define("rate", Value::Number(0.5));
        interpreter.compile("cost = rate * 10;").unwrap();
        assert_eq!(interpreter.lookup("cost"), Some(&Value::Number(5.0)));
    }
}
