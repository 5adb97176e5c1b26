//! Error types for the dfascript lexer and interpreter

use thiserror::Error;

use crate::lexer::Symbol;

/// dfascript errors
///
/// Grammar and evaluation failures carry the label of the rule that raised
/// them and render as `"<rule>: <description>"`. Positions are not tracked;
/// callers that need line/column information derive it from character offsets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A grammar rule expected a token it did not find
    ///
    /// **Triggered by:** missing separators, parentheses or operands
    /// **Example:** `x = ;` (no expression after `=`)
    #[error("{rule}: {message}")]
    Syntax {
        /// Label of the rule reporting the failure
        rule: &'static str,
        /// Human description
        message: String,
    },

    /// An operation was applied to values it does not support
    ///
    /// **Triggered by:** mixed-type arithmetic, negating a string
    /// **Example:** `x = 'a' - 1;`
    #[error("{rule}: {message}")]
    Semantic {
        /// Label of the rule reporting the failure
        rule: &'static str,
        /// Human description
        message: String,
    },

    /// The scanner produced an `ERROR` token where an operand was expected
    #[error("{rule}: unrecognized input `{lexeme}`")]
    Lexical {
        /// Label of the rule that met the token
        rule: &'static str,
        /// Characters consumed for the failed token
        lexeme: String,
    },

    /// Two symbols claim the same character
    #[error("symbols {first:?} and {second:?} both claim character {character:?}")]
    OverlappingSymbols {
        /// Offending character
        character: char,
        /// Symbol that claimed the character first
        first: Symbol,
        /// Symbol that claimed it again
        second: Symbol,
    },

    /// The lexer table could not be built
    #[error("lexicon construction failed: {0}")]
    Lexicon(String),

    /// A compile unit finished with collected errors
    #[error("generated {count} errors")]
    Collected {
        /// Number of errors added by the compile unit
        count: usize,
    },
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Fatal error that cannot be recovered from
    Fatal,
    /// Recoverable error; processing may continue past it
    Recoverable,
    /// Warning that doesn't prevent execution
    Warning,
}

impl Error {
    /// Create a syntax error for a grammar rule
    pub fn syntax(rule: &'static str, message: impl Into<String>) -> Self {
        Error::Syntax {
            rule,
            message: message.into(),
        }
    }

    /// Create a semantic error for a grammar rule
    pub fn semantic(rule: &'static str, message: impl Into<String>) -> Self {
        Error::Semantic {
            rule,
            message: message.into(),
        }
    }

    /// Label of the grammar rule that raised this error, if any
    pub fn rule(&self) -> Option<&'static str> {
        match self {
            Error::Syntax { rule, .. } | Error::Semantic { rule, .. } | Error::Lexical { rule, .. } => {
                Some(*rule)
            }
            _ => None,
        }
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::OverlappingSymbols { .. } => ErrorSeverity::Fatal,
            Error::Lexicon(_) => ErrorSeverity::Fatal,

            Error::Syntax { .. } => ErrorSeverity::Recoverable,
            Error::Lexical { .. } => ErrorSeverity::Recoverable,
            Error::Collected { .. } => ErrorSeverity::Recoverable,

            Error::Semantic { .. } => ErrorSeverity::Warning,
        }
    }
}

/// Result type for dfascript operations
pub type Result<T> = std::result::Result<T, Error>;
