//! Lexical analysis for dfascript
//!
//! Source text is classified into [`Symbol`]s and fed through the compiled
//! table of the built-in [`Lexicon`] to produce [`Token`]s.

mod lexicon;
mod scanner;
mod symbol;
mod token;

pub use lexicon::{lexicon, Lexicon};
pub use scanner::{CommentFilter, HasNextPolicy, Scanner, TokenSource, Tokens, EOF_SENTINEL};
pub use symbol::{Symbol, SymbolClassifier};
pub use token::{Token, TokenKind};
