//! Alphabet of the built-in lexicon
//!
//! Every raw character belongs to at most one [`Symbol`]; characters no symbol
//! claims classify to [`Symbol::Error`].

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::token::TokenKind;
use crate::error::{Error, Result};

/// Abstract alphabet element standing for a set of characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    // Clustered
    Digit,
    /// ASCII letters other than `e`/`E`
    LetterNotE,
    LetterE,
    Underscore,
    SingleQuote,
    DoubleQuote,
    Whitespace,
    Endline,

    // Relational
    Equals,
    ExclamationPoint,
    GreaterThan,
    LessThan,

    // Literals
    /// The `'\0'` sentinel returned past the end of input
    Eof,
    Plus,
    Mult,
    Minus,
    Divide,
    Modulo,
    LParen,
    RParen,
    Comma,
    Period,
    Hashtag,
    Semicolon,

    /// Any character no other symbol claims
    Error,
}

impl Symbol {
    /// Every symbol, in declaration order
    pub const ALL: [Symbol; 25] = [
        Symbol::Digit,
        Symbol::LetterNotE,
        Symbol::LetterE,
        Symbol::Underscore,
        Symbol::SingleQuote,
        Symbol::DoubleQuote,
        Symbol::Whitespace,
        Symbol::Endline,
        Symbol::Equals,
        Symbol::ExclamationPoint,
        Symbol::GreaterThan,
        Symbol::LessThan,
        Symbol::Eof,
        Symbol::Plus,
        Symbol::Mult,
        Symbol::Minus,
        Symbol::Divide,
        Symbol::Modulo,
        Symbol::LParen,
        Symbol::RParen,
        Symbol::Comma,
        Symbol::Period,
        Symbol::Hashtag,
        Symbol::Semicolon,
        Symbol::Error,
    ];

    /// Characters this symbol stands for in the standard alphabet
    ///
    /// `Error` claims nothing; it is what unclaimed characters fall back to.
    pub fn characters(self) -> &'static str {
        match self {
            Symbol::Digit => "0123456789",
            Symbol::LetterNotE => "ABCDFGHIJKLMNOPQRSTUVWXYZabcdfghijklmnopqrstuvwxyz",
            Symbol::LetterE => "eE",
            Symbol::Underscore => "_",
            Symbol::SingleQuote => "'",
            Symbol::DoubleQuote => "\"",
            Symbol::Whitespace => " \t\r",
            Symbol::Endline => "\n",
            Symbol::Equals => "=",
            Symbol::ExclamationPoint => "!",
            Symbol::GreaterThan => ">",
            Symbol::LessThan => "<",
            Symbol::Eof => "\0",
            Symbol::Plus => "+",
            Symbol::Mult => "*",
            Symbol::Minus => "-",
            Symbol::Divide => "/",
            Symbol::Modulo => "%",
            Symbol::LParen => "(",
            Symbol::RParen => ")",
            Symbol::Comma => ",",
            Symbol::Period => ".",
            Symbol::Hashtag => "#",
            Symbol::Semicolon => ";",
            Symbol::Error => "",
        }
    }

    /// Token kind a lone occurrence of this symbol stands for, if any
    pub fn token_kind(self) -> Option<TokenKind> {
        match self {
            Symbol::Eof => Some(TokenKind::Eof),
            Symbol::Plus => Some(TokenKind::Plus),
            Symbol::Mult => Some(TokenKind::Mult),
            Symbol::Minus => Some(TokenKind::Minus),
            Symbol::Divide => Some(TokenKind::Divide),
            Symbol::Modulo => Some(TokenKind::Modulo),
            Symbol::LParen => Some(TokenKind::LParen),
            Symbol::RParen => Some(TokenKind::RParen),
            Symbol::Comma => Some(TokenKind::Comma),
            Symbol::Period => Some(TokenKind::Period),
            Symbol::Semicolon => Some(TokenKind::Semicolon),
            Symbol::Equals => Some(TokenKind::Assignment),
            Symbol::GreaterThan => Some(TokenKind::GreaterThan),
            Symbol::LessThan => Some(TokenKind::LessThan),
            _ => None,
        }
    }
}

lazy_static! {
    static ref STANDARD: Result<SymbolClassifier> = SymbolClassifier::new(
        Symbol::ALL
            .iter()
            .map(|&symbol| (symbol, symbol.characters()))
    );
}

/// Maps raw characters to symbols through a precomputed table
#[derive(Debug, Clone)]
pub struct SymbolClassifier {
    /// Direct lookup for ASCII
    ascii: [Symbol; 128],
    /// Everything outside ASCII that some symbol claims
    wide: HashMap<char, Symbol>,
}

impl SymbolClassifier {
    /// Builds a classifier from each symbol's character set
    ///
    /// Fails with [`Error::OverlappingSymbols`] when two symbols claim the same
    /// character. A symbol listed twice with the same character is not a
    /// conflict.
    pub fn new<'a, I>(sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, &'a str)>,
    {
        let mut owners: HashMap<char, Symbol> = HashMap::new();
        for (symbol, characters) in sets {
            for character in characters.chars() {
                match owners.insert(character, symbol) {
                    Some(first) if first != symbol => {
                        return Err(Error::OverlappingSymbols {
                            character,
                            first,
                            second: symbol,
                        });
                    }
                    _ => {}
                }
            }
        }

        let mut ascii = [Symbol::Error; 128];
        let mut wide = HashMap::new();
        for (character, symbol) in owners {
            if character.is_ascii() {
                ascii[character as usize] = symbol;
            } else {
                wide.insert(character, symbol);
            }
        }
        Ok(SymbolClassifier { ascii, wide })
    }

    /// The classifier for the standard alphabet, built once
    pub fn standard() -> Result<&'static SymbolClassifier> {
        STANDARD.as_ref().map_err(Clone::clone)
    }

    /// Symbol for `c`, [`Symbol::Error`] when unclaimed
    #[inline]
    pub fn classify(&self, c: char) -> Symbol {
        if c.is_ascii() {
            self.ascii[c as usize]
        } else {
            self.wide.get(&c).copied().unwrap_or(Symbol::Error)
        }
    }
}
