use std::fmt;

use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Exact consumed text, after rollback
    pub lexeme: String,
    /// Character offset where the lexeme starts
    pub offset: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            offset,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.kind, self.lexeme)
    }
}

/// All possible token types in dfascript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Literals
    /// Number literal with optional fraction and exponent
    Number,
    /// Identifier
    Ident,
    /// Single or double quoted string literal (quotes included in the lexeme)
    String,
    /// End of input
    Eof,

    // Arithmetic
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Star operator (*)
    Mult,
    /// Slash operator (/)
    Divide,
    /// Percent operator (%)
    Modulo,
    /// Power operator (**)
    Exp,

    // Delimiters
    /// Left parenthesis (
    LParen,
    /// Right parenthesis )
    RParen,
    /// Comma delimiter
    Comma,
    /// Period
    Period,
    /// Statement separator (;)
    Semicolon,

    // Relational
    /// Equality operator (==)
    Equals,
    /// Inequality operator (!=)
    NotEquals,
    /// Greater than operator (>)
    GreaterThan,
    /// Greater than or equal operator (>=)
    GreaterThanOrEquals,
    /// Less than operator (<)
    LessThan,
    /// Less than or equal operator (<=)
    LessThanOrEquals,

    // Keywords
    /// IF keyword
    If,
    /// PRINT keyword
    Print,
    /// SQRT keyword
    Sqrt,

    // Special
    /// Unrecognized input
    Error,
    /// `//` or `#` line comment
    Comment,

    /// Assignment operator (=)
    Assignment,
}

impl TokenKind {
    /// Every token kind, in declaration order
    pub const ALL: [TokenKind; 27] = [
        TokenKind::Number,
        TokenKind::Ident,
        TokenKind::String,
        TokenKind::Eof,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Mult,
        TokenKind::Divide,
        TokenKind::Modulo,
        TokenKind::Exp,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::Comma,
        TokenKind::Period,
        TokenKind::Semicolon,
        TokenKind::Equals,
        TokenKind::NotEquals,
        TokenKind::GreaterThan,
        TokenKind::GreaterThanOrEquals,
        TokenKind::LessThan,
        TokenKind::LessThanOrEquals,
        TokenKind::If,
        TokenKind::Print,
        TokenKind::Sqrt,
        TokenKind::Error,
        TokenKind::Comment,
        TokenKind::Assignment,
    ];

    /// Keyword spelled exactly by `s`, if any
    ///
    /// Keywords are recognized by the scanner after the table has accepted an
    /// identifier, so they are case sensitive: `PRINT` is a keyword, `print`
    /// an identifier.
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "IF" => Some(TokenKind::If),
            "PRINT" => Some(TokenKind::Print),
            "SQRT" => Some(TokenKind::Sqrt),
            _ => None,
        }
    }

    /// Check if token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::If | TokenKind::Print | TokenKind::Sqrt)
    }

    /// Check if token is a relational operator
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::NotEquals
                | TokenKind::GreaterThan
                | TokenKind::GreaterThanOrEquals
                | TokenKind::LessThan
                | TokenKind::LessThanOrEquals
        )
    }

    /// Upper-case name used in listings and error messages
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Ident => "IDENT",
            TokenKind::String => "STRING",
            TokenKind::Eof => "EOF",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mult => "MULT",
            TokenKind::Divide => "DIVIDE",
            TokenKind::Modulo => "MODULO",
            TokenKind::Exp => "EXP",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Period => "PERIOD",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Equals => "EQUALS",
            TokenKind::NotEquals => "NOT_EQUALS",
            TokenKind::GreaterThan => "GREATER_THAN",
            TokenKind::GreaterThanOrEquals => "GREATER_THAN_OR_EQUALS",
            TokenKind::LessThan => "LESS_THAN",
            TokenKind::LessThanOrEquals => "LESS_THAN_OR_EQUALS",
            TokenKind::If => "IF",
            TokenKind::Print => "PRINT",
            TokenKind::Sqrt => "SQRT",
            TokenKind::Error => "ERROR",
            TokenKind::Comment => "COMMENT",
            TokenKind::Assignment => "ASSIGNMENT",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
