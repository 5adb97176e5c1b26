use serde::{Deserialize, Serialize};

use super::lexicon::{lexicon, Lexicon};
use super::symbol::Symbol;
use super::token::{Token, TokenKind};
use crate::error::Result;

/// Character returned by [`Scanner::peek_character`] past the end of input
pub const EOF_SENTINEL: char = '\0';

/// What [`TokenSource::has_next_token`] counts as "another token"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HasNextPolicy {
    /// Everything except `EOF`, so `ERROR` tokens are still handed out
    #[default]
    UntilEof,
    /// Stop at `EOF` and at the first `ERROR`
    UntilEofOrError,
}

impl HasNextPolicy {
    /// Whether a token of `kind` counts as a next token
    pub fn admits(self, kind: TokenKind) -> bool {
        match self {
            HasNextPolicy::UntilEof => kind != TokenKind::Eof,
            HasNextPolicy::UntilEofOrError => !matches!(kind, TokenKind::Eof | TokenKind::Error),
        }
    }
}

/// Anything the interpreter can pull tokens from
pub trait TokenSource {
    /// Consumes and returns the next token; `EOF` forever once input is exhausted
    fn next_token(&mut self) -> Token;

    /// Whether another token is available, without consuming it
    fn has_next_token(&mut self) -> bool;

    /// The rule `has_next_token` follows
    fn policy(&self) -> HasNextPolicy {
        HasNextPolicy::UntilEof
    }
}

/// Table-driven scanner over an in-memory buffer
///
/// Each call to [`Scanner::next_token`] walks the compiled table from its
/// start state, one character at a time, until it reaches a final state. The
/// final state's rollback then gives lookahead characters back to the buffer.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    lexicon: &'a Lexicon,
    buffer: Vec<char>,
    cursor: usize,
    policy: HasNextPolicy,
}

impl Scanner<'static> {
    /// Creates a scanner driven by the built-in lexicon
    pub fn new(source: &str) -> Result<Self> {
        Ok(Scanner::with_lexicon(lexicon()?, source))
    }
}

impl<'a> Scanner<'a> {
    /// Creates a scanner driven by `lexicon`
    pub fn with_lexicon(lexicon: &'a Lexicon, source: &str) -> Self {
        Scanner {
            lexicon,
            buffer: source.chars().collect(),
            cursor: 0,
            policy: HasNextPolicy::default(),
        }
    }

    /// Replaces the `has_next_token` policy
    pub fn with_policy(mut self, policy: HasNextPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Character index of the next character to read
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor, clamped to the end of the buffer
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.buffer.len());
    }

    /// Character under the cursor, or [`EOF_SENTINEL`] past the end
    pub fn peek_character(&self) -> char {
        self.buffer.get(self.cursor).copied().unwrap_or(EOF_SENTINEL)
    }

    /// Symbol of the character under the cursor
    ///
    /// A NUL character inside the input reads as [`Symbol::Error`], so only
    /// the real end of input can take the sentinel's transitions.
    pub fn peek_symbol(&self) -> Symbol {
        match self.buffer.get(self.cursor) {
            Some(&EOF_SENTINEL) => Symbol::Error,
            _ => self.lexicon.classifier().classify(self.peek_character()),
        }
    }

    /// Scans one token
    ///
    /// A symbol the table has no transition for yields an `ERROR` token after
    /// consuming exactly that one character. Past the end of input such a
    /// failure yields `EOF` instead, as there is nothing left to consume.
    pub fn next_token(&mut self) -> Token {
        let table = self.lexicon.table();
        let start = table.start();
        let mut state = start;
        // `None` stands for the sentinel read past the end of the buffer
        let mut lexeme: Vec<Option<char>> = Vec::new();
        let mut offset = self.cursor;

        loop {
            let character = self.buffer.get(self.cursor).copied();
            let next = table
                .column(self.peek_symbol())
                .and_then(|column| table.next(state, column));

            let Some(next) = next else {
                if character.is_none() && lexeme.iter().all(Option::is_none) {
                    self.cursor = self.buffer.len();
                    return self.emit(TokenKind::Eof, &[], self.cursor);
                }
                if lexeme.is_empty() {
                    offset = self.cursor;
                }
                lexeme.push(character);
                self.cursor += 1;
                return self.emit(TokenKind::Error, &lexeme, offset);
            };

            if next != start {
                if lexeme.is_empty() {
                    offset = self.cursor;
                }
                lexeme.push(character);
            }
            self.cursor += 1;
            state = next;

            if table.is_final(state) {
                for _ in 0..table.rollback(state) {
                    if self.cursor == 0 {
                        break;
                    }
                    self.cursor -= 1;
                    lexeme.pop();
                }
                return self.emit(table.token_kind(state), &lexeme, offset);
            }
        }
    }

    fn emit(&mut self, kind: TokenKind, lexeme: &[Option<char>], offset: usize) -> Token {
        self.cursor = self.cursor.min(self.buffer.len());
        let text: String = lexeme.iter().flatten().collect();
        let kind = match kind {
            TokenKind::Ident => TokenKind::keyword(&text).unwrap_or(kind),
            kind => kind,
        };
        tracing::trace!(%kind, lexeme = %text, offset, "scanned token");
        Token::new(kind, text, offset.min(self.buffer.len()))
    }

    /// Probes the next token and restores the cursor
    pub fn has_next_token(&mut self) -> bool {
        let saved = self.cursor;
        let kind = self.next_token().kind;
        self.cursor = saved;
        self.policy.admits(kind)
    }

    /// Iterates over the remaining tokens, ending with the `EOF` token
    pub fn tokens(&mut self) -> Tokens<'_, 'a> {
        Tokens {
            scanner: self,
            done: false,
        }
    }

    /// Collects every remaining token, `EOF` included
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        self.tokens().collect()
    }
}

impl TokenSource for Scanner<'_> {
    fn next_token(&mut self) -> Token {
        Scanner::next_token(self)
    }

    fn has_next_token(&mut self) -> bool {
        Scanner::has_next_token(self)
    }

    fn policy(&self) -> HasNextPolicy {
        self.policy
    }
}

/// Iterator returned by [`Scanner::tokens`]
pub struct Tokens<'s, 'a> {
    scanner: &'s mut Scanner<'a>,
    done: bool,
}

impl Iterator for Tokens<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.scanner.next_token();
        self.done = token.kind == TokenKind::Eof;
        Some(token)
    }
}

/// Token source decorator that drops `COMMENT` tokens
#[derive(Debug, Clone)]
pub struct CommentFilter<T> {
    inner: T,
    peeked: Option<Token>,
}

impl<T: TokenSource> CommentFilter<T> {
    pub fn new(inner: T) -> Self {
        CommentFilter {
            inner,
            peeked: None,
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwraps the decorated source, dropping a buffered token if any
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn pull(&mut self) -> Token {
        loop {
            let token = self.inner.next_token();
            if token.kind != TokenKind::Comment {
                return token;
            }
        }
    }
}

impl<T: TokenSource> TokenSource for CommentFilter<T> {
    fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.pull(),
        }
    }

    fn has_next_token(&mut self) -> bool {
        let kind = match &self.peeked {
            Some(token) => token.kind,
            None => {
                let token = self.pull();
                let kind = token.kind;
                self.peeked = Some(token);
                kind
            }
        };
        self.policy().admits(kind)
    }

    fn policy(&self) -> HasNextPolicy {
        self.inner.policy()
    }
}
