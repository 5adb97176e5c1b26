//! Recursive-descent grammar that evaluates while it parses
//!
//! |Name|Operators|Associates
//! --|--|--
//! Comparison|== != < <= > >=|None
//! Additive|+ -|Left
//! Modulo|%|Left
//! Multiplicative|* /|Left
//! Unary|-|Right
//! Exponent|**|Right
//!
//! ``` BNF
//! statements     → EOF | statement ";" statements ;
//! statement      → print | conditional | assignment ;
//! print          → "PRINT" "(" expression ")" ;
//! conditional    → "IF" "(" expression ")" ( print | assignment ) ;
//! assignment     → IDENT "=" expression ;
//! expression     → additive ( relational additive )? ;
//! additive       → modulo ( ( "+" | "-" ) modulo )* ;
//! modulo         → multiplicative ( "%" multiplicative )* ;
//! multiplicative → unary ( ( "*" | "/" ) unary )* ;
//! unary          → "-" unary | exponent ;
//! exponent       → primary ( "**" unary )? ;
//! primary        → "(" expression ")" | atom ;
//! atom           → IDENT | NUMBER | STRING | "SQRT" "(" expression ")" ;
//! ```
//!
//! Each rule returns the value it computed. Syntax errors unwind to
//! `statements`, which reports them and skips past the next `;`. Type errors
//! are reported where they happen and evaluation carries on with `0.0`.

use std::cmp::Ordering;

use super::config::ErrorPolicy;
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind, TokenSource};
use crate::runtime::{Environment, EventSink, Value};

/// Variable holding everything printed so far
///
/// Every `PRINT` binds a fresh copy of the whole buffer on top of the
/// environment, and older copies stay reachable from it. A program printing
/// `n` characters over `k` statements keeps up to `n * k` characters alive
/// until the environment is dropped or reset.
pub const ACCUMULATOR: &str = "PRINT";

/// Upper bound on the length of text built by repetition
pub const MAX_REPEAT_LEN: usize = 1 << 24;

/// One pass of the grammar over a token source
pub(crate) struct Parser<'r, T, K> {
    source: &'r mut T,
    /// One token of lookahead, filled on demand
    current: Option<Token>,
    env: Environment,
    sink: &'r mut K,
    errors: &'r mut Vec<Error>,
    policy: ErrorPolicy,
    /// Set once a fail-fast report has unwound the parse
    aborted: bool,
    /// False inside the body of a conditional whose guard failed
    live: bool,
}

impl<'r, T: TokenSource, K: EventSink> Parser<'r, T, K> {
    pub(crate) fn new(
        source: &'r mut T,
        env: Environment,
        sink: &'r mut K,
        errors: &'r mut Vec<Error>,
        policy: ErrorPolicy,
    ) -> Self {
        Parser {
            source,
            current: None,
            env,
            sink,
            errors,
            policy,
            aborted: false,
            live: true,
        }
    }

    /// Runs the whole program
    pub(crate) fn run(&mut self) -> Result<()> {
        self.statements()
    }

    pub(crate) fn into_environment(self) -> Environment {
        self.env
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statements(&mut self) -> Result<()> {
        while self.has_next() {
            let outcome = self.statement().and_then(|()| self.separator());
            if let Err(err) = outcome {
                if self.aborted {
                    return Err(err);
                }
                self.report(err)?;
                self.synchronize();
            }
        }

        let last = self.advance();
        if last.kind == TokenKind::Error {
            self.report(Error::Lexical {
                rule: "statements",
                lexeme: last.lexeme,
            })?;
        }
        Ok(())
    }

    fn separator(&mut self) -> Result<()> {
        self.expect(TokenKind::Semicolon, "statements", "`;`")?;
        Ok(())
    }

    fn statement(&mut self) -> Result<()> {
        match self.peek_kind() {
            TokenKind::Print => self.print(),
            TokenKind::If => self.conditional(),
            TokenKind::Ident => self.assignment(),
            TokenKind::Error => {
                let token = self.advance();
                Err(Error::Lexical {
                    rule: "statement",
                    lexeme: token.lexeme,
                })
            }
            _ => Err(self.unexpected("statement", "statement")),
        }
    }

    fn print(&mut self) -> Result<()> {
        self.expect(TokenKind::Print, "print", "`PRINT`")?;
        self.expect(TokenKind::LParen, "print", "`(`")?;
        let message = self.expression()?;
        self.expect(TokenKind::RParen, "print", "`)`")?;

        if self.live {
            let mut buffer = match self.env.lookup(ACCUMULATOR) {
                Some(Value::Text(text)) => text.clone(),
                _ => String::new(),
            };
            buffer.push_str(&message.to_string());
            self.env = self.env.define(ACCUMULATOR, Value::Text(buffer));
            self.sink.on_print(&message);
        }
        Ok(())
    }

    fn conditional(&mut self) -> Result<()> {
        self.expect(TokenKind::If, "condition", "`IF`")?;
        self.expect(TokenKind::LParen, "condition", "`(`")?;
        let guard = self.expression()?;
        self.expect(TokenKind::RParen, "condition", "`)`")?;

        let met = match guard {
            Value::Boolean(met) => met,
            other => {
                self.report(Error::semantic(
                    "condition",
                    format!("guard must be a comparison, found {}", other.type_name()),
                ))?;
                false
            }
        };
        if self.live {
            self.sink.on_condition(met);
        }

        // The body always runs so the cursor moves past it; a failed guard
        // throws away whatever it bound.
        let snapshot = self.env.clone();
        let outer = self.live;
        self.live = outer && met;
        let body = match self.peek_kind() {
            TokenKind::Print => self.print(),
            TokenKind::Ident => self.assignment(),
            _ => Err(self.unexpected("condition", "`PRINT` or assignment")),
        };
        self.live = outer;
        if !met {
            self.env = snapshot;
        }
        body
    }

    fn assignment(&mut self) -> Result<()> {
        let target = self.expect(TokenKind::Ident, "assignment", "identifier")?;
        self.expect(TokenKind::Assignment, "assignment", "`=`")?;
        let value = self.expression()?;

        if self.live {
            self.sink.on_assign(&target.lexeme, &value);
        }
        self.env = self.env.define(target.lexeme, value);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expression(&mut self) -> Result<Value> {
        let left = self.additive()?;
        let op = self.peek_kind();
        if !op.is_relational() {
            return Ok(left);
        }
        self.advance();
        let right = self.additive()?;
        self.compare(op, left, right)
    }

    fn compare(&mut self, op: TokenKind, left: Value, right: Value) -> Result<Value> {
        let ordering = match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Text(_), _) | (_, Value::Text(_)) => {
                Some(left.to_string().cmp(&right.to_string()))
            }
            (Value::Boolean(a), Value::Boolean(b))
                if matches!(op, TokenKind::Equals | TokenKind::NotEquals) =>
            {
                Some(a.cmp(b))
            }
            _ => {
                self.report(Error::semantic(
                    "comparison",
                    format!(
                        "cannot apply {} to {} and {}",
                        op,
                        left.type_name(),
                        right.type_name()
                    ),
                ))?;
                return Ok(Value::Boolean(false));
            }
        };

        // Unordered (NaN) operands are only ever unequal
        let holds = match (op, ordering) {
            (TokenKind::NotEquals, None) => true,
            (_, None) => false,
            (TokenKind::Equals, Some(o)) => o == Ordering::Equal,
            (TokenKind::NotEquals, Some(o)) => o != Ordering::Equal,
            (TokenKind::GreaterThan, Some(o)) => o == Ordering::Greater,
            (TokenKind::GreaterThanOrEquals, Some(o)) => o != Ordering::Less,
            (TokenKind::LessThan, Some(o)) => o == Ordering::Less,
            (TokenKind::LessThanOrEquals, Some(o)) => o != Ordering::Greater,
            _ => false,
        };
        Ok(Value::Boolean(holds))
    }

    fn additive(&mut self) -> Result<Value> {
        let mut left = self.modulo()?;
        loop {
            let op = self.peek_kind();
            if !matches!(op, TokenKind::Plus | TokenKind::Minus) {
                return Ok(left);
            }
            self.advance();
            let right = self.modulo()?;
            left = match (op, left, right) {
                (TokenKind::Plus, Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                (TokenKind::Plus, a, b) => Value::Text(format!("{}{}", a, b)),
                (_, Value::Number(a), Value::Number(b)) => Value::Number(a - b),
                (_, a, b) => self.mismatch("additive", "subtract", &a, &b)?,
            };
        }
    }

    fn modulo(&mut self) -> Result<Value> {
        let mut left = self.multiplicative()?;
        while self.check(TokenKind::Modulo) {
            self.advance();
            let right = self.multiplicative()?;
            left = match (left, right) {
                (Value::Number(a), Value::Number(b)) => Value::Number(a % b),
                (a, b) => self.mismatch("modulo", "take the remainder of", &a, &b)?,
            };
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Value> {
        let mut left = self.unary()?;
        loop {
            let op = self.peek_kind();
            if !matches!(op, TokenKind::Mult | TokenKind::Divide) {
                return Ok(left);
            }
            self.advance();
            let right = self.unary()?;
            left = match (op, left, right) {
                (TokenKind::Mult, Value::Number(a), Value::Number(b)) => Value::Number(a * b),
                (TokenKind::Mult, Value::Text(text), Value::Number(n)) => self.repeat(&text, n)?,
                (TokenKind::Divide, Value::Number(a), Value::Number(b)) => Value::Number(a / b),
                (TokenKind::Mult, a, b) => self.mismatch("multiplicative", "multiply", &a, &b)?,
                (_, a, b) => self.mismatch("multiplicative", "divide", &a, &b)?,
            };
        }
    }

    /// `text` repeated `count` times, the count truncated toward zero
    fn repeat(&mut self, text: &str, count: f64) -> Result<Value> {
        if count.is_nan() || count < 1.0 {
            return Ok(Value::Text(String::new()));
        }
        let times = count.trunc();
        let length = text.chars().count() as f64 * times;
        if length > MAX_REPEAT_LEN as f64 {
            self.report(Error::semantic(
                "multiplicative",
                format!("repeated text would exceed {} characters", MAX_REPEAT_LEN),
            ))?;
            return Ok(Value::Text(String::new()));
        }
        Ok(Value::Text(text.repeat(times as usize)))
    }

    fn unary(&mut self) -> Result<Value> {
        if !self.check(TokenKind::Minus) {
            return self.exponent();
        }
        self.advance();
        match self.unary()? {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => {
                self.report(Error::semantic(
                    "unary",
                    format!("cannot negate {}", other.type_name()),
                ))?;
                Ok(Value::default())
            }
        }
    }

    fn exponent(&mut self) -> Result<Value> {
        let base = self.primary()?;
        if !self.check(TokenKind::Exp) {
            return Ok(base);
        }
        self.advance();
        let power = self.unary()?;
        match (base, power) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.powf(b))),
            (a, b) => self.mismatch("exponent", "exponentiate", &a, &b),
        }
    }

    fn primary(&mut self) -> Result<Value> {
        if !self.check(TokenKind::LParen) {
            return self.atom();
        }
        self.advance();
        let value = self.expression()?;
        self.expect(TokenKind::RParen, "group", "`)`")?;
        Ok(value)
    }

    fn atom(&mut self) -> Result<Value> {
        match self.peek_kind() {
            TokenKind::Ident => {
                let token = self.advance();
                Ok(self.env.lookup(&token.lexeme).cloned().unwrap_or_default())
            }
            TokenKind::Number => {
                let token = self.advance();
                match token.lexeme.parse::<f64>() {
                    Ok(n) => Ok(Value::Number(n)),
                    Err(_) => {
                        self.report(Error::semantic(
                            "atom",
                            format!("malformed number `{}`", token.lexeme),
                        ))?;
                        Ok(Value::default())
                    }
                }
            }
            TokenKind::String => {
                let token = self.advance();
                Ok(Value::Text(strip_quotes(&token.lexeme).to_string()))
            }
            TokenKind::Sqrt => {
                self.advance();
                self.expect(TokenKind::LParen, "atom", "`(`")?;
                let operand = self.expression()?;
                self.expect(TokenKind::RParen, "atom", "`)`")?;
                match operand {
                    Value::Number(n) if n < 0.0 => Ok(Value::Number(0.0)),
                    Value::Number(n) => Ok(Value::Number(n.sqrt())),
                    other => {
                        self.report(Error::semantic(
                            "atom",
                            format!("cannot take the square root of {}", other.type_name()),
                        ))?;
                        Ok(Value::default())
                    }
                }
            }
            TokenKind::Error => {
                let token = self.advance();
                self.report(Error::Lexical {
                    rule: "atom",
                    lexeme: token.lexeme,
                })?;
                Ok(Value::default())
            }
            _ => Err(self.unexpected("atom", "expression")),
        }
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    /// Single funnel for every error the grammar raises
    fn report(&mut self, err: Error) -> Result<()> {
        match self.policy {
            ErrorPolicy::Collect => {
                tracing::debug!(error = %err, "collected error");
                self.errors.push(err);
                Ok(())
            }
            ErrorPolicy::FailFast => {
                self.errors.push(err.clone());
                self.aborted = true;
                Err(err)
            }
        }
    }

    fn mismatch(&mut self, rule: &'static str, verb: &str, a: &Value, b: &Value) -> Result<Value> {
        self.report(Error::semantic(
            rule,
            format!("cannot {} {} and {}", verb, a.type_name(), b.type_name()),
        ))?;
        Ok(Value::default())
    }

    /// Skips to just past the next `;`, or up to `EOF`
    fn synchronize(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn has_next(&mut self) -> bool {
        match &self.current {
            Some(token) => self.source.policy().admits(token.kind),
            None => self.source.has_next_token(),
        }
    }

    fn peek(&mut self) -> &Token {
        let source = &mut *self.source;
        self.current.get_or_insert_with(|| source.next_token())
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    fn check(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        match self.current.take() {
            Some(token) => token,
            None => self.source.next_token(),
        }
    }

    fn expect(&mut self, kind: TokenKind, rule: &'static str, what: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(rule, what))
        }
    }

    fn unexpected(&mut self, rule: &'static str, what: &str) -> Error {
        let found = describe(self.peek());
        Error::syntax(rule, format!("expected {}, found {}", what, found))
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("`{}`", token.lexeme),
    }
}

fn strip_quotes(lexeme: &str) -> &str {
    lexeme.get(1..lexeme.len().saturating_sub(1)).unwrap_or("")
}
