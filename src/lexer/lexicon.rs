//! The built-in lexicon: a hand-authored DFA over [`Symbol`], compiled once.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::symbol::{Symbol, SymbolClassifier};
use super::token::TokenKind;
use crate::automaton::{CompiledTable, Graph, StateId};
use crate::error::{Error, Result};

lazy_static! {
    static ref STANDARD: Result<Lexicon> = Lexicon::standard();
}

/// The shared built-in lexicon
///
/// Built on first use and then handed out read-only to every scanner, on any
/// thread. A construction failure is returned to each caller as
/// [`Error::Lexicon`] or [`Error::OverlappingSymbols`].
pub fn lexicon() -> Result<&'static Lexicon> {
    STANDARD.as_ref().map_err(Clone::clone)
}

/// A classifier paired with the table it drives
#[derive(Debug, Clone)]
pub struct Lexicon {
    classifier: SymbolClassifier,
    table: CompiledTable<Symbol>,
}

impl Lexicon {
    /// Pairs a classifier with a compiled table
    ///
    /// Fails unless the table has at least a start row and one final state.
    pub fn new(classifier: SymbolClassifier, table: CompiledTable<Symbol>) -> Result<Self> {
        if table.final_states().next().is_none() {
            return Err(Error::Lexicon("table has no final state".to_string()));
        }
        Ok(Lexicon { classifier, table })
    }

    /// Builds the standard lexicon from scratch
    ///
    /// Prefer [`lexicon`], which builds it only once.
    pub fn standard() -> Result<Self> {
        let classifier = SymbolClassifier::standard()?.clone();
        let (graph, rollbacks, tokens) = standard_graph()?;
        let table = CompiledTable::compile(&graph, &rollbacks, &tokens);

        tracing::debug!(
            states = table.state_count(),
            symbols = table.symbol_count(),
            "compiled built-in lexicon"
        );

        Lexicon::new(classifier, table)
    }

    pub fn classifier(&self) -> &SymbolClassifier {
        &self.classifier
    }

    pub fn table(&self) -> &CompiledTable<Symbol> {
        &self.table
    }
}

/// Graph authoring helpers bundling the side maps the compiler needs
struct Builder {
    graph: Graph<Symbol>,
    rollbacks: HashMap<StateId, usize>,
    tokens: HashMap<StateId, TokenKind>,
}

impl Builder {
    fn new() -> Self {
        Builder {
            graph: Graph::new(),
            rollbacks: HashMap::new(),
            tokens: HashMap::new(),
        }
    }

    /// Sends every symbol `state` has no edge for to `target`
    fn otherwise(&mut self, state: StateId, target: StateId) {
        self.graph.otherwise(state, &Symbol::ALL, Some(target));
    }

    /// Sends every symbol `state` has no edge for to a fresh state
    fn fallback(&mut self, state: StateId) -> Result<StateId> {
        self.graph
            .otherwise(state, &Symbol::ALL, None)
            .ok_or_else(|| Error::Lexicon(format!("{} has no symbol left to fall back on", state)))
    }

    /// Marks `state` final, emitting `kind` after giving back `rollback` characters
    fn accept(&mut self, state: StateId, kind: Option<TokenKind>, rollback: usize, trap: StateId) {
        self.graph.set_final(state, true);
        if let Some(kind) = kind {
            self.tokens.insert(state, kind);
        }
        if rollback > 0 {
            self.rollbacks.insert(state, rollback);
        }
        self.otherwise(state, trap);
    }
}

type StandardGraph = (
    Graph<Symbol>,
    HashMap<StateId, usize>,
    HashMap<StateId, TokenKind>,
);

/// Authors the standard lexicon graph
///
/// Final states roll back the lookahead character that ended a token. Numbers
/// whose fraction or exponent is left unfinished (`12.`, `1e`, `1e+`) are cut
/// back to the whole part with a rollback of two or three.
fn standard_graph() -> Result<StandardGraph> {
    use Symbol::{
        Digit, Divide, DoubleQuote, Endline, Eof, Equals, ExclamationPoint, GreaterThan, Hashtag,
        LessThan, LetterE, LetterNotE, Minus, Mult, Period, Plus, SingleQuote, Underscore,
        Whitespace,
    };

    let mut b = Builder::new();
    let root = b.graph.start();
    b.graph.loop_on(root, Whitespace);
    b.graph.loop_on(root, Endline);

    let trap = b.graph.transition(root, Symbol::Error);
    b.graph.set_final(trap, true);
    b.tokens.insert(trap, TokenKind::Error);
    b.otherwise(trap, trap);

    // Numbers
    {
        let num = b.graph.transition(root, Digit);
        b.graph.loop_on(num, Digit);

        let decimal_point = b.graph.transition(num, Period);
        let decimal_digit = b.graph.transition(decimal_point, Digit);
        b.graph.loop_on(decimal_digit, Digit);

        let exponent_symbol = b.graph.transition(num, LetterE);
        b.graph.transition_to(decimal_digit, LetterE, exponent_symbol);

        let signed_exponent = b.graph.transition(exponent_symbol, Minus);
        b.graph.transition_to(exponent_symbol, Plus, signed_exponent);

        let exponent_digit = b.graph.transition(exponent_symbol, Digit);
        b.graph.loop_on(exponent_digit, Digit);
        b.graph.transition_to(signed_exponent, Digit, exponent_digit);

        let fin = b.fallback(num)?;
        b.otherwise(decimal_digit, fin);
        b.otherwise(exponent_digit, fin);
        b.accept(fin, Some(TokenKind::Number), 1, trap);

        let fin_double = b.fallback(decimal_point)?;
        b.otherwise(exponent_symbol, fin_double);
        b.accept(fin_double, Some(TokenKind::Number), 2, trap);

        let fin_triple = b.fallback(signed_exponent)?;
        b.accept(fin_triple, Some(TokenKind::Number), 3, trap);
    }

    // Identifiers and keywords
    {
        let letter = b.graph.transition(root, LetterNotE);
        b.graph.transition_to(root, LetterE, letter);
        for symbol in [LetterNotE, LetterE, Digit, Underscore] {
            b.graph.loop_on(letter, symbol);
        }

        let fin = b.fallback(letter)?;
        b.accept(fin, Some(TokenKind::Ident), 1, trap);
    }

    // Strings
    {
        let single_quote = b.graph.transition(root, SingleQuote);
        let broken = b.graph.transition(single_quote, Endline);
        b.graph.transition_to(single_quote, Eof, trap);
        let fin = b.graph.transition(single_quote, SingleQuote);
        b.otherwise(single_quote, single_quote);

        let double_quote = b.graph.transition(root, DoubleQuote);
        b.graph.transition_to(double_quote, Endline, broken);
        b.graph.transition_to(double_quote, Eof, trap);
        b.graph.transition_to(double_quote, DoubleQuote, fin);
        b.otherwise(double_quote, double_quote);

        b.accept(fin, Some(TokenKind::String), 0, trap);

        b.graph.set_final(broken, true);
        b.tokens.insert(broken, TokenKind::Error);
        b.rollbacks.insert(broken, 1);
        b.otherwise(broken, broken);
    }

    // `*` and `**`
    {
        let mult = b.graph.transition(root, Mult);
        let exp = b.graph.transition(mult, Mult);
        let fin = b.fallback(mult)?;
        b.accept(exp, Some(TokenKind::Exp), 0, trap);
        b.accept(fin, Some(TokenKind::Mult), 1, trap);
    }

    // `/`, `//` and `#` comments
    {
        let divide = b.graph.transition(root, Divide);
        let comment = b.graph.transition(divide, Divide);
        b.graph.transition_to(root, Hashtag, comment);
        let comment_end = b.graph.transition(comment, Endline);
        b.graph.transition_to(comment, Eof, comment_end);
        b.otherwise(comment, comment);

        let fin = b.fallback(divide)?;
        b.accept(fin, Some(TokenKind::Divide), 1, trap);
        b.accept(comment_end, Some(TokenKind::Comment), 1, trap);
    }

    // Operators with an optional trailing `=`
    {
        let operators = [
            (Equals, TokenKind::Equals, TokenKind::Assignment),
            (ExclamationPoint, TokenKind::NotEquals, TokenKind::Error),
            (LessThan, TokenKind::LessThanOrEquals, TokenKind::LessThan),
            (GreaterThan, TokenKind::GreaterThanOrEquals, TokenKind::GreaterThan),
        ];
        for (symbol, with_equals, alone) in operators {
            let first = b.graph.transition(root, symbol);
            let double = b.graph.transition(first, Equals);
            let fin = b.fallback(first)?;
            b.accept(double, Some(with_equals), 0, trap);
            b.accept(fin, Some(alone), 1, trap);
        }
    }

    // Every remaining symbol gets its own final state
    for symbol in Symbol::ALL {
        if !b.graph.has_transition(root, symbol) {
            let fin = b.graph.transition(root, symbol);
            b.accept(fin, symbol.token_kind(), 0, trap);
        }
    }
    b.otherwise(root, trap);

    Ok((b.graph, b.rollbacks, b.tokens))
}
