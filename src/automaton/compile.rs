//! Graph → dense table compilation.
//!
//! One depth-first traversal assigns integer ids to states and symbols in
//! first-discovery order (the start state is always id 0) and records every
//! edge. The dense table is then filled from the recorded edges, so the ids
//! never depend on a second traversal agreeing with the first.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::graph::{Graph, StateId};
use crate::lexer::TokenKind;

/// Sentinel stored in a table cell that has no transition.
pub const NO_TRANSITION: u32 = u32::MAX;

/// Assigns consecutive ids to keys in the order they are first seen.
struct Interner<K> {
    ids: HashMap<K, usize>,
    order: Vec<K>,
}

impl<K: Copy + Eq + Hash> Interner<K> {
    fn new() -> Self {
        Interner {
            ids: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn intern(&mut self, key: K) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.order.len();
        self.ids.insert(key, id);
        self.order.push(key);
        id
    }
}

/// Immutable compiled form of a transition graph
///
/// Rows are states, columns are symbols, both numbered by first discovery.
/// Every state carries its finality, its rollback distance (0 unless final
/// and declared otherwise) and its token kind (`ERROR` unless declared).
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTable<S: Eq + Hash> {
    /// Row-major `[state][symbol]` cells holding target ids or [`NO_TRANSITION`]
    cells: Vec<u32>,
    /// Symbols in column order
    alphabet: Vec<S>,
    /// Symbol → column
    columns: HashMap<S, usize>,
    finals: Vec<bool>,
    rollbacks: Vec<usize>,
    tokens: Vec<TokenKind>,
}

impl<S: Copy + Eq + Hash> CompiledTable<S> {
    /// Compiles the part of `graph` reachable from its start state.
    ///
    /// `rollbacks` gives the number of trailing characters a final state gives
    /// back; `tokens` gives the token kind each final state emits. Entries for
    /// unreachable states are ignored.
    pub fn compile(
        graph: &Graph<S>,
        rollbacks: &HashMap<StateId, usize>,
        tokens: &HashMap<StateId, TokenKind>,
    ) -> Self {
        let mut states = Interner::new();
        let mut symbols = Interner::new();
        let mut edges = Vec::new();

        states.intern(graph.start());
        graph.depth_first_traverse(|symbol, from, to| {
            let column = symbols.intern(symbol);
            let source = states.intern(from);
            let target = states.intern(to);
            edges.push((source, column, target as u32));
        });

        let width = symbols.order.len();
        let mut cells = vec![NO_TRANSITION; states.order.len() * width];
        for (source, column, target) in edges {
            cells[source * width + column] = target;
        }

        let finals: Vec<bool> = states.order.iter().map(|&s| graph.is_final(s)).collect();
        let rollbacks = states
            .order
            .iter()
            .zip(&finals)
            .map(|(state, &is_final)| {
                if is_final {
                    rollbacks.get(state).copied().unwrap_or(0)
                } else {
                    0
                }
            })
            .collect();
        let tokens = states
            .order
            .iter()
            .map(|state| tokens.get(state).copied().unwrap_or(TokenKind::Error))
            .collect();

        CompiledTable {
            cells,
            alphabet: symbols.order,
            columns: symbols.ids,
            finals,
            rollbacks,
            tokens,
        }
    }

    /// Row of the start state
    pub fn start(&self) -> usize {
        0
    }

    /// Number of rows
    pub fn state_count(&self) -> usize {
        self.finals.len()
    }

    /// Number of columns
    pub fn symbol_count(&self) -> usize {
        self.alphabet.len()
    }

    /// Symbols in column order
    pub fn alphabet(&self) -> &[S] {
        &self.alphabet
    }

    /// Column assigned to `symbol`, or `None` if no reachable edge uses it
    pub fn column(&self, symbol: S) -> Option<usize> {
        self.columns.get(&symbol).copied()
    }

    /// Raw cell content, [`NO_TRANSITION`] included
    pub fn cell(&self, state: usize, column: usize) -> u32 {
        self.cells[state * self.alphabet.len() + column]
    }

    /// O(1) transition lookup
    #[inline]
    pub fn next(&self, state: usize, column: usize) -> Option<usize> {
        match self.cell(state, column) {
            NO_TRANSITION => None,
            target => Some(target as usize),
        }
    }

    /// Whether `state` is final
    pub fn is_final(&self, state: usize) -> bool {
        self.finals[state]
    }

    /// Ids of all final states in ascending order
    pub fn final_states(&self) -> impl Iterator<Item = usize> + '_ {
        self.finals
            .iter()
            .enumerate()
            .filter(|&(_, &is_final)| is_final)
            .map(|(state, _)| state)
    }

    /// Characters to give back when `state` is reached
    pub fn rollback(&self, state: usize) -> usize {
        self.rollbacks[state]
    }

    /// Token kind emitted by `state`
    pub fn token_kind(&self, state: usize) -> TokenKind {
        self.tokens[state]
    }
}

impl<S: Copy + Eq + Hash + fmt::Debug> fmt::Display for CompiledTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<String> = self.alphabet.iter().map(|s| format!("{:?}", s)).collect();

        writeln!(
            f,
            "DFA table: {} states, {} symbols",
            self.state_count(),
            self.symbol_count()
        )?;
        write!(f, "{:>24} |", "")?;
        for header in &headers {
            write!(f, " {} |", header)?;
        }
        writeln!(f)?;
        write!(f, "{}+", "-".repeat(25))?;
        for header in &headers {
            write!(f, "{}|", "-".repeat(header.len() + 2))?;
        }
        writeln!(f)?;

        for state in 0..self.state_count() {
            let label = if self.is_final(state) {
                format!("[{}]", self.token_kind(state))
            } else {
                String::new()
            };
            write!(f, "{:>19} {:>4} |", label, state)?;
            for (column, header) in headers.iter().enumerate() {
                match self.next(state, column) {
                    Some(target) => write!(f, " {:>width$} |", target, width = header.len())?,
                    None => write!(f, " {:>width$} |", "-", width = header.len())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
