use std::fmt;

/// Opaque handle to a state owned by a [`Graph`].
///
/// Handles are only minted by the graph itself, by `transition` or
/// `otherwise`, and each one is the target of an edge when it is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// Position of this state in its graph's arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Node<S> {
    /// Outgoing edges in insertion order
    edges: Vec<(S, StateId)>,
    is_final: bool,
}

impl<S> Node<S> {
    fn new() -> Self {
        Node {
            edges: Vec::new(),
            is_final: false,
        }
    }
}

/// Mutable transition graph for authoring a DFA
///
/// The graph owns every state in an arena and hands out [`StateId`] handles.
/// Each state has at most one outgoing edge per symbol. Edges are kept in the
/// order they were first added, which makes [`Graph::depth_first_traverse`]
/// reproducible.
///
/// All methods taking a [`StateId`] panic if the handle belongs to another,
/// larger graph.
#[derive(Debug, Clone)]
pub struct Graph<S> {
    nodes: Vec<Node<S>>,
}

impl<S: Copy + PartialEq> Graph<S> {
    /// Creates a graph containing only its start state
    pub fn new() -> Self {
        Graph {
            nodes: vec![Node::new()],
        }
    }

    /// The designated start state
    pub fn start(&self) -> StateId {
        StateId(0)
    }

    /// Number of states allocated so far, reachable or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph owns at least its start state
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn new_state(&mut self) -> StateId {
        let id = StateId(self.nodes.len() as u32);
        self.nodes.push(Node::new());
        id
    }

    /// Links `from --symbol--> fresh` to a newly allocated state and returns it
    pub fn transition(&mut self, from: StateId, symbol: S) -> StateId {
        let fresh = self.new_state();
        self.transition_to(from, symbol, fresh)
    }

    /// Links `from --symbol--> target`, replacing any existing edge on `symbol`
    pub fn transition_to(&mut self, from: StateId, symbol: S, target: StateId) -> StateId {
        let edges = &mut self.nodes[from.index()].edges;
        match edges.iter_mut().find(|(s, _)| *s == symbol) {
            Some(edge) => edge.1 = target,
            None => edges.push((symbol, target)),
        }
        target
    }

    /// Adds a self edge on `symbol` and returns `state`
    pub fn loop_on(&mut self, state: StateId, symbol: S) -> StateId {
        self.transition_to(state, symbol, state)
    }

    /// Completes `state` over `alphabet`: every symbol without an edge is sent
    /// to `target`, or to one freshly allocated state when `target` is `None`.
    ///
    /// Returns the fallback state, or `None` when `state` already had an edge
    /// for every symbol. Nothing is allocated in that case.
    pub fn otherwise(
        &mut self,
        state: StateId,
        alphabet: &[S],
        target: Option<StateId>,
    ) -> Option<StateId> {
        let missing: Vec<S> = alphabet
            .iter()
            .copied()
            .filter(|&symbol| !self.has_transition(state, symbol))
            .collect();
        if missing.is_empty() {
            return None;
        }
        let target = target.unwrap_or_else(|| self.new_state());
        for symbol in missing {
            self.transition_to(state, symbol, target);
        }
        Some(target)
    }

    /// Whether `state` has an outgoing edge on `symbol`
    pub fn has_transition(&self, state: StateId, symbol: S) -> bool {
        self.next(state, symbol).is_some()
    }

    /// Removes the edge on `symbol`, returning its former target
    pub fn remove_transition(&mut self, state: StateId, symbol: S) -> Option<StateId> {
        let edges = &mut self.nodes[state.index()].edges;
        let position = edges.iter().position(|(s, _)| *s == symbol)?;
        Some(edges.remove(position).1)
    }

    /// Target of the edge on `symbol`, if any
    pub fn next(&self, state: StateId, symbol: S) -> Option<StateId> {
        self.nodes[state.index()]
            .edges
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, target)| *target)
    }

    /// Outgoing edges of `state` in insertion order
    pub fn edges(&self, state: StateId) -> impl Iterator<Item = (S, StateId)> + '_ {
        self.nodes[state.index()].edges.iter().copied()
    }

    /// Marks or unmarks `state` as final
    pub fn set_final(&mut self, state: StateId, is_final: bool) {
        self.nodes[state.index()].is_final = is_final;
    }

    /// Whether `state` is final
    pub fn is_final(&self, state: StateId) -> bool {
        self.nodes[state.index()].is_final
    }

    /// Visits every edge reachable from the start state exactly once.
    ///
    /// The visitor receives `(symbol, source, target)`. States are expanded
    /// the first time they are popped from an explicit stack and their edges
    /// are enumerated in insertion order, so two traversals of an unchanged
    /// graph report identical sequences.
    pub fn depth_first_traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(S, StateId, StateId),
    {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![self.start()];
        visited[self.start().index()] = true;

        while let Some(current) = stack.pop() {
            for &(symbol, next) in &self.nodes[current.index()].edges {
                visitor(symbol, current, next);
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    stack.push(next);
                }
            }
        }
    }
}

impl<S: Copy + PartialEq> Default for Graph<S> {
    fn default() -> Self {
        Self::new()
    }
}
