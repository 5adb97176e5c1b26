//! Automaton authoring and compilation
//!
//! A [`Graph`] is built by composing `transition`, `loop_on` and `otherwise`,
//! then frozen into a [`CompiledTable`] for O(1) lookups at scan time.

mod compile;
mod graph;

pub use compile::{CompiledTable, NO_TRANSITION};
pub use graph::{Graph, StateId};
