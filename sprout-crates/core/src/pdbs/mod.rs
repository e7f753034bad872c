//! Pattern databases: the projection of a task onto a subset of its variables, with the exact
//! goal distances of all abstract states computed up front.
//!
//! A [`PatternDatabase`] is built in four steps. The operators of the task are specialized to
//! the pattern ([`compute_abstract_operators`]), indexed by their regression preconditions in a
//! [`MatchTree`], and Dijkstra's algorithm is run backwards from the abstract goal states. The
//! resulting table is immutable; the [`PdbHeuristic`] only looks up the rank of a state in it.
mod abstract_operator;
mod error;
mod match_tree;
mod pattern;
mod pattern_database;
mod pattern_generators;
mod pdb_heuristic;
mod projection;

pub use abstract_operator::*;
pub use error::*;
pub use match_tree::*;
pub use pattern::*;
pub use pattern_database::*;
pub use pattern_generators::*;
pub use pdb_heuristic::*;
pub use projection::*;
