//! Eager best-first search and the bookkeeping it needs: the [`SearchSpace`] with one node per
//! state, pruning of applicable operators, statistics, and the conditions under which a search
//! gives up.
mod eager_search;
mod plan;
mod pruning;
mod search_space;
mod search_statistics;
pub mod termination;

pub use eager_search::*;
pub use plan::*;
pub use pruning::*;
pub use search_space::*;
pub use search_statistics::*;

/// The state of a search. Every status other than [`SearchStatus::InProgress`] is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    InProgress,
    /// A plan has been found.
    Solved,
    /// The open list ran empty without reaching a goal.
    Failed,
    /// A termination condition stopped the search.
    Timeout,
}
