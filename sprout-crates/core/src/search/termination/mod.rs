//! A [`TerminationCondition`] is polled by the search between two steps. It indicates when the
//! search should stop, even though it has neither found a plan nor exhausted the state space. The
//! most common example is [`TimeBudget`], which gives the search a wall-clock budget.

mod combinator;
mod indefinite;
mod time_budget;

pub use combinator::*;
pub use indefinite::*;
pub use time_budget::*;

/// Determines when the search should give up.
pub trait TerminationCondition {
    /// Returns `true` when the search should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for &mut T {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }
}
