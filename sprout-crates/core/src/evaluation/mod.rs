//! Evaluators map a search node to a number, such as its cost so far or an estimate of its
//! remaining cost. The search and the open lists only talk to evaluators through an
//! [`EvaluatorStore`], which owns all evaluators of a run and hands out [`EvaluatorId`]s.
//!
//! Evaluators may depend on other evaluators (see [`CombiningEvaluator`]). A dependency always
//! has to be added to the store before the evaluator using it, which keeps the dependency graph
//! acyclic.
mod blind_search_heuristic;
mod combining_evaluator;
mod evaluation_context;
mod evaluation_result;
mod evaluator_store;
mod g_evaluator;
mod heuristic;
mod weighted_evaluator;

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

pub use blind_search_heuristic::*;
pub use combining_evaluator::*;
pub use evaluation_context::*;
pub use evaluation_result::*;
pub use evaluator_store::*;
pub use g_evaluator::*;
pub use heuristic::*;
pub use weighted_evaluator::*;

use crate::containers::StorageKey;
use crate::state::State;
use crate::task::OperatorId;

/// The value which marks a state as a dead end.
pub const INFINITY: i32 = i32::MAX;

/// The id of an evaluator in its [`EvaluatorStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EvaluatorId(u32);

impl StorageKey for EvaluatorId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        EvaluatorId(index as u32)
    }
}

impl Display for EvaluatorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait Evaluator: Debug {
    /// A short description, used in log messages and as the name of certified estimates.
    fn name(&self) -> &str;

    /// Whether an infinite value guarantees that the state is a dead end.
    fn dead_ends_are_reliable(&self) -> bool;

    /// The evaluators whose values this evaluator uses. All of them have a smaller id.
    fn dependencies(&self) -> &[EvaluatorId] {
        &[]
    }

    fn compute_result(
        &mut self,
        context: &mut EvaluationContext<'_>,
        dependencies: &mut Dependencies<'_>,
    ) -> EvaluationResult;

    fn notify_initial_state(&mut self, _initial_state: &State) {}

    fn notify_state_transition(&mut self, _parent: &State, _op: OperatorId, _state: &State) {}

    /// Whether the value can depend on the path by which a state was reached, in which case the
    /// evaluator wants to be notified of every transition.
    fn is_path_dependent(&self) -> bool {
        false
    }
}
