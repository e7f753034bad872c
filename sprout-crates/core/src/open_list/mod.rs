//! Open lists hold the nodes that are waiting to be expanded, ordered by the values of one or
//! more evaluators.
mod best_first_open_list;
mod pareto_open_list;
mod tie_breaking_open_list;

use std::fmt::Debug;

pub use best_first_open_list::*;
pub use pareto_open_list::*;
pub use tie_breaking_open_list::*;

use crate::evaluation::EvaluationContext;
use crate::evaluation::EvaluatorStore;

pub trait OpenList<Entry>: Debug {
    /// Inserts `entry`, whose node is described by `context`.
    ///
    /// Nothing is inserted for a dead end, or for a node that was not reached by a preferred
    /// operator if the list only accepts preferred entries.
    fn insert(
        &mut self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
        entry: Entry,
    ) {
        if self.only_contains_preferred_entries() && !context.is_preferred() {
            return;
        }
        if !self.is_dead_end(evaluators, context) {
            self.do_insertion(evaluators, context, entry);
        }
    }

    fn do_insertion(
        &mut self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
        entry: Entry,
    );

    /// Removes an entry with the smallest key. Entries with equal keys leave in the order they
    /// were inserted. Returns `None` if the list is empty.
    fn remove_min(&mut self) -> Option<Entry>;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;

    fn clear(&mut self);

    /// Whether the node should be considered a dead end by this list.
    fn is_dead_end(
        &self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
    ) -> bool;

    /// Whether an evaluator with reliable dead ends reports the node as a dead end.
    fn is_reliable_dead_end(
        &self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
    ) -> bool;

    fn only_contains_preferred_entries(&self) -> bool;
}
