use std::collections::BTreeMap;
use std::collections::VecDeque;

use super::OpenList;
use crate::evaluation::EvaluationContext;
use crate::evaluation::EvaluatorId;
use crate::evaluation::EvaluatorStore;
use crate::sprout_assert_simple;

/// Orders the entries lexicographically by the values of several evaluators.
#[derive(Debug)]
pub struct TieBreakingOpenList<Entry> {
    buckets: BTreeMap<Vec<i32>, VecDeque<Entry>>,
    size: usize,
    evaluators: Vec<EvaluatorId>,
    /// Skip the entries which the first evaluator considers a dead end, even if its dead ends
    /// are not reliable.
    allow_unsafe_pruning: bool,
    preferred_only: bool,
}

impl<Entry> TieBreakingOpenList<Entry> {
    pub fn new(
        evaluators: Vec<EvaluatorId>,
        allow_unsafe_pruning: bool,
        preferred_only: bool,
    ) -> TieBreakingOpenList<Entry> {
        sprout_assert_simple!(!evaluators.is_empty());

        TieBreakingOpenList {
            buckets: BTreeMap::new(),
            size: 0,
            evaluators,
            allow_unsafe_pruning,
            preferred_only,
        }
    }
}

impl<Entry: std::fmt::Debug> OpenList<Entry> for TieBreakingOpenList<Entry> {
    fn do_insertion(
        &mut self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
        entry: Entry,
    ) {
        let key = self
            .evaluators
            .iter()
            .map(|&evaluator| evaluators.value(evaluator, context))
            .collect::<Vec<_>>();

        self.buckets.entry(key).or_default().push_back(entry);
        self.size += 1;
    }

    fn remove_min(&mut self) -> Option<Entry> {
        let mut bucket = self.buckets.first_entry()?;
        let entry = bucket.get_mut().pop_front();
        if bucket.get().is_empty() {
            let _ = bucket.remove();
        }

        if entry.is_some() {
            self.size -= 1;
        }
        entry
    }

    fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn len(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.size = 0;
    }

    fn is_dead_end(
        &self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
    ) -> bool {
        if self.is_reliable_dead_end(evaluators, context) {
            return true;
        }

        if self.allow_unsafe_pruning && evaluators.is_infinite(self.evaluators[0], context) {
            return true;
        }

        self.evaluators
            .iter()
            .all(|&evaluator| evaluators.is_infinite(evaluator, context))
    }

    fn is_reliable_dead_end(
        &self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
    ) -> bool {
        self.evaluators.iter().any(|&evaluator| {
            evaluators.is_infinite(evaluator, context)
                && evaluators.get(evaluator).dead_ends_are_reliable()
        })
    }

    fn only_contains_preferred_entries(&self) -> bool {
        self.preferred_only
    }
}
