use std::fmt::Debug;
use std::rc::Rc;

use super::Dependencies;
use super::EvaluationContext;
use super::EvaluationResult;
use super::Evaluator;
use super::INFINITY;
use crate::containers::KeyedVec;
use crate::containers::OrderedSet;
use crate::proof::ProofSession;
use crate::sprout_assert_simple;
use crate::state::State;
use crate::state::StateId;
use crate::task::OperatorId;

/// An estimate of the cost of reaching the goal from a state.
///
/// Heuristics are turned into evaluators by [`HeuristicEvaluator`], which takes care of caching.
/// A heuristic which supports certificates reports every estimate it computes to the proof.
pub trait Heuristic: Debug {
    fn name(&self) -> &str;

    fn dead_ends_are_reliable(&self) -> bool {
        true
    }

    /// Computes the estimate for `state`, or [`INFINITY`] for a dead end.
    ///
    /// Operators which look promising may be added to `preferred`; they are discarded if the
    /// state turns out to be a dead end.
    fn compute_heuristic(
        &mut self,
        state: &State,
        preferred: &mut OrderedSet<OperatorId>,
        proof: &mut ProofSession,
    ) -> i32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CachedEstimate {
    h: i32,
    dirty: bool,
}

/// Turns a [`Heuristic`] into an [`Evaluator`].
#[derive(Debug)]
pub struct HeuristicEvaluator<H> {
    heuristic: H,
    name: Rc<str>,
    cache_estimates: bool,
    cache: KeyedVec<StateId, Option<CachedEstimate>>,
    preferred_operators: OrderedSet<OperatorId>,
}

impl<H: Heuristic> HeuristicEvaluator<H> {
    pub fn new(heuristic: H) -> HeuristicEvaluator<H> {
        let name = heuristic.name().into();
        HeuristicEvaluator {
            heuristic,
            name,
            cache_estimates: true,
            cache: KeyedVec::default(),
            preferred_operators: OrderedSet::default(),
        }
    }

    pub fn with_cached_estimates(mut self, cache_estimates: bool) -> HeuristicEvaluator<H> {
        self.cache_estimates = cache_estimates;
        self
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Forces the estimate of `state` to be recomputed the next time it is needed.
    pub fn mark_dirty(&mut self, state: StateId) {
        if let Some(Some(estimate)) = self.cache.get_mut(state) {
            estimate.dirty = true;
        }
    }

    pub fn cached_estimate(&self, state: StateId) -> Option<i32> {
        self.cache
            .get(state)
            .copied()
            .flatten()
            .filter(|estimate| !estimate.dirty)
            .map(|estimate| estimate.h)
    }
}

impl<H: Heuristic> Evaluator for HeuristicEvaluator<H> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dead_ends_are_reliable(&self) -> bool {
        self.heuristic.dead_ends_are_reliable()
    }

    fn compute_result(
        &mut self,
        context: &mut EvaluationContext<'_>,
        _: &mut Dependencies<'_>,
    ) -> EvaluationResult {
        sprout_assert_simple!(self.preferred_operators.is_empty());

        let state = context.state().clone();
        let calculate_preferred = context.calculate_preferred();

        // Preferred operators are only known after a fresh computation.
        let cached = if calculate_preferred || !self.cache_estimates {
            None
        } else {
            self.cached_estimate(state.id())
        };

        let (h, count_evaluation) = match cached {
            Some(h) => (h, false),
            None => {
                let h = self.heuristic.compute_heuristic(
                    &state,
                    &mut self.preferred_operators,
                    context.proof(),
                );
                sprout_assert_simple!(h == INFINITY || h >= 0, "{} computed {h}", self.name);

                if self.cache_estimates {
                    self.cache.accomodate(state.id(), None);
                    self.cache[state.id()] = Some(CachedEstimate { h, dirty: false });
                }
                (h, true)
            }
        };

        let mut result = EvaluationResult::new(h).with_count_evaluation(count_evaluation);
        if h == INFINITY || !calculate_preferred {
            self.preferred_operators.clear();
        } else {
            result = result.with_preferred_operators(self.preferred_operators.take());
        }

        sprout_assert_simple!(self.preferred_operators.is_empty());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;
    use crate::evaluation::EvaluatorStore;
    use crate::state::StateRegistry;
    use crate::task::test_tasks;

    /// Marks an operator as preferred and returns the queued estimates in order.
    #[derive(Debug)]
    struct ScriptedHeuristic {
        estimates: Vec<i32>,
        calls: usize,
    }

    impl Heuristic for ScriptedHeuristic {
        fn name(&self) -> &str {
            "scripted"
        }

        fn compute_heuristic(
            &mut self,
            _: &State,
            preferred: &mut OrderedSet<OperatorId>,
            _: &mut ProofSession,
        ) -> i32 {
            let _ = preferred.insert(OperatorId::new(1));
            let h = self.estimates[self.calls];
            self.calls += 1;
            h
        }
    }

    fn evaluate(
        store: &mut EvaluatorStore,
        evaluator: crate::evaluation::EvaluatorId,
        state: &State,
        calculate_preferred: bool,
    ) -> EvaluationResult {
        let mut proof = ProofSession::default();
        let mut context = EvaluationContext::new(state.clone(), 0, false, &mut proof)
            .with_preferred_operators(calculate_preferred);
        store.evaluate(evaluator, &mut context)
    }

    #[test]
    fn estimates_are_served_from_the_cache() {
        let mut registry = StateRegistry::new(Rc::new(test_tasks::two_switches()));
        let state = registry.initial_state();

        let mut store = EvaluatorStore::default();
        let evaluator = store.add(HeuristicEvaluator::new(ScriptedHeuristic {
            estimates: vec![3, 5],
            calls: 0,
        }));

        let first = evaluate(&mut store, evaluator, &state, false);
        let second = evaluate(&mut store, evaluator, &state, false);

        assert_eq!(3, first.value());
        assert!(first.count_evaluation());
        assert_eq!(3, second.value());
        assert!(!second.count_evaluation());
    }

    #[test]
    fn preferred_operators_bypass_the_cache() {
        let mut registry = StateRegistry::new(Rc::new(test_tasks::two_switches()));
        let state = registry.initial_state();

        let mut store = EvaluatorStore::default();
        let evaluator = store.add(HeuristicEvaluator::new(ScriptedHeuristic {
            estimates: vec![3, 5],
            calls: 0,
        }));

        let _ = evaluate(&mut store, evaluator, &state, false);
        let with_preferred = evaluate(&mut store, evaluator, &state, true);

        assert_eq!(5, with_preferred.value());
        assert_eq!(&[OperatorId::new(1)], with_preferred.preferred_operators());
    }

    #[test]
    fn dead_ends_discard_preferred_operators() {
        let mut registry = StateRegistry::new(Rc::new(test_tasks::two_switches()));
        let state = registry.initial_state();

        let mut store = EvaluatorStore::default();
        let evaluator = store.add(HeuristicEvaluator::new(ScriptedHeuristic {
            estimates: vec![INFINITY],
            calls: 0,
        }));

        let result = evaluate(&mut store, evaluator, &state, true);

        assert!(result.is_infinite());
        assert!(result.preferred_operators().is_empty());
    }

    #[test]
    fn dirty_estimates_are_recomputed() {
        let mut registry = StateRegistry::new(Rc::new(test_tasks::two_switches()));
        let state = registry.initial_state();

        let mut evaluator = HeuristicEvaluator::new(ScriptedHeuristic {
            estimates: vec![3, 4],
            calls: 0,
        });
        let mut proof = ProofSession::default();
        let mut context = EvaluationContext::new(state.clone(), 0, false, &mut proof);
        let _ = evaluator.compute_result(&mut context, &mut Dependencies::none());
        assert_eq!(Some(3), evaluator.cached_estimate(state.id()));

        drop(context);

        evaluator.mark_dirty(StateId::create_from_index(0));
        assert_eq!(None, evaluator.cached_estimate(state.id()));

        let mut context = EvaluationContext::new(state.clone(), 0, false, &mut proof);
        let recomputed = evaluator.compute_result(&mut context, &mut Dependencies::none());
        assert_eq!(4, recomputed.value());
    }
}
