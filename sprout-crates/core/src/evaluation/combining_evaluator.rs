use super::Dependencies;
use super::EvaluationContext;
use super::EvaluationResult;
use super::Evaluator;
use super::EvaluatorId;
use super::EvaluatorStore;
use super::INFINITY;

/// How a [`CombiningEvaluator`] aggregates the values of its subevaluators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combination {
    Max,
    Sum,
}

impl Combination {
    fn combine(self, values: &[i32]) -> i32 {
        match self {
            Combination::Max => values.iter().copied().max().unwrap_or(0),
            Combination::Sum => values
                .iter()
                .fold(0_i32, |sum, &value| sum.saturating_add(value)),
        }
    }
}

/// Aggregates the values of several evaluators. If any of them is infinite, so is the result.
#[derive(Debug)]
pub struct CombiningEvaluator {
    name: String,
    combination: Combination,
    subevaluators: Vec<EvaluatorId>,
    all_dead_ends_are_reliable: bool,
    values: Vec<i32>,
}

impl CombiningEvaluator {
    /// The subevaluators have to be in `store` already.
    pub fn new(
        name: impl Into<String>,
        combination: Combination,
        subevaluators: Vec<EvaluatorId>,
        store: &EvaluatorStore,
    ) -> CombiningEvaluator {
        let all_dead_ends_are_reliable = subevaluators
            .iter()
            .all(|&evaluator| store.get(evaluator).dead_ends_are_reliable());

        CombiningEvaluator {
            name: name.into(),
            combination,
            values: Vec::with_capacity(subevaluators.len()),
            subevaluators,
            all_dead_ends_are_reliable,
        }
    }
}

impl Evaluator for CombiningEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn dead_ends_are_reliable(&self) -> bool {
        self.all_dead_ends_are_reliable
    }

    fn dependencies(&self) -> &[EvaluatorId] {
        &self.subevaluators
    }

    fn compute_result(
        &mut self,
        context: &mut EvaluationContext<'_>,
        dependencies: &mut Dependencies<'_>,
    ) -> EvaluationResult {
        self.values.clear();

        for &evaluator in &self.subevaluators {
            let value = dependencies.evaluate(evaluator, context).value();
            if value == INFINITY {
                return EvaluationResult::infinite();
            }
            self.values.push(value);
        }

        EvaluationResult::new(self.combination.combine(&self.values))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::proof::ProofSession;
    use crate::state::StateRegistry;
    use crate::task::test_tasks;

    #[derive(Debug)]
    struct Constant(i32);

    impl Evaluator for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn dead_ends_are_reliable(&self) -> bool {
            self.0 != 2
        }

        fn compute_result(
            &mut self,
            _: &mut EvaluationContext<'_>,
            _: &mut Dependencies<'_>,
        ) -> EvaluationResult {
            EvaluationResult::new(self.0)
        }
    }

    fn combine(combination: Combination, values: &[i32]) -> (i32, bool) {
        let mut registry = StateRegistry::new(Rc::new(test_tasks::two_switches()));
        let state = registry.initial_state();

        let mut store = EvaluatorStore::default();
        let subevaluators = values
            .iter()
            .map(|&value| store.add(Constant(value)))
            .collect();
        let combined =
            CombiningEvaluator::new("combined", combination, subevaluators, &store);
        let reliable = combined.dead_ends_are_reliable();
        let combined = store.add(combined);

        let mut proof = ProofSession::default();
        let mut context = EvaluationContext::new(state, 0, false, &mut proof);
        (store.value(combined, &mut context), reliable)
    }

    #[test]
    fn max_of_finite_values() {
        assert_eq!(5, combine(Combination::Max, &[3, 5, 2]).0);
    }

    #[test]
    fn sum_of_finite_values() {
        assert_eq!(10, combine(Combination::Sum, &[3, 5, 2]).0);
    }

    #[test]
    fn any_infinite_value_makes_the_result_infinite() {
        assert_eq!(INFINITY, combine(Combination::Max, &[3, INFINITY, 7]).0);
        assert_eq!(INFINITY, combine(Combination::Sum, &[INFINITY, 1]).0);
    }

    #[test]
    fn reliability_requires_every_subevaluator_to_be_reliable() {
        assert!(combine(Combination::Max, &[3, 5]).1);
        assert!(!combine(Combination::Max, &[3, 2]).1);
    }
}
