use super::Dependencies;
use super::EvaluationContext;
use super::EvaluationResult;
use super::Evaluator;
use super::EvaluatorId;
use super::EvaluatorStore;
use super::INFINITY;

/// Multiplies the value of another evaluator by a constant weight.
#[derive(Debug)]
pub struct WeightedEvaluator {
    name: String,
    evaluator: [EvaluatorId; 1],
    weight: i32,
    dead_ends_are_reliable: bool,
}

impl WeightedEvaluator {
    pub fn new(evaluator: EvaluatorId, weight: i32, store: &EvaluatorStore) -> WeightedEvaluator {
        let inner = store.get(evaluator);

        WeightedEvaluator {
            name: format!("{weight}*{}", inner.name()),
            evaluator: [evaluator],
            weight,
            dead_ends_are_reliable: inner.dead_ends_are_reliable(),
        }
    }
}

impl Evaluator for WeightedEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn dead_ends_are_reliable(&self) -> bool {
        self.dead_ends_are_reliable
    }

    fn dependencies(&self) -> &[EvaluatorId] {
        &self.evaluator
    }

    fn compute_result(
        &mut self,
        context: &mut EvaluationContext<'_>,
        dependencies: &mut Dependencies<'_>,
    ) -> EvaluationResult {
        let value = dependencies.evaluate(self.evaluator[0], context).value();
        if value == INFINITY {
            EvaluationResult::infinite()
        } else {
            EvaluationResult::new(value.saturating_mul(self.weight))
        }
    }
}
