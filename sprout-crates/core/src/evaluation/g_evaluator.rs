use super::Dependencies;
use super::EvaluationContext;
use super::EvaluationResult;
use super::Evaluator;

/// The cost of the path by which a node was reached.
#[derive(Debug, Default)]
pub struct GEvaluator;

impl Evaluator for GEvaluator {
    fn name(&self) -> &str {
        "g"
    }

    fn dead_ends_are_reliable(&self) -> bool {
        true
    }

    fn compute_result(
        &mut self,
        context: &mut EvaluationContext<'_>,
        _: &mut Dependencies<'_>,
    ) -> EvaluationResult {
        EvaluationResult::new(context.g())
    }
}
