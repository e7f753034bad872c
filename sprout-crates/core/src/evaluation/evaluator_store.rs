use super::EvaluationContext;
use super::EvaluationResult;
use super::Evaluator;
use super::EvaluatorId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::sprout_assert_simple;
use crate::state::State;
use crate::task::OperatorId;

/// Owns the evaluators of a search run.
///
/// Since every evaluator only depends on evaluators with a smaller id, the evaluator being
/// computed can be borrowed mutably together with all of its dependencies.
#[derive(Debug, Default)]
pub struct EvaluatorStore {
    evaluators: KeyedVec<EvaluatorId, Box<dyn Evaluator>>,
}

impl EvaluatorStore {
    pub fn add(&mut self, evaluator: impl Evaluator + 'static) -> EvaluatorId {
        self.add_boxed(Box::new(evaluator))
    }

    pub fn add_boxed(&mut self, evaluator: Box<dyn Evaluator>) -> EvaluatorId {
        let id = EvaluatorId::create_from_index(self.evaluators.len());
        sprout_assert_simple!(
            evaluator.dependencies().iter().all(|dependency| *dependency < id),
            "{} depends on an evaluator which is not in the store yet",
            evaluator.name()
        );
        self.evaluators.push(evaluator)
    }

    pub fn get(&self, evaluator: EvaluatorId) -> &dyn Evaluator {
        self.evaluators[evaluator].as_ref()
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    /// The result of `evaluator` in the given context, computing it if necessary.
    pub fn evaluate(
        &mut self,
        evaluator: EvaluatorId,
        context: &mut EvaluationContext<'_>,
    ) -> EvaluationResult {
        evaluate_in(self.evaluators.as_mut_slice(), evaluator, context)
    }

    pub fn value(&mut self, evaluator: EvaluatorId, context: &mut EvaluationContext<'_>) -> i32 {
        self.evaluate(evaluator, context).value()
    }

    pub fn is_infinite(
        &mut self,
        evaluator: EvaluatorId,
        context: &mut EvaluationContext<'_>,
    ) -> bool {
        self.evaluate(evaluator, context).is_infinite()
    }

    pub fn notify_initial_state(&mut self, initial_state: &State) {
        for evaluator in self.evaluators.as_mut_slice() {
            evaluator.notify_initial_state(initial_state);
        }
    }

    pub fn notify_state_transition(&mut self, parent: &State, op: OperatorId, state: &State) {
        for evaluator in self
            .evaluators
            .as_mut_slice()
            .iter_mut()
            .filter(|evaluator| evaluator.is_path_dependent())
        {
            evaluator.notify_state_transition(parent, op, state);
        }
    }
}

/// The evaluators an evaluator may use while it is being computed.
#[derive(Debug)]
pub struct Dependencies<'a> {
    evaluators: &'a mut [Box<dyn Evaluator>],
}

impl Dependencies<'_> {
    #[cfg(test)]
    pub(crate) fn none() -> Dependencies<'static> {
        Dependencies {
            evaluators: &mut [],
        }
    }

    pub fn evaluate(
        &mut self,
        evaluator: EvaluatorId,
        context: &mut EvaluationContext<'_>,
    ) -> EvaluationResult {
        sprout_assert_simple!(
            evaluator.index() < self.evaluators.len(),
            "evaluator {evaluator} is not a dependency"
        );
        evaluate_in(self.evaluators, evaluator, context)
    }
}

fn evaluate_in(
    evaluators: &mut [Box<dyn Evaluator>],
    evaluator: EvaluatorId,
    context: &mut EvaluationContext<'_>,
) -> EvaluationResult {
    if let Some(result) = context.cached_result(evaluator) {
        return result.clone();
    }

    let (lower, rest) = evaluators.split_at_mut(evaluator.index());
    let mut dependencies = Dependencies { evaluators: lower };
    let result = rest[0].compute_result(context, &mut dependencies);

    context.store_result(evaluator, result.clone());
    result
}
