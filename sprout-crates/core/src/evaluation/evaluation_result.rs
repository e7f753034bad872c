use super::INFINITY;
use crate::task::OperatorId;

/// The outcome of evaluating one evaluator on one state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationResult {
    value: i32,
    /// Operators the evaluator considers promising in the state, without duplicates.
    preferred_operators: Vec<OperatorId>,
    /// Whether the evaluation did work that should be counted in the statistics, i.e. was not
    /// answered from a cache or computed from other evaluators.
    count_evaluation: bool,
}

impl EvaluationResult {
    pub fn new(value: i32) -> EvaluationResult {
        EvaluationResult {
            value,
            preferred_operators: Vec::new(),
            count_evaluation: false,
        }
    }

    pub fn infinite() -> EvaluationResult {
        EvaluationResult::new(INFINITY)
    }

    pub fn with_count_evaluation(mut self, count_evaluation: bool) -> EvaluationResult {
        self.count_evaluation = count_evaluation;
        self
    }

    pub fn with_preferred_operators(mut self, preferred: Vec<OperatorId>) -> EvaluationResult {
        self.preferred_operators = preferred;
        self
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_infinite(&self) -> bool {
        self.value == INFINITY
    }

    pub fn preferred_operators(&self) -> &[OperatorId] {
        &self.preferred_operators
    }

    pub fn count_evaluation(&self) -> bool {
        self.count_evaluation
    }
}
