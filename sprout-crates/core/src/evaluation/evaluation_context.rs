use super::EvaluationResult;
use super::EvaluatorId;
use crate::containers::HashMap;
use crate::proof::ProofSession;
use crate::state::State;

/// Everything an evaluator may look at when evaluating a search node, together with the results
/// computed for it so far.
///
/// A context is created per node; evaluating the same evaluator twice on one context returns the
/// stored result.
#[derive(Debug)]
pub struct EvaluationContext<'a> {
    state: State,
    g: i32,
    is_preferred: bool,
    calculate_preferred: bool,
    cache: HashMap<EvaluatorId, EvaluationResult>,
    /// The number of results which were counted as evaluations.
    evaluations: u64,
    proof: &'a mut ProofSession,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        state: State,
        g: i32,
        is_preferred: bool,
        proof: &'a mut ProofSession,
    ) -> EvaluationContext<'a> {
        EvaluationContext {
            state,
            g,
            is_preferred,
            calculate_preferred: false,
            cache: HashMap::default(),
            evaluations: 0,
            proof,
        }
    }

    /// Also ask the evaluators for preferred operators. Evaluators then bypass their caches.
    pub fn with_preferred_operators(mut self, calculate_preferred: bool) -> EvaluationContext<'a> {
        self.calculate_preferred = calculate_preferred;
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn g(&self) -> i32 {
        self.g
    }

    /// Whether the node was reached with a preferred operator.
    pub fn is_preferred(&self) -> bool {
        self.is_preferred
    }

    pub fn calculate_preferred(&self) -> bool {
        self.calculate_preferred
    }

    pub fn proof(&mut self) -> &mut ProofSession {
        self.proof
    }

    pub fn num_evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn cached_result(&self, evaluator: EvaluatorId) -> Option<&EvaluationResult> {
        self.cache.get(&evaluator)
    }

    pub(crate) fn store_result(&mut self, evaluator: EvaluatorId, result: EvaluationResult) {
        if result.count_evaluation() {
            self.evaluations += 1;
        }
        let _ = self.cache.insert(evaluator, result);
    }
}
