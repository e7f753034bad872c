use std::rc::Rc;

use log::debug;

use super::Heuristic;
use crate::containers::OrderedSet;
use crate::proof::EstimateCertificate;
use crate::proof::ProofSession;
use crate::state::State;
use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::OperatorId;

/// Estimates 0 for goal states and the cheapest operator cost for every other state.
#[derive(Debug)]
pub struct BlindSearchHeuristic {
    task: Rc<dyn AbstractTask>,
    min_operator_cost: i32,
}

impl BlindSearchHeuristic {
    pub fn new(task: Rc<dyn AbstractTask>) -> BlindSearchHeuristic {
        debug!("Initializing blind search heuristic...");
        let min_operator_cost = properties::min_operator_cost(task.as_ref());

        BlindSearchHeuristic {
            task,
            min_operator_cost,
        }
    }
}

impl Heuristic for BlindSearchHeuristic {
    fn name(&self) -> &str {
        "blind"
    }

    fn compute_heuristic(
        &mut self,
        state: &State,
        _: &mut OrderedSet<OperatorId>,
        proof: &mut ProofSession,
    ) -> i32 {
        let h = if properties::is_goal_state(self.task.as_ref(), state.values()) {
            0
        } else {
            self.min_operator_cost
        };

        proof.certify_estimate(state, h, EstimateCertificate::MinimumCost { evaluator: "blind" });
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EvaluationContext;
    use crate::evaluation::EvaluatorStore;
    use crate::evaluation::HeuristicEvaluator;
    use crate::state::StateRegistry;
    use crate::task::test_tasks;
    use crate::task::FactPair;

    fn initial_estimate(task: crate::task::PlanningTask) -> i32 {
        let task: Rc<dyn AbstractTask> = Rc::new(task);
        let mut registry = StateRegistry::new(Rc::clone(&task));
        let initial_state = registry.initial_state();

        let mut store = EvaluatorStore::default();
        let blind = store.add(HeuristicEvaluator::new(BlindSearchHeuristic::new(task)));

        let mut proof = ProofSession::default();
        let mut context = EvaluationContext::new(initial_state, 0, false, &mut proof);
        store.value(blind, &mut context)
    }

    #[test]
    fn goal_state_is_estimated_at_zero() {
        let mut task = test_tasks::line(4);
        task.goals = vec![FactPair::new(0, 0)];

        assert_eq!(0, initial_estimate(task));
    }

    #[test]
    fn other_states_get_the_cheapest_operator_cost() {
        let mut task = test_tasks::line(4);
        for operator in task.operators.iter_mut() {
            operator.cost = 4;
        }

        assert_eq!(4, initial_estimate(task));
    }
}
