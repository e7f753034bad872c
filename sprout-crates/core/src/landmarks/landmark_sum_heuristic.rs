use std::rc::Rc;

use log::debug;

use super::goal_landmarks;
use super::Landmark;
use crate::containers::OrderedSet;
use crate::evaluation::Heuristic;
use crate::evaluation::INFINITY;
use crate::proof::ProofSession;
use crate::state::State;
use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::OperatorId;

/// Sums the cost of the cheapest achiever of every goal landmark which does not hold in a state.
///
/// Operators achieving several landmarks are counted once per landmark, so the estimate is not
/// admissible. Applicable achievers are reported as preferred operators.
#[derive(Debug)]
pub struct LandmarkSumHeuristic {
    task: Rc<dyn AbstractTask>,
    landmarks: Vec<Landmark>,
    /// The cost of the cheapest achiever of each landmark, [`INFINITY`] if it has none.
    min_achiever_costs: Vec<i32>,
}

impl LandmarkSumHeuristic {
    pub fn new(task: Rc<dyn AbstractTask>) -> LandmarkSumHeuristic {
        debug!("Initializing landmark sum heuristic...");
        let landmarks = goal_landmarks(task.as_ref());
        let min_achiever_costs = landmarks
            .iter()
            .map(|landmark| {
                landmark
                    .possible_achievers
                    .iter()
                    .map(|&op| task.operator_cost(op))
                    .min()
                    .unwrap_or(INFINITY)
            })
            .collect();

        LandmarkSumHeuristic {
            task,
            landmarks,
            min_achiever_costs,
        }
    }
}

impl Heuristic for LandmarkSumHeuristic {
    fn name(&self) -> &str {
        "lmsum"
    }

    fn dead_ends_are_reliable(&self) -> bool {
        true
    }

    fn compute_heuristic(
        &mut self,
        state: &State,
        preferred: &mut OrderedSet<OperatorId>,
        _: &mut ProofSession,
    ) -> i32 {
        let values = self.task.convert_ancestor_state_values(state.values());

        let mut h = 0_i32;
        for (landmark, &cost) in self.landmarks.iter().zip(&self.min_achiever_costs) {
            if landmark.is_true_in_state(&values) {
                continue;
            }
            if cost == INFINITY {
                return INFINITY;
            }
            h = h.saturating_add(cost);

            for &op in &landmark.possible_achievers {
                if properties::is_applicable(self.task.operator(op), &values) {
                    let _ = preferred.insert(op);
                }
            }
        }
        h
    }
}
