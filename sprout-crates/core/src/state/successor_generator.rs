use super::State;
use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::OperatorId;

/// Enumerates the operators applicable in a state.
///
/// Operators are bucketed by their first precondition, so only operators whose first
/// precondition holds are checked in full.
#[derive(Debug)]
pub struct SuccessorGenerator {
    /// Operators without preconditions.
    unconditional: Vec<OperatorId>,
    /// `by_first_precondition[var][value]` lists the operators whose first precondition is
    /// `var = value`.
    by_first_precondition: Vec<Vec<Vec<OperatorId>>>,
}

impl SuccessorGenerator {
    pub fn new(task: &dyn AbstractTask) -> SuccessorGenerator {
        let mut by_first_precondition: Vec<Vec<Vec<OperatorId>>> = task
            .variables()
            .iter()
            .map(|variable| vec![Vec::new(); variable.domain_size])
            .collect();
        let mut unconditional = Vec::new();

        for op in task.operator_ids() {
            match task.operator(op).preconditions.first() {
                Some(pre) => by_first_precondition[pre.var][pre.value].push(op),
                None => unconditional.push(op),
            }
        }

        SuccessorGenerator {
            unconditional,
            by_first_precondition,
        }
    }

    /// Collects the applicable operators of `state` into `applicable`, in increasing id order.
    pub fn generate_applicable_ops(
        &self,
        task: &dyn AbstractTask,
        state: &State,
        applicable: &mut Vec<OperatorId>,
    ) {
        applicable.extend(self.unconditional.iter().copied());

        for (var, &value) in state.values().iter().enumerate() {
            applicable.extend(
                self.by_first_precondition[var][value]
                    .iter()
                    .copied()
                    .filter(|&op| properties::is_applicable(task.operator(op), state.values())),
            );
        }

        applicable.sort_unstable();
    }
}
