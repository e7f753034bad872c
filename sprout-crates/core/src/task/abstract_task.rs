use std::fmt::Debug;

use super::Axiom;
use super::FactPair;
use super::MutexGroup;
use super::Operator;
use super::OperatorId;
use super::Variable;
use crate::containers::StorageKey;

/// The capability surface through which every component queries a task.
///
/// All queries are read-only; a task is immutable for the duration of a search.
pub trait AbstractTask: Debug {
    fn variables(&self) -> &[Variable];
    fn operators(&self) -> &[Operator];
    fn axioms(&self) -> &[Axiom];
    fn goals(&self) -> &[FactPair];
    fn initial_state_values(&self) -> &[usize];
    fn mutex_groups(&self) -> &[MutexGroup];

    /// The cost of applying `op`, which decorated tasks may change.
    fn operator_cost(&self, op: OperatorId) -> i32 {
        self.operators()[op.index()].cost
    }

    fn num_variables(&self) -> usize {
        self.variables().len()
    }

    fn domain_size(&self, var: usize) -> usize {
        self.variables()[var].domain_size
    }

    fn num_operators(&self) -> usize {
        self.operators().len()
    }

    fn operator(&self, op: OperatorId) -> &Operator {
        &self.operators()[op.index()]
    }

    fn operator_ids(&self) -> Box<dyn Iterator<Item = OperatorId> + '_> {
        Box::new((0..self.num_operators()).map(OperatorId::new))
    }

    /// Whether the two facts can never hold at the same time.
    fn are_facts_mutex(&self, first: FactPair, second: FactPair) -> bool {
        if first.var == second.var {
            return first.value != second.value;
        }

        self.mutex_groups().iter().any(|group| {
            group.facts.contains(&first) && group.facts.contains(&second)
        })
    }

    /// Convert the values of a state of an ancestor task into values of this task.
    ///
    /// Decorations which keep the variables of their parent leave states untouched.
    fn convert_ancestor_state_values(&self, values: &[usize]) -> Vec<usize> {
        values.to_vec()
    }
}
