use std::rc::Rc;

use super::properties;
use super::AbstractTask;
use super::Axiom;
use super::FactPair;
use super::MutexGroup;
use super::Operator;
use super::OperatorId;
use super::Variable;

/// How operator costs are interpreted.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OperatorCost {
    /// The costs of the task.
    #[default]
    Normal,
    /// Every operator costs one.
    One,
    /// Every operator costs one more than in the task, unless the task is unit cost.
    PlusOne,
}

impl OperatorCost {
    /// The cost of an operator with `cost` under this interpretation.
    pub fn adjust(self, cost: i32, is_unit_cost: bool) -> i32 {
        match self {
            OperatorCost::Normal => cost,
            OperatorCost::One => 1,
            OperatorCost::PlusOne if is_unit_cost => 1,
            OperatorCost::PlusOne => cost + 1,
        }
    }
}

/// A task which is identical to its parent apart from the operator costs.
#[derive(Debug)]
pub struct CostAdaptedTask {
    parent: Rc<dyn AbstractTask>,
    cost_type: OperatorCost,
    parent_is_unit_cost: bool,
}

impl CostAdaptedTask {
    pub fn new(parent: Rc<dyn AbstractTask>, cost_type: OperatorCost) -> CostAdaptedTask {
        let parent_is_unit_cost = properties::is_unit_cost(parent.as_ref());

        CostAdaptedTask {
            parent,
            cost_type,
            parent_is_unit_cost,
        }
    }
}

impl AbstractTask for CostAdaptedTask {
    fn variables(&self) -> &[Variable] {
        self.parent.variables()
    }

    fn operators(&self) -> &[Operator] {
        self.parent.operators()
    }

    fn axioms(&self) -> &[Axiom] {
        self.parent.axioms()
    }

    fn goals(&self) -> &[FactPair] {
        self.parent.goals()
    }

    fn initial_state_values(&self) -> &[usize] {
        self.parent.initial_state_values()
    }

    fn mutex_groups(&self) -> &[MutexGroup] {
        self.parent.mutex_groups()
    }

    fn operator_cost(&self, op: OperatorId) -> i32 {
        self.cost_type
            .adjust(self.parent.operator_cost(op), self.parent_is_unit_cost)
    }

    fn convert_ancestor_state_values(&self, values: &[usize]) -> Vec<usize> {
        self.parent.convert_ancestor_state_values(values)
    }
}
