use std::fmt::Display;
use std::fmt::Formatter;

use super::AbstractTask;
use crate::containers::StorageKey;

/// The assignment of `value` to the variable with index `var`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactPair {
    pub var: usize,
    pub value: usize,
}

impl FactPair {
    pub const fn new(var: usize, value: usize) -> FactPair {
        FactPair { var, value }
    }
}

impl Display for FactPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.var, self.value)
    }
}

/// The index of an operator in its task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorId(u32);

impl OperatorId {
    pub fn new(index: usize) -> OperatorId {
        OperatorId::create_from_index(index)
    }
}

impl StorageKey for OperatorId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        OperatorId(index as u32)
    }
}

impl Display for OperatorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub domain_size: usize,
    /// The layer in which the variable is derived by axioms, `None` for state variables.
    pub axiom_layer: Option<usize>,
    /// Human readable names of the values, e.g. `Atom at(truck, depot)`.
    pub fact_names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Effect {
    pub fact: FactPair,
    /// The effect only fires if all of these hold in the state the operator is applied in.
    pub conditions: Vec<FactPair>,
}

impl Effect {
    pub fn unconditional(fact: FactPair) -> Effect {
        Effect {
            fact,
            conditions: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operator {
    pub name: String,
    pub preconditions: Vec<FactPair>,
    pub effects: Vec<Effect>,
    pub cost: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Axiom {
    pub conditions: Vec<FactPair>,
    pub effect: FactPair,
}

/// A set of facts of which at most one can be true in any reachable state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutexGroup {
    pub facts: Vec<FactPair>,
}

/// The root task, as it was read from its input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanningTask {
    pub variables: Vec<Variable>,
    pub mutex_groups: Vec<MutexGroup>,
    pub operators: Vec<Operator>,
    pub axioms: Vec<Axiom>,
    pub initial_state: Vec<usize>,
    pub goals: Vec<FactPair>,
    /// Whether the task uses action costs; otherwise every operator costs one.
    pub use_metric: bool,
}

impl AbstractTask for PlanningTask {
    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn operators(&self) -> &[Operator] {
        &self.operators
    }

    fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    fn goals(&self) -> &[FactPair] {
        &self.goals
    }

    fn initial_state_values(&self) -> &[usize] {
        &self.initial_state
    }

    fn mutex_groups(&self) -> &[MutexGroup] {
        &self.mutex_groups
    }
}
