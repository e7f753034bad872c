use crate::task::FactPair;
use crate::task::OperatorId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LandmarkKind {
    /// A single fact.
    Atomic,
    /// At least one of the facts.
    Disjunctive,
    /// All of the facts at the same time.
    Conjunctive,
}

/// A formula over facts which holds at some point of every plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Landmark {
    pub facts: Vec<FactPair>,
    pub kind: LandmarkKind,
    /// Whether the landmark has to hold in every goal state.
    pub is_true_in_goal: bool,
    /// Whether some fact of the landmark is derived by axioms.
    pub is_derived: bool,
    /// Operators which make the landmark true.
    pub possible_achievers: Vec<OperatorId>,
}

impl Landmark {
    pub fn atomic(fact: FactPair, is_true_in_goal: bool) -> Landmark {
        Landmark {
            facts: vec![fact],
            kind: LandmarkKind::Atomic,
            is_true_in_goal,
            is_derived: false,
            possible_achievers: Vec::new(),
        }
    }

    pub fn is_true_in_state(&self, values: &[usize]) -> bool {
        let holds = |fact: &FactPair| values[fact.var] == fact.value;
        match self.kind {
            LandmarkKind::Atomic | LandmarkKind::Disjunctive => self.facts.iter().any(holds),
            LandmarkKind::Conjunctive => self.facts.iter().all(holds),
        }
    }
}
