use std::fmt::Display;
use std::fmt::Formatter;

use crate::pdbs::GreedyPatternOptions;

/// The explicit identifier of a component within a [`super::SearchConfiguration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

impl Display for ComponentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the pattern of a single pattern database is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternSpec {
    Manual(Vec<usize>),
    Greedy(GreedyPatternOptions),
}

/// The description of an evaluator. Evaluators built from other evaluators refer to them by
/// their [`ComponentId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentSpec {
    G,
    Blind,
    LandmarkSum,
    Pdb(PatternSpec),
    /// The maximum over the pattern databases of the combo pattern collection.
    ComboPdbs(GreedyPatternOptions),
    Weighted {
        evaluator: ComponentId,
        weight: i32,
    },
    Sum(Vec<ComponentId>),
    Max(Vec<ComponentId>),
}

impl ComponentSpec {
    pub fn product_name(&self) -> &'static str {
        match self {
            ComponentSpec::G => "g evaluator",
            ComponentSpec::Blind => "blind search heuristic",
            ComponentSpec::LandmarkSum => "landmark sum heuristic",
            ComponentSpec::Pdb(_) => "pattern database heuristic",
            ComponentSpec::ComboPdbs(_) => "combo pattern database heuristic",
            ComponentSpec::Weighted { .. } => "weighted evaluator",
            ComponentSpec::Sum(_) => "sum evaluator",
            ComponentSpec::Max(_) => "max evaluator",
        }
    }
}

/// The description of the open list of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenListSpec {
    BestFirst(ComponentId),
    TieBreaking {
        evaluators: Vec<ComponentId>,
        allow_unsafe_pruning: bool,
    },
    /// Picks at random among the entries which no other entry beats on every evaluator.
    Pareto {
        evaluators: Vec<ComponentId>,
        preferred_only: bool,
        state_uniform_selection: bool,
        random_seed: u64,
    },
}
