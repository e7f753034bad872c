use std::fmt::Display;
use std::fmt::Formatter;
use std::rc::Rc;

use pbp_format::sanitize_name;
use pbp_format::Constraint;
use pbp_format::Literal;

use crate::sprout_assert_simple;
use crate::state::StateId;
use crate::task::FactPair;
use crate::task::OperatorId;

/// Whether a name refers to the state before (current) or after (primed) a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Current,
    Primed,
}

impl Tag {
    pub const BOTH: [Tag; 2] = [Tag::Current, Tag::Primed];
}

/// The comparison encoded by a cost delta between the current and primed spent bit-vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeltaComparison {
    Equal,
    AtLeast,
    AtMost,
}

/// A boolean variable of the certificate, before the current/primed distinction is applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProofName {
    /// `var = value` holds.
    Fact(FactPair),
    /// Bit `i` of the cost spent so far.
    SpentBit(u32),
    /// Bit `i` of the cost budget, which is fixed to the optimal cost once it is known.
    BudgetBit(u32),
    /// The cost spent so far is at least `x`.
    SpentGeq(i64),
    /// The budget minus the cost spent so far is at most `x`.
    BalanceLeq(i64),
    /// The state variables have exactly the values of the given state.
    State(StateId),
    /// The state is the given one and at least `g` has been spent.
    Node { state: StateId, g: i32 },
    /// The state is no goal and the balance is at most `bound`. Every such state needs at
    /// least `bound` more cost, which is what the estimates of `evaluator` rest on.
    Phi { evaluator: Rc<str>, bound: i64 },
    /// The state lies in the abstract state `index` of a pattern database.
    AbstractState { pattern: Rc<str>, index: usize },
    /// The state lies in abstract state `index` and the balance is at most its goal distance
    /// `distance`.
    AbstractNode {
        pattern: Rc<str>,
        index: usize,
        distance: i32,
    },
    /// Some abstract state of the pattern holds whose goal distance is at least the balance.
    DeadSet { pattern: Rc<str> },
    Invariant,
    Operator(OperatorId),
    /// The conditions of effect `effect` of an operator hold.
    EffectCondition { op: OperatorId, effect: usize },
    /// The variable keeps its value during the transition.
    Frame(usize),
    DeltaCost {
        comparison: DeltaComparison,
        cost: i32,
    },
    Transition,
    InitialState,
    Goal,
}

impl ProofName {
    /// Whether the name describes a single state, and therefore has a primed counterpart.
    pub fn is_state_dependent(&self) -> bool {
        !matches!(
            self,
            ProofName::BudgetBit(_)
                | ProofName::Operator(_)
                | ProofName::EffectCondition { .. }
                | ProofName::Frame(_)
                | ProofName::DeltaCost { .. }
                | ProofName::Transition
                | ProofName::InitialState
        )
    }

    pub fn tagged(self, tag: Tag) -> TaggedName {
        sprout_assert_simple!(
            tag == Tag::Current || self.is_state_dependent(),
            "{self:?} has no primed counterpart"
        );
        TaggedName { name: self, tag }
    }

    pub fn current(self) -> TaggedName {
        self.tagged(Tag::Current)
    }

    pub fn primed(self) -> TaggedName {
        self.tagged(Tag::Primed)
    }
}

impl Display for ProofName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofName::Fact(fact) => write!(f, "var_{}_{}", fact.var, fact.value),
            ProofName::SpentBit(bit) => write!(f, "e_{bit}"),
            ProofName::BudgetBit(bit) => write!(f, "b_{bit}"),
            ProofName::SpentGeq(x) => write!(f, "spent_geq_{x}"),
            ProofName::BalanceLeq(x) => write!(f, "balance_leq_{x}"),
            ProofName::State(state) => write!(f, "state[{state}]"),
            ProofName::Node { state, g } => write!(f, "node[{state}]_{g}"),
            ProofName::Phi { evaluator, bound } => {
                write!(f, "phi_{}_{bound}", sanitize_name(evaluator))
            }
            ProofName::AbstractState { pattern, index } => write!(f, "a_{pattern}[{index}]"),
            ProofName::AbstractNode {
                pattern,
                index,
                distance,
            } => write!(f, "a_{pattern}[{index}]_dist_{distance}"),
            ProofName::DeadSet { pattern } => write!(f, "dead_{pattern}"),
            ProofName::Invariant => write!(f, "invar"),
            ProofName::Operator(op) => write!(f, "op_{op}"),
            ProofName::EffectCondition { op, effect } => write!(f, "op_{op}_effcond_{effect}"),
            ProofName::Frame(var) => write!(f, "frame_var_{var}"),
            ProofName::DeltaCost { comparison, cost } => {
                let comparison = match comparison {
                    DeltaComparison::Equal => "eq",
                    DeltaComparison::AtLeast => "geq",
                    DeltaComparison::AtMost => "leq",
                };
                write!(f, "delta_cost_{comparison}_{cost}")
            }
            ProofName::Transition => write!(f, "transition"),
            ProofName::InitialState => write!(f, "s_init"),
            ProofName::Goal => write!(f, "goal"),
        }
    }
}

/// A [`ProofName`] together with its [`Tag`]; this is what appears in the proof.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaggedName {
    name: ProofName,
    tag: Tag,
}

impl TaggedName {
    pub fn name(&self) -> &ProofName {
        &self.name
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn positive(self) -> ProofLiteral {
        Literal::positive(self)
    }

    pub fn negative(self) -> ProofLiteral {
        Literal::negative(self)
    }

    /// The label of the step which introduces the given direction of this name's definition.
    pub(crate) fn label(&self, direction: Direction) -> String {
        match direction {
            Direction::Right => format!("{self}_Rreif"),
            Direction::Left => format!("{self}_Lreif"),
        }
    }
}

impl Display for TaggedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.tag {
            Tag::Current => write!(f, "{}", self.name),
            Tag::Primed => write!(f, "prime^{}", self.name),
        }
    }
}

/// The two directions of a definition `R ⇔ C`: `R → C` (right) and `C → R` (left).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Right,
    Left,
}

pub type ProofLiteral = Literal<TaggedName>;
pub type ProofConstraint = Constraint<TaggedName>;
