use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;

use enum_map::Enum;
use enum_map::EnumMap;
use itertools::Itertools;
use log::debug;
use log::info;
use log::warn;
use pbp_format::steps::PolItem;
use pbp_format::writer::ProofWriter;
use pbp_format::Term;
use pbp_format::META_MARKER;

use super::encoding::bireify;
use super::encoding::conjunction;
use super::encoding::disjunction;
use super::encoding::BitWidth;
use super::names::DeltaComparison;
use super::names::Direction;
use super::names::ProofConstraint;
use super::names::ProofLiteral;
use super::names::ProofName;
use super::names::Tag;
use super::names::TaggedName;
use super::task_encoding::encode_task;
use super::task_encoding::write_opb;
use super::AbstractionEncoding;
use super::EstimateCertificate;
use super::ProofError;
use super::META_FILE;
use super::PROOF_FILE;
use super::TASK_FILE;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::evaluation::INFINITY;
use crate::state::State;
use crate::state::StateId;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::FactPair;
use crate::task::OperatorId;

/// The files the proof is spread over, in the order in which they are assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Enum)]
enum ProofPart {
    Header,
    Budget,
    Reifications,
    Invariant,
    InvariantRight,
    InvariantLeft,
    InvariantPrimeRight,
    InvariantPrimeLeft,
    Derivations,
}

impl ProofPart {
    fn file_name(self) -> &'static str {
        match self {
            ProofPart::Header => "header.prooflog",
            ProofPart::Budget => "budget.prooflog",
            ProofPart::Reifications => "reifications.prooflog",
            ProofPart::Invariant => "invariant.prooflog",
            ProofPart::InvariantRight => "invariant_right.prooflog",
            ProofPart::InvariantLeft => "invariant_left.prooflog",
            ProofPart::InvariantPrimeRight => "invariant_prime_right.prooflog",
            ProofPart::InvariantPrimeLeft => "invariant_prime_left.prooflog",
            ProofPart::Derivations => "derivations.prooflog",
        }
    }
}

/// The four halves of the invariant definition, which are streamed while the search runs.
const INVARIANT_HALVES: [(ProofPart, Tag, Direction); 4] = [
    (ProofPart::InvariantRight, Tag::Current, Direction::Right),
    (ProofPart::InvariantLeft, Tag::Current, Direction::Left),
    (ProofPart::InvariantPrimeRight, Tag::Primed, Direction::Right),
    (ProofPart::InvariantPrimeLeft, Tag::Primed, Direction::Left),
];

create_statistics_struct!(
    /// Sizes of the certificate.
    ProofStatistics {
        definitions: u64,
        expanded_nodes: u64,
        certified_estimates: u64,
        derivations: u64,
});

/// An expanded node together with the successors generated for it. Its transitions can only be
/// justified once the optimal cost is known.
#[derive(Clone, Debug)]
struct Expansion {
    node: ProofName,
    g: i32,
    successors: Vec<(OperatorId, StateId)>,
}

/// A lower bound on the remaining cost of a state, in the form of an invariant term.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Estimate {
    /// Holds in the state once the balance is at most `balance`.
    term: ProofName,
    /// `None` if the term holds regardless of the balance, i.e. the state is a dead end.
    balance: Option<i64>,
}

/// The certificate shows that `invar` holds in the initial state with the full budget, that it
/// is closed under transitions, and that it only admits goal states once the budget is spent.
///
/// The terms of `invar` are the expanded nodes, `balance_leq_0`, and the certificates of the
/// heuristics. A node `node[s]_g` states that `s` was reached having spent at least `g`; its
/// transitions are justified once the budget is fixed, because only then it is known which
/// successors may fall back to `balance_leq_0`.
#[derive(Debug)]
pub(super) struct SessionImpl {
    directory: PathBuf,
    width: BitWidth,
    sinks: EnumMap<ProofPart, Option<ProofWriter<File>>>,
    /// Every name which has been defined so far, so that each is defined exactly once.
    defined: HashSet<TaggedName>,
    /// The labels of the derived lemmas, so that each is derived exactly once.
    lemmas: HashSet<String>,
    statistics: ProofStatistics,
    degraded: bool,
    compress: bool,

    operator_costs: KeyedVec<OperatorId, i32>,
    min_operator_cost: Option<i32>,
    /// For every operator cost `c`, the formula id of the right direction of `delta_cost_geq_c`.
    delta_at_least: HashMap<i32, u64>,
    initial_state: Vec<usize>,
    goals: Vec<FactPair>,

    num_terms: u64,
    expansions: Vec<Expansion>,
    /// The lowest cost with which each state was expanded.
    cheapest_expansion: HashMap<StateId, i32>,
    initial_state_expanded: bool,
    estimates: HashMap<StateId, Vec<Estimate>>,
    /// The goal distances of every certified abstraction, by name.
    abstractions: HashMap<Rc<str>, Vec<i32>>,
}

impl SessionImpl {
    pub(super) fn create(directory: &Path, task: &dyn AbstractTask) -> std::io::Result<SessionImpl> {
        fs::create_dir_all(directory)?;

        let width = BitWidth::for_task(task.num_variables(), properties::max_operator_cost(task));
        let encoding = encode_task(task, width);
        write_opb(
            &encoding.constraints,
            BufWriter::new(File::create(directory.join(TASK_FILE))?),
        )?;

        let mut degraded = false;
        let sinks = EnumMap::from_fn(|part: ProofPart| {
            match File::create(directory.join(part.file_name())) {
                Ok(file) => Some(ProofWriter::new(file)),
                Err(error) => {
                    warn!("Failed to create {}: {error}", part.file_name());
                    degraded = true;
                    None
                }
            }
        });

        let mut operator_costs = KeyedVec::default();
        for op in task.operator_ids() {
            let _ = operator_costs.push(task.operator_cost(op));
        }

        let mut session = SessionImpl {
            directory: directory.to_path_buf(),
            width,
            sinks,
            defined: HashSet::default(),
            lemmas: HashSet::default(),
            statistics: ProofStatistics::default(),
            degraded,
            compress: false,
            min_operator_cost: operator_costs.iter().copied().min(),
            operator_costs,
            delta_at_least: encoding.delta_at_least,
            initial_state: task.initial_state_values().to_vec(),
            goals: task.goals().to_vec(),
            num_terms: 0,
            expansions: Vec::new(),
            cheapest_expansion: HashMap::default(),
            initial_state_expanded: false,
            estimates: HashMap::default(),
            abstractions: HashMap::default(),
        };

        let num_constraints = encoding.constraints.len() as u64;
        session.write(ProofPart::Header, |writer| {
            writer.log_header()?;
            writer.log_load_formula(Some(num_constraints))
        });

        for (part, tag, direction) in INVARIANT_HALVES {
            let label = ProofName::Invariant.tagged(tag).label(direction);
            session.write(part, |writer| writer.begin_redundance(label));
        }

        if let Err(error) = properties::verify_no_axioms(task, "certificates") {
            session.degrade(error.to_string());
        }

        // The task encoding only describes the goal before a transition.
        let goals = session.goals.clone();
        session.define(ProofPart::Reifications, ProofName::Goal.primed(), || {
            facts(goals.into_iter(), Tag::Primed)
        });

        session.log_cost_floor();
        session.add_sink();

        debug!(
            "Writing the certificate to {} with {}-bit cost vectors",
            directory.display(),
            width.bits()
        );

        Ok(session)
    }

    pub(super) fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    pub(super) fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub(super) fn bit_width(&self) -> BitWidth {
        self.width
    }

    pub(super) fn mark_incomplete(&mut self, reason: String) {
        self.degrade(reason);
    }

    pub(super) fn log_expansion(
        &mut self,
        state: &State,
        g: i32,
        successors: &[(OperatorId, StateId)],
    ) {
        if self.goals.iter().all(|goal| state.values()[goal.var] == goal.value) {
            self.degrade(format!("the goal state state[{}] was expanded", state.id()));
            return;
        }

        let is_new = !self.defined.contains(
            &ProofName::Node {
                state: state.id(),
                g,
            }
            .current(),
        );
        let Some(node) = self.node(state, g) else {
            return;
        };

        if is_new {
            self.add_invariant_term(&node);
        }
        self.statistics.expanded_nodes += 1;

        let cheapest = self.cheapest_expansion.entry(state.id()).or_insert(g);
        *cheapest = (*cheapest).min(g);
        if g == 0 && state.values() == self.initial_state.as_slice() {
            self.initial_state_expanded = true;
        }

        self.expansions.push(Expansion {
            node,
            g,
            successors: successors.to_vec(),
        });
    }

    pub(super) fn certify_estimate(
        &mut self,
        state: &State,
        h: i32,
        certificate: EstimateCertificate<'_>,
    ) {
        let estimate = match certificate {
            // Goal states are covered by `balance_leq_0` once the budget is spent.
            EstimateCertificate::MinimumCost { .. } if h == 0 => return,
            EstimateCertificate::MinimumCost { evaluator } => self.non_goal_bound(evaluator, h),
            EstimateCertificate::Abstraction { abstraction, index } => {
                let pattern = abstraction.abstraction_name();
                let distance = self
                    .abstractions
                    .get(&pattern)
                    .and_then(|distances| distances.get(index).copied());
                match distance {
                    Some(distance) if distance == h => {
                        self.abstract_term(abstraction, index, distance)
                    }
                    _ => {
                        self.degrade(format!(
                            "the estimate {h} of abstraction {pattern} was not certified"
                        ));
                        None
                    }
                }
            }
        };
        let Some(estimate) = estimate else {
            return;
        };

        let estimates = self.estimates.entry(state.id()).or_default();
        if !estimates.contains(&estimate) {
            estimates.push(estimate);
            self.statistics.certified_estimates += 1;
        }
    }

    /// Adds `dead_P ⇔ ∨ a_P[i]_dist_d` to the invariant, where abstract state `i` lies at goal
    /// distance `d`, and shows that it is closed under transitions.
    pub(super) fn certify_abstraction(
        &mut self,
        task: &dyn AbstractTask,
        abstraction: &dyn AbstractionEncoding,
        distances: &[i32],
    ) {
        let pattern = abstraction.abstraction_name();
        if self.abstractions.contains_key(&pattern) {
            return;
        }

        self.log_comment(
            ProofPart::Derivations,
            format!(
                "abstraction {pattern} with {} abstract states",
                abstraction.num_abstract_states()
            ),
        );

        let mut terms = Vec::with_capacity(distances.len());
        for (index, &distance) in distances.iter().enumerate() {
            match self.abstract_term(abstraction, index, distance) {
                Some(term) => terms.push(term),
                None => return,
            }
        }

        let dead = ProofName::DeadSet {
            pattern: Rc::clone(&pattern),
        };
        self.define_both(ProofPart::Invariant, &dead, |tag| {
            disjunction(terms.iter().map(|term| term.term.clone().tagged(tag).positive()))
        });
        self.add_invariant_term(&dead);
        let _ = self.abstractions.insert(Rc::clone(&pattern), distances.to_vec());

        let successor_dead = || dead.clone().primed().positive();
        for (index, source) in terms.iter().enumerate() {
            for op in task.operator_ids() {
                let Some(successor) = abstraction.abstract_successor(task.operator(op), index)
                else {
                    continue;
                };

                let cost = task.operator_cost(op);
                match (source.balance, terms[successor].balance) {
                    (Some(from), Some(to)) => {
                        if !self.balance_step(from, cost, to) {
                            return;
                        }
                    }
                    (Some(_), None) | (None, None) => {}
                    (None, Some(_)) => {
                        self.degrade(format!(
                            "a_{pattern}[{index}] is a dead end with a solvable successor"
                        ));
                        return;
                    }
                }
                self.log_rup(vec![
                    source.term.clone().current().negative(),
                    ProofName::Operator(op).current().negative(),
                    successor_dead(),
                ]);
            }

            self.log_rup(vec![
                source.term.clone().current().negative(),
                ProofName::Transition.current().negative(),
                successor_dead(),
            ]);
            self.log_rup(vec![
                ProofName::Goal.current().negative(),
                source.term.clone().current().negative(),
                ProofName::BalanceLeq(0).current().positive(),
            ]);
        }

        self.log_rup(vec![
            dead.clone().current().negative(),
            ProofName::Transition.current().negative(),
            ProofName::Invariant.primed().positive(),
        ]);
        self.log_rup(vec![
            ProofName::Goal.current().negative(),
            dead.current().negative(),
            ProofName::BalanceLeq(0).current().positive(),
        ]);
    }

    pub(super) fn finalize(mut self, optimal_cost: i32) -> Result<PathBuf, ProofError> {
        let cost = i64::from(optimal_cost);
        let width = self.width;

        if !width.can_represent(cost) {
            self.degrade(format!(
                "the optimal cost {cost} does not fit in {} bits",
                width.bits()
            ));
        }

        let witness = width.budget_assignment(cost);
        self.write(ProofPart::Budget, |writer| {
            writer.log_comment(format!("the budget is fixed to the optimal cost {cost}"))?;
            writer.log_redundance(Some("budget_geq"), &width.budget_at_least(cost), &witness)?;
            writer.log_redundance(Some("budget_leq"), &width.budget_at_most(cost), &witness)
        });

        self.close_invariant(self.num_terms);
        self.log_closing_lemmas(cost);

        if let Some(writer) = self.sinks[ProofPart::Derivations].take() {
            if let Err(error) = writer.conclude() {
                self.degrade(format!("failed to conclude the derivations: {error}"));
            }
        }
        for (part, sink) in self.sinks.iter_mut() {
            if let Some(writer) = sink {
                if let Err(error) = writer.flush() {
                    warn!("Failed to flush {}: {error}", part.file_name());
                    self.degraded = true;
                }
            }
        }
        self.sinks = EnumMap::default();

        self.statistics.log(StatisticLogger::new(["proof"]));

        self.assemble()
    }

    fn log_closing_lemmas(&mut self, cost: i64) {
        let Some(spent) = self.spent_at_least(cost) else {
            return;
        };
        let Some(full) = self.balance_at_most(cost) else {
            return;
        };
        let sink = ProofName::BalanceLeq(0);
        let invariant = || ProofName::Invariant.current();
        let initial_state = || ProofName::InitialState.current();
        let goal = || ProofName::Goal.current();

        self.log_comment(ProofPart::Derivations, "consistency of the budget arithmetic");
        self.derive(
            "budget_sanity".to_owned(),
            vec![
                PolItem::Step("budget_geq".to_owned()),
                PolItem::Step("budget_leq".to_owned()),
                PolItem::Add,
            ],
        );
        self.derive(
            "spent_exhausts_budget".to_owned(),
            vec![
                definition_step(&spent, Tag::Current, Direction::Right),
                PolItem::Step("budget_leq".to_owned()),
                PolItem::Add,
                definition_step(&sink, Tag::Current, Direction::Left),
                PolItem::Add,
            ],
        );
        if self.width.can_represent(cost + 1) {
            let overspent = self.spent_at_least(cost + 1);
            let exhausted = self.balance_at_most(-1);
            if let (Some(overspent), Some(exhausted)) = (overspent, exhausted) {
                self.derive(
                    "overspent_budget".to_owned(),
                    vec![
                        definition_step(&overspent, Tag::Current, Direction::Right),
                        PolItem::Step("budget_leq".to_owned()),
                        PolItem::Add,
                        definition_step(&exhausted, Tag::Current, Direction::Left),
                        PolItem::Add,
                    ],
                );
            }
        }

        self.log_comment(
            ProofPart::Derivations,
            "the transitions of the expanded nodes stay within the invariant",
        );
        let expansions = std::mem::take(&mut self.expansions);
        for expansion in &expansions {
            self.justify_expansion(expansion, cost);
        }

        self.log_comment(ProofPart::Derivations, "the initial state satisfies the invariant");
        if cost > 0 && !self.initial_state_expanded {
            self.degrade("the initial state was never expanded".to_owned());
        }
        self.log_rup(vec![initial_state().negative(), invariant().positive()]);
        self.derive(
            "budget_full".to_owned(),
            vec![
                PolItem::Step("budget_leq".to_owned()),
                definition_step(&full, Tag::Current, Direction::Left),
                PolItem::Add,
            ],
        );
        self.log_rup(vec![
            initial_state().negative(),
            full.current().positive(),
        ]);

        self.log_comment(
            ProofPart::Derivations,
            format!("goal states satisfying the invariant have spent at least {cost}"),
        );
        self.log_rup(vec![
            goal().negative(),
            invariant().negative(),
            sink.clone().current().positive(),
        ]);
        self.derive(
            "spent_fills_budget".to_owned(),
            vec![
                definition_step(&sink, Tag::Current, Direction::Right),
                PolItem::Step("budget_geq".to_owned()),
                PolItem::Add,
                definition_step(&spent, Tag::Current, Direction::Left),
                PolItem::Add,
            ],
        );
        self.log_rup(vec![
            goal().negative(),
            invariant().negative(),
            spent.current().positive(),
        ]);

        self.log_comment(ProofPart::Derivations, "the invariant is closed under transitions");
        self.log_rup(vec![
            invariant().negative(),
            ProofName::Transition.current().negative(),
            ProofName::Invariant.primed().positive(),
        ]);
    }

    /// Shows that every transition out of the node of `expansion` leads into the invariant.
    fn justify_expansion(&mut self, expansion: &Expansion, cost: i64) {
        let node = &expansion.node;
        for &(op, successor) in &expansion.successors {
            let Some(&op_cost) = self.operator_costs.get(op) else {
                self.degrade(format!("{op} is not an operator of the task"));
                continue;
            };
            if !self.cover_successor(expansion.g, op_cost, successor, cost) {
                self.degrade(format!(
                    "the transition from {} to state[{successor}] leaves the invariant",
                    node.clone().current()
                ));
                continue;
            }
            self.log_rup(vec![
                node.clone().current().negative(),
                ProofName::Operator(op).current().negative(),
                ProofName::Invariant.primed().positive(),
            ]);
        }

        self.log_rup(vec![
            node.clone().current().negative(),
            ProofName::Transition.current().negative(),
            ProofName::Invariant.primed().positive(),
        ]);
    }

    /// Derives the lemma which puts `successor` into the invariant after a transition of cost
    /// `op_cost` out of a node with cost `g`. The successor is covered by its own expansion, by
    /// the spent budget, or by one of its estimates.
    fn cover_successor(&mut self, g: i32, op_cost: i32, successor: StateId, cost: i64) -> bool {
        let spent = i64::from(g) + i64::from(op_cost);

        if let Some(&expanded) = self.cheapest_expansion.get(&successor) {
            if i64::from(expanded) <= spent {
                return self.spent_step(g, op_cost, expanded);
            }
        }
        if spent >= cost {
            return self.budget_step(g, op_cost, 0, cost);
        }

        let Some(estimates) = self.estimates.get(&successor) else {
            return false;
        };
        if estimates.iter().any(|estimate| estimate.balance.is_none()) {
            return true;
        }
        match estimates.iter().filter_map(|estimate| estimate.balance).max() {
            Some(balance) if spent + balance >= cost => {
                self.budget_step(g, op_cost, balance, cost)
            }
            _ => false,
        }
    }

    /// `spent_geq_a ∧ delta_cost_geq_c → prime^spent_geq_b`, which holds for `b <= a + c`.
    fn spent_step(&mut self, a: i32, c: i32, b: i32) -> bool {
        if i64::from(b) > i64::from(a) + i64::from(c) {
            self.degrade(format!("spent_geq_{b} does not follow from spent_geq_{a} and {c}"));
            return false;
        }
        let Some(delta) = self.delta_at_least(c) else {
            return false;
        };

        self.derive(
            format!("spent_step_{a}_{c}_{b}"),
            vec![
                definition_step(&ProofName::SpentGeq(a.into()), Tag::Current, Direction::Right),
                PolItem::ConstraintId(delta),
                PolItem::Add,
                definition_step(&ProofName::SpentGeq(b.into()), Tag::Primed, Direction::Left),
                PolItem::Add,
            ],
        );
        true
    }

    /// `spent_geq_a ∧ delta_cost_geq_c → prime^balance_leq_k`, which holds for
    /// `a + c + k >= cost` once the budget is fixed to `cost`.
    fn budget_step(&mut self, a: i32, c: i32, k: i64, cost: i64) -> bool {
        if i64::from(a) + i64::from(c) + k < cost {
            self.degrade(format!("balance_leq_{k} does not follow from spent_geq_{a} and {c}"));
            return false;
        }
        let Some(delta) = self.delta_at_least(c) else {
            return false;
        };
        let Some(balance) = self.balance_at_most(k) else {
            return false;
        };

        self.derive(
            format!("budget_step_{a}_{c}_{k}"),
            vec![
                definition_step(&ProofName::SpentGeq(a.into()), Tag::Current, Direction::Right),
                PolItem::ConstraintId(delta),
                PolItem::Add,
                PolItem::Step("budget_leq".to_owned()),
                PolItem::Add,
                definition_step(&balance, Tag::Primed, Direction::Left),
                PolItem::Add,
            ],
        );
        true
    }

    /// `balance_leq_k ∧ delta_cost_geq_c → prime^balance_leq_j`, which holds for `j >= k - c`.
    fn balance_step(&mut self, k: i64, c: i32, j: i64) -> bool {
        if j < k - i64::from(c) {
            self.degrade(format!("balance_leq_{j} does not follow from balance_leq_{k} and {c}"));
            return false;
        }
        let Some(delta) = self.delta_at_least(c) else {
            return false;
        };
        let (Some(from), Some(to)) = (self.balance_at_most(k), self.balance_at_most(j)) else {
            return false;
        };

        self.derive(
            format!("balance_step_{k}_{c}_{j}"),
            vec![
                definition_step(&from, Tag::Current, Direction::Right),
                PolItem::ConstraintId(delta),
                PolItem::Add,
                definition_step(&to, Tag::Primed, Direction::Left),
                PolItem::Add,
            ],
        );
        true
    }

    /// `transition → delta_cost_geq_m` for the cheapest operator cost `m`.
    fn log_cost_floor(&mut self) {
        let Some(min_cost) = self.min_operator_cost else {
            return;
        };
        let Some(floor) = self.delta_at_least(min_cost) else {
            return;
        };

        self.log_comment(
            ProofPart::Derivations,
            format!("every transition costs at least {min_cost}"),
        );
        let dearer = self
            .delta_at_least
            .iter()
            .filter(|&(&cost, _)| cost > min_cost)
            .map(|(&cost, &id)| (cost, id))
            .sorted()
            .collect_vec();
        for (cost, id) in dearer {
            // The left direction directly follows the right one in the formula.
            self.derive(
                format!("delta_floor_{cost}"),
                vec![
                    PolItem::ConstraintId(id),
                    PolItem::ConstraintId(floor + 1),
                    PolItem::Add,
                ],
            );
        }
        self.log_rup(vec![
            ProofName::Transition.current().negative(),
            ProofName::DeltaCost {
                comparison: DeltaComparison::AtLeast,
                cost: min_cost,
            }
            .current()
            .positive(),
        ]);
    }

    /// Adds `balance_leq_0` to the invariant: once the budget is spent any state may follow.
    fn add_sink(&mut self) {
        let Some(sink) = self.balance_at_most(0) else {
            return;
        };
        self.add_invariant_term(&sink);
        self.close_by_balance(&sink, 0);
    }

    /// `term ∧ transition → prime^invar` for a term which bounds the balance by `balance`. No
    /// transition is cheaper than `balance`, so the successor has used up the budget.
    fn close_by_balance(&mut self, term: &ProofName, balance: i64) {
        if let Some(min_cost) = self.min_operator_cost {
            if !self.balance_step(balance, min_cost, 0) {
                return;
            }
        }
        self.log_rup(vec![
            term.clone().current().negative(),
            ProofName::Transition.current().negative(),
            ProofName::Invariant.primed().positive(),
        ]);
    }

    /// `phi_evaluator_bound ⇔ ~goal ∧ balance_leq_bound`, which is closed under transitions as
    /// long as no operator is cheaper than `bound`.
    fn non_goal_bound(&mut self, evaluator: &str, bound: i32) -> Option<Estimate> {
        let balance = i64::from(bound);
        let phi = ProofName::Phi {
            evaluator: evaluator.into(),
            bound: balance,
        };

        if !self.defined.contains(&phi.clone().current()) {
            if !self.min_operator_cost.is_some_and(|min_cost| bound <= min_cost) {
                self.degrade(format!("{evaluator} estimates {bound} above every operator cost"));
                return None;
            }
            let balance_name = self.balance_at_most(balance)?;

            self.define_both(ProofPart::Reifications, &phi, |tag| {
                conjunction([
                    ProofName::Goal.tagged(tag).negative(),
                    balance_name.clone().tagged(tag).positive(),
                ])
            });
            self.add_invariant_term(&phi);
            self.log_comment(
                ProofPart::Derivations,
                format!("{evaluator}: states which are no goal need at least {bound}"),
            );
            self.close_by_balance(&phi, balance);
            self.log_rup(vec![
                ProofName::Goal.current().negative(),
                phi.clone().current().negative(),
                ProofName::BalanceLeq(0).current().positive(),
            ]);
        }

        Some(Estimate {
            term: phi,
            balance: Some(balance),
        })
    }

    /// Finishes the four streamed halves of `invar ⇔ ∨ terms`.
    fn close_invariant(&mut self, num_terms: u64) {
        for (part, tag, direction) in INVARIANT_HALVES {
            let invariant = ProofName::Invariant.tagged(tag);
            self.write(part, |writer| match direction {
                Direction::Right => writer.finish_redundance(
                    &[Term::new(1, invariant.clone().negative())],
                    1,
                    &[(invariant, false)],
                ),
                Direction::Left if num_terms == 0 => {
                    writer.finish_redundance::<TaggedName>(&[], 0, &[(invariant, true)])
                }
                Direction::Left => writer.finish_redundance(
                    &[Term::new(num_terms, invariant.clone().positive())],
                    num_terms as i64,
                    &[(invariant, true)],
                ),
            });
        }
    }

    fn assemble(&self) -> Result<PathBuf, ProofError> {
        let mut meta = format!("{META_MARKER}\n");
        for (part, _) in self.sinks.iter() {
            meta.push_str(part.file_name());
            meta.push('\n');
        }
        let meta_path = self.directory.join(META_FILE);
        fs::write(&meta_path, meta)?;

        let proof_path = self.directory.join(PROOF_FILE);
        let mut sink = BufWriter::new(File::create(&proof_path)?);
        pbp_format::assemble(&meta_path, &mut sink)?;
        sink.flush()?;

        #[cfg(feature = "gzipped-proofs")]
        if self.compress {
            compress(&proof_path)?;
        }

        if self.degraded {
            warn!(
                "The certificate in {} is incomplete and will not verify",
                proof_path.display()
            );
        } else {
            info!("Wrote the certificate to {}", proof_path.display());
        }

        Ok(proof_path)
    }

    fn add_invariant_term(&mut self, name: &ProofName) {
        for (part, tag, direction) in INVARIANT_HALVES {
            let literal = match direction {
                Direction::Right => name.clone().tagged(tag).positive(),
                Direction::Left => name.clone().tagged(tag).negative(),
            };
            self.write(part, |writer| writer.append_terms(&[Term::new(1, literal)]));
        }
        self.num_terms += 1;
    }

    /// `node[id]_g ⇔ state[id] ∧ spent_geq_g`.
    fn node(&mut self, state: &State, g: i32) -> Option<ProofName> {
        let state_name = ProofName::State(state.id());
        self.define_both(ProofPart::Reifications, &state_name, |tag| {
            facts(state.values().iter().enumerate().map(|(var, &value)| FactPair::new(var, value)), tag)
        });

        let spent = self.spent_at_least(i64::from(g))?;
        let node = ProofName::Node {
            state: state.id(),
            g,
        };
        self.define_both(ProofPart::Reifications, &node, |tag| {
            conjunction([
                state_name.clone().tagged(tag).positive(),
                spent.clone().tagged(tag).positive(),
            ])
        });

        Some(node)
    }

    fn abstract_state(&mut self, abstraction: &dyn AbstractionEncoding, index: usize) -> ProofName {
        let name = ProofName::AbstractState {
            pattern: abstraction.abstraction_name(),
            index,
        };
        if !self.defined.contains(&name.clone().current()) {
            let abstract_facts = abstraction.abstract_facts(index);
            self.define_both(ProofPart::Reifications, &name, |tag| {
                facts(abstract_facts.iter().copied(), tag)
            });
        }
        name
    }

    /// `a_P[i]_dist_d ⇔ a_P[i] ∧ balance_leq_d`, with `d` capped at the largest balance. An
    /// abstract dead end stands for itself.
    fn abstract_term(
        &mut self,
        abstraction: &dyn AbstractionEncoding,
        index: usize,
        distance: i32,
    ) -> Option<Estimate> {
        let abstract_state = self.abstract_state(abstraction, index);
        if distance == INFINITY {
            return Some(Estimate {
                term: abstract_state,
                balance: None,
            });
        }

        let balance = i64::from(distance).min(self.width.max_value());
        let balance_name = self.balance_at_most(balance)?;
        let name = ProofName::AbstractNode {
            pattern: abstraction.abstraction_name(),
            index,
            distance,
        };
        self.define_both(ProofPart::Reifications, &name, |tag| {
            conjunction([
                abstract_state.clone().tagged(tag).positive(),
                balance_name.clone().tagged(tag).positive(),
            ])
        });
        Some(Estimate {
            term: name,
            balance: Some(balance),
        })
    }

    fn spent_at_least(&mut self, x: i64) -> Option<ProofName> {
        if !self.width.can_represent(x) {
            self.degrade(format!("spent_geq_{x} exceeds {} bits", self.width.bits()));
            return None;
        }

        let width = self.width;
        let name = ProofName::SpentGeq(x);
        self.define_both(ProofPart::Reifications, &name, |tag| {
            width.spent_at_least(x, tag)
        });
        Some(name)
    }

    fn balance_at_most(&mut self, x: i64) -> Option<ProofName> {
        if !self.width.can_bound_balance(x) {
            self.degrade(format!("balance_leq_{x} exceeds {} bits", self.width.bits()));
            return None;
        }

        let width = self.width;
        let name = ProofName::BalanceLeq(x);
        self.define_both(ProofPart::Reifications, &name, |tag| {
            width.balance_at_most(x, tag)
        });
        Some(name)
    }

    fn delta_at_least(&mut self, cost: i32) -> Option<u64> {
        let id = self.delta_at_least.get(&cost).copied();
        if id.is_none() {
            self.degrade(format!("no operator costs {cost}"));
        }
        id
    }

    fn define_both(
        &mut self,
        part: ProofPart,
        name: &ProofName,
        constraint: impl Fn(Tag) -> ProofConstraint,
    ) {
        for tag in Tag::BOTH {
            self.define(part, name.clone().tagged(tag), || constraint(tag));
        }
    }

    /// Introduces both directions of `name ⇔ constraint`, unless `name` is already defined.
    fn define(
        &mut self,
        part: ProofPart,
        name: TaggedName,
        constraint: impl FnOnce() -> ProofConstraint,
    ) {
        if !self.defined.insert(name.clone()) {
            return;
        }

        let definition = bireify(&name, constraint());
        self.statistics.definitions += 1;
        self.write(part, |writer| {
            writer.log_redundance(
                Some(name.label(Direction::Right)),
                &definition.right,
                &[(name.clone(), false)],
            )?;
            writer.log_redundance(
                Some(name.label(Direction::Left)),
                &definition.left,
                &[(name.clone(), true)],
            )
        });
    }

    /// Writes the derivation `items` under `label`, unless a lemma with that label exists.
    fn derive(&mut self, label: String, items: Vec<PolItem<String>>) {
        if !self.lemmas.insert(label.clone()) {
            return;
        }

        self.statistics.derivations += 1;
        self.write(ProofPart::Derivations, |writer| {
            writer.log_pol(Some(label), &items)
        });
    }

    fn log_rup(&mut self, clause: Vec<ProofLiteral>) {
        let constraint = disjunction(clause);
        self.statistics.derivations += 1;
        self.write(ProofPart::Derivations, |writer| {
            writer.log_rup(None::<&str>, &constraint)
        });
    }

    fn log_comment(&mut self, part: ProofPart, text: impl std::fmt::Display) {
        self.write(part, |writer| writer.log_comment(text));
    }

    fn degrade(&mut self, reason: String) {
        warn!("The certificate is incomplete: {reason}");
        self.degraded = true;
    }

    /// Runs `action` on the writer of `part`. A part whose writer failed is not written to again.
    fn write(
        &mut self,
        part: ProofPart,
        action: impl FnOnce(&mut ProofWriter<File>) -> std::io::Result<()>,
    ) {
        let Some(writer) = self.sinks[part].as_mut() else {
            return;
        };

        if let Err(error) = action(writer) {
            warn!("Failed to write to {}: {error}", part.file_name());
            self.sinks[part] = None;
            self.degraded = true;
        }
    }
}

/// The step which introduced the given direction of the definition of `name`.
fn definition_step(name: &ProofName, tag: Tag, direction: Direction) -> PolItem<String> {
    PolItem::Step(name.clone().tagged(tag).label(direction))
}

fn facts(facts: impl Iterator<Item = FactPair>, tag: Tag) -> ProofConstraint {
    conjunction(facts.map(|fact| ProofName::Fact(fact).tagged(tag).positive()))
}

#[cfg(feature = "gzipped-proofs")]
fn compress(path: &Path) -> std::io::Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut source = File::open(path)?;
    let mut encoder = GzEncoder::new(
        File::create(path.with_extension("pbp.gz"))?,
        Compression::default(),
    );
    let _ = std::io::copy(&mut source, &mut encoder)?;
    let _ = encoder.finish()?;
    Ok(())
}
