use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use log::debug;
use log::info;

use super::termination::TerminationCondition;
use super::FLayerProgress;
use super::Plan;
use super::Pruner;
use super::PruningMethod;
use super::SearchSpace;
use super::SearchStatistics;
use super::SearchStatus;
use super::Transition;
use crate::components::ConfigurationError;
use crate::containers::OrderedSet;
use crate::evaluation::EvaluationContext;
use crate::evaluation::EvaluatorId;
use crate::evaluation::EvaluatorStore;
use crate::evaluation::INFINITY;
use crate::open_list::OpenList;
use crate::proof::ProofError;
use crate::proof::ProofSession;
use crate::sprout_assert_moderate;
use crate::state::State;
use crate::state::StateId;
use crate::state::StateRegistry;
use crate::state::SuccessorGenerator;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::OperatorCost;
use crate::task::OperatorId;

/// The options of an [`EagerSearch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EagerSearchOptions {
    /// Put closed nodes back on the open list when a cheaper path to them is found.
    pub reopen_closed: bool,
    /// Successors whose real cost would reach the bound are not generated. [`INFINITY`] disables
    /// the bound.
    pub bound: i32,
    /// How operator costs are interpreted for g values. The bound always uses the real costs.
    pub cost_type: OperatorCost,
}

impl Default for EagerSearchOptions {
    fn default() -> Self {
        EagerSearchOptions {
            reopen_closed: false,
            bound: INFINITY,
            cost_type: OperatorCost::Normal,
        }
    }
}

/// Best-first search which evaluates nodes when they are generated.
///
/// The order of expansions is determined entirely by the open list; A*, weighted A* and greedy
/// best-first search only differ in the open list and the evaluators they are given (see
/// [`crate::components::SearchConfiguration`]).
#[derive(Debug)]
pub struct EagerSearch {
    task: Rc<dyn AbstractTask>,
    is_unit_cost: bool,
    options: EagerSearchOptions,
    registry: StateRegistry,
    successor_generator: SuccessorGenerator,
    search_space: SearchSpace,
    open_list: Box<dyn OpenList<StateId>>,
    evaluators: EvaluatorStore,
    /// Only used to report f-layers.
    f_evaluator: Option<EvaluatorId>,
    preferred_operator_evaluators: Vec<EvaluatorId>,
    pruner: Pruner,
    proof: ProofSession,
    statistics: SearchStatistics,
    progress: FLayerProgress,
    status: SearchStatus,
    plan: Option<Plan>,
    applicable: Vec<OperatorId>,
}

impl EagerSearch {
    pub fn new(
        task: Rc<dyn AbstractTask>,
        evaluators: EvaluatorStore,
        open_list: Box<dyn OpenList<StateId>>,
        options: EagerSearchOptions,
    ) -> Result<EagerSearch, ConfigurationError> {
        if options.bound < 0 {
            return Err(ConfigurationError::NegativeBound(options.bound));
        }

        debug!("Building successor generator...");
        let successor_generator = SuccessorGenerator::new(task.as_ref());
        log_variable_statistics(task.as_ref());

        Ok(EagerSearch {
            is_unit_cost: properties::is_unit_cost(task.as_ref()),
            registry: StateRegistry::new(Rc::clone(&task)),
            task,
            options,
            successor_generator,
            search_space: SearchSpace::default(),
            open_list,
            evaluators,
            f_evaluator: None,
            preferred_operator_evaluators: Vec::new(),
            pruner: Pruner::default(),
            proof: ProofSession::default(),
            statistics: SearchStatistics::default(),
            progress: FLayerProgress::default(),
            status: SearchStatus::InProgress,
            plan: None,
            applicable: Vec::new(),
        })
    }

    pub fn with_f_evaluator(mut self, f_evaluator: EvaluatorId) -> EagerSearch {
        self.f_evaluator = Some(f_evaluator);
        self
    }

    pub fn with_preferred_operator_evaluators(mut self, evaluators: Vec<EvaluatorId>) -> EagerSearch {
        self.preferred_operator_evaluators = evaluators;
        self
    }

    pub fn with_pruning(mut self, method: Box<dyn PruningMethod>) -> EagerSearch {
        self.pruner = Pruner::new(method);
        self
    }

    /// Certify the result of the search in `proof`.
    pub fn with_proof(mut self, proof: ProofSession) -> EagerSearch {
        self.proof = proof;
        self
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn found_solution(&self) -> bool {
        self.plan.is_some()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn statistics(&self) -> SearchStatistics {
        self.statistics
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.search_space
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn task(&self) -> &Rc<dyn AbstractTask> {
        &self.task
    }

    pub fn proof(&self) -> &ProofSession {
        &self.proof
    }

    pub fn options(&self) -> EagerSearchOptions {
        self.options
    }

    /// Run the search until it is solved, fails, or `termination` asks it to stop.
    ///
    /// `termination` is only polled between two steps.
    pub fn search(&mut self, mut termination: impl TerminationCondition) -> SearchStatus {
        let started_at = Instant::now();
        self.initialize();

        while self.status == SearchStatus::InProgress {
            self.status = self.step();

            if self.status == SearchStatus::InProgress && termination.should_stop() {
                info!("Time limit reached. Abort search.");
                self.status = SearchStatus::Timeout;
            }
        }

        info!(
            "Actual search time: {:.3}s",
            started_at.elapsed().as_secs_f64()
        );
        self.status
    }

    /// Insert the initial state into the open list, unless it is a dead end.
    pub fn initialize(&mut self) {
        info!(
            "Conducting best first search {} reopening closed nodes, (real) bound = {}",
            if self.options.reopen_closed {
                "with"
            } else {
                "without"
            },
            self.options.bound
        );
        sprout_assert_moderate!(self.search_space.is_empty());

        self.pruner.initialize(self.task.as_ref());
        if !self.pruner.keeps_every_operator() {
            self.proof.mark_incomplete(format!(
                "the pruning method {} removes transitions",
                self.pruner.name()
            ));
        }
        if self.options.bound != INFINITY {
            self.proof.mark_incomplete(format!(
                "the bound {} removes transitions",
                self.options.bound
            ));
        }

        let initial_state = self.registry.initial_state();
        self.evaluators.notify_initial_state(&initial_state);

        let mut context = EvaluationContext::new(initial_state.clone(), 0, true, &mut self.proof);
        self.statistics.evaluated_states += 1;

        if self.open_list.is_dead_end(&mut self.evaluators, &mut context) {
            info!("Initial state is a dead end.");
            self.search_space.mark_as_dead_end(initial_state.id());
            self.statistics.dead_end_states += 1;
        } else {
            if let Some(f_evaluator) = self.f_evaluator {
                let f = self.evaluators.value(f_evaluator, &mut context);
                info!("Initial f value: {f}");
                self.progress.start(f, &self.statistics);
            }

            self.search_space.open_initial(initial_state.id());
            self.open_list
                .insert(&mut self.evaluators, &mut context, initial_state.id());
        }

        self.statistics.evaluations += context.num_evaluations();
    }

    /// Expand one node.
    pub fn step(&mut self) -> SearchStatus {
        let Some((state, g, real_g)) = self.fetch_next_node() else {
            info!("Completely explored state space -- no solution!");
            return SearchStatus::Failed;
        };

        if self.check_goal_and_set_plan(&state) {
            return SearchStatus::Solved;
        }

        let mut applicable = std::mem::take(&mut self.applicable);
        applicable.clear();
        self.successor_generator
            .generate_applicable_ops(self.task.as_ref(), &state, &mut applicable);
        self.statistics.generated_operators += applicable.len() as u64;
        self.pruner.prune_operators(&state, &mut applicable);

        let mut successors = Vec::new();
        let preferred_operators = self.collect_preferred_operators(&state, g);

        for &op in &applicable {
            let cost = self.task.operator_cost(op);
            if real_g.saturating_add(cost) >= self.options.bound {
                continue;
            }

            let successor = self.registry.successor_state(&state, op);
            self.statistics.generated_states += 1;
            if self.proof.is_enabled() {
                successors.push((op, successor.id()));
            }
            let is_preferred = preferred_operators.contains(&op);

            self.evaluators
                .notify_state_transition(&state, op, &successor);

            let successor_node = self.search_space.node(successor.id());
            // A previously encountered dead end is not evaluated again.
            if successor_node.is_dead_end() {
                continue;
            }

            let transition = Transition {
                parent: state.id(),
                operator: op,
                adjusted_cost: self.options.cost_type.adjust(cost, self.is_unit_cost),
                cost,
            };
            let successor_g = g + transition.adjusted_cost;

            if successor_node.is_new() {
                let mut context =
                    EvaluationContext::new(successor.clone(), successor_g, is_preferred, &mut self.proof);
                self.statistics.evaluated_states += 1;

                if self.open_list.is_dead_end(&mut self.evaluators, &mut context) {
                    self.search_space.mark_as_dead_end(successor.id());
                    self.statistics.dead_end_states += 1;
                } else {
                    self.search_space.open_new_node(successor.id(), transition);
                    self.open_list
                        .insert(&mut self.evaluators, &mut context, successor.id());
                }
                self.statistics.evaluations += context.num_evaluations();
            } else if successor_node.g() > successor_g {
                // A cheaper path to an open or closed state.
                if successor_node.is_open() {
                    self.search_space
                        .update_open_node_parent(successor.id(), transition);
                    self.reinsert(&successor, successor_g, is_preferred);
                } else if successor_node.is_closed() && self.options.reopen_closed {
                    self.search_space
                        .reopen_closed_node(successor.id(), transition);
                    self.statistics.reopened_states += 1;
                    self.reinsert(&successor, successor_g, is_preferred);
                } else {
                    self.search_space
                        .update_closed_node_parent(successor.id(), transition);
                }
            }
        }

        self.proof.log_expansion(&state, g, &successors);

        self.applicable = applicable;
        SearchStatus::InProgress
    }

    /// Close the proof for the plan which was found.
    ///
    /// Returns the path to the assembled proof, or `None` if no proof was requested or the search
    /// did not find a plan. The proof is only closed once.
    pub fn finalize_proof(&mut self) -> Result<Option<PathBuf>, ProofError> {
        let proof = std::mem::take(&mut self.proof);
        if !proof.is_enabled() {
            return Ok(None);
        }

        match (self.status, self.plan.as_ref()) {
            (SearchStatus::Solved, Some(plan)) => {
                let cost = properties::plan_cost(self.task.as_ref(), plan);
                proof.finalize(cost)
            }
            (status, _) => {
                info!("The search ended with status {status:?}; the proof is not closed.");
                Ok(None)
            }
        }
    }

    /// Log the statistics of the search, the pruning method and the proof.
    pub fn log_statistics(&self) {
        self.statistics.print_summary();
        info!("Number of registered states: {}", self.registry.len());

        if should_log_statistics() {
            let statistic_logger = StatisticLogger::new(["search"]);
            self.statistics.log(statistic_logger.clone());
            statistic_logger
                .scoped("registered_states")
                .log_statistic(self.registry.len());
            self.pruner
                .log_statistics(statistic_logger.scoped("pruning"));
        }
    }

    /// Pops open-list entries until one refers to a node which has not been closed yet, and
    /// closes it.
    fn fetch_next_node(&mut self) -> Option<(State, i32, i32)> {
        loop {
            let id = self.open_list.remove_min()?;
            let node = self.search_space.node(id);
            if node.is_closed() {
                continue;
            }
            sprout_assert_moderate!(!node.is_dead_end());

            let state = self.registry.lookup_state(id);
            self.search_space.close(id);
            self.statistics.expanded_states += 1;

            if let Some(f_evaluator) = self.f_evaluator {
                let mut context =
                    EvaluationContext::new(state.clone(), node.g(), false, &mut self.proof);
                let f = self.evaluators.value(f_evaluator, &mut context);
                self.statistics.evaluations += context.num_evaluations();
                self.progress.report(f, &mut self.statistics);
            }

            return Some((state, node.g(), node.real_g()));
        }
    }

    fn check_goal_and_set_plan(&mut self, state: &State) -> bool {
        if !properties::is_goal_state(self.task.as_ref(), state.values()) {
            return false;
        }

        info!("Solution found!");
        self.plan = Some(self.search_space.trace_path(state.id()));
        true
    }

    /// The preferred operators of the expanded state, according to all preferred-operator
    /// evaluators which do not consider it a dead end.
    fn collect_preferred_operators(&mut self, state: &State, g: i32) -> OrderedSet<OperatorId> {
        let mut preferred_operators = OrderedSet::default();
        if self.preferred_operator_evaluators.is_empty() {
            return preferred_operators;
        }

        let mut context = EvaluationContext::new(state.clone(), g, false, &mut self.proof)
            .with_preferred_operators(true);
        for &evaluator in &self.preferred_operator_evaluators {
            let result = self.evaluators.evaluate(evaluator, &mut context);
            if !result.is_infinite() {
                for &op in result.preferred_operators() {
                    let _ = preferred_operators.insert(op);
                }
            }
        }
        self.statistics.evaluations += context.num_evaluations();

        preferred_operators
    }

    fn reinsert(&mut self, successor: &State, g: i32, is_preferred: bool) {
        let mut context =
            EvaluationContext::new(successor.clone(), g, is_preferred, &mut self.proof);
        self.open_list
            .insert(&mut self.evaluators, &mut context, successor.id());
        self.statistics.evaluations += context.num_evaluations();
    }
}

fn log_variable_statistics(task: &dyn AbstractTask) {
    let domain_sizes = task
        .variables()
        .iter()
        .map(|variable| variable.domain_size)
        .collect::<Vec<_>>();
    let facts: usize = domain_sizes.iter().sum();
    let bytes_per_state = domain_sizes
        .iter()
        .map(|&size| (usize::BITS - size.saturating_sub(1).leading_zeros()) as usize)
        .sum::<usize>()
        .div_ceil(8);

    info!("Variables: {}", task.num_variables());
    info!("FactPairs: {facts}");
    info!("Bytes per state: {bytes_per_state}");
}
