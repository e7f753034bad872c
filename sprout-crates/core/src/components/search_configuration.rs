use std::collections::BTreeMap;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::ComponentCache;
use super::ComponentId;
use super::ComponentSpec;
use super::ConfigurationError;
use super::OpenListSpec;
use crate::evaluation::INFINITY;
use crate::open_list::BestFirstOpenList;
use crate::open_list::OpenList;
use crate::open_list::ParetoOpenList;
use crate::open_list::TieBreakingOpenList;
use crate::pdbs::PdbOptions;
use crate::proof::ProofSession;
use crate::search::EagerSearch;
use crate::search::EagerSearchOptions;
use crate::state::StateId;
use crate::task::AbstractTask;
use crate::task::OperatorCost;

/// The component graph of an [`EagerSearch`]: its evaluators, its open list and its options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfiguration {
    components: BTreeMap<ComponentId, ComponentSpec>,
    open_list: OpenListSpec,
    f_evaluator: Option<ComponentId>,
    preferred_operator_evaluators: Vec<ComponentId>,
    options: EagerSearchOptions,
    pdb_options: PdbOptions,
}

impl SearchConfiguration {
    pub fn new(open_list: OpenListSpec, options: EagerSearchOptions) -> SearchConfiguration {
        SearchConfiguration {
            components: BTreeMap::new(),
            open_list,
            f_evaluator: None,
            preferred_operator_evaluators: Vec::new(),
            options,
            pdb_options: PdbOptions::default(),
        }
    }

    /// A* with the heuristic `h`: the open list is ordered by `g + h`, ties are broken by `h`.
    pub fn astar(heuristic: ComponentSpec, options: EagerSearchOptions) -> SearchConfiguration {
        let (g, h, f) = (ComponentId(0), ComponentId(1), ComponentId(2));

        SearchConfiguration::new(
            OpenListSpec::TieBreaking {
                evaluators: vec![f, h],
                allow_unsafe_pruning: false,
            },
            options,
        )
        .with_component(g, ComponentSpec::G)
        .with_component(h, heuristic)
        .with_component(f, ComponentSpec::Sum(vec![g, h]))
        .with_f_evaluator(f)
    }

    /// Weighted A*: the open list is ordered by `g + weight * h`, ties are broken by `h`.
    pub fn wastar(
        heuristic: ComponentSpec,
        weight: i32,
        options: EagerSearchOptions,
    ) -> SearchConfiguration {
        let (g, h, weighted, f) = (ComponentId(0), ComponentId(1), ComponentId(2), ComponentId(3));

        SearchConfiguration::new(
            OpenListSpec::TieBreaking {
                evaluators: vec![f, h],
                allow_unsafe_pruning: false,
            },
            options,
        )
        .with_component(g, ComponentSpec::G)
        .with_component(h, heuristic)
        .with_component(
            weighted,
            ComponentSpec::Weighted {
                evaluator: h,
                weight,
            },
        )
        .with_component(f, ComponentSpec::Sum(vec![g, weighted]))
        .with_f_evaluator(f)
    }

    /// Greedy best-first search: the open list is ordered by `h` alone.
    pub fn eager_greedy(heuristic: ComponentSpec, options: EagerSearchOptions) -> SearchConfiguration {
        let h = ComponentId(0);

        SearchConfiguration::new(OpenListSpec::BestFirst(h), options).with_component(h, heuristic)
    }

    /// Eager search which expands a random node on the Pareto front of `g` and `h`.
    pub fn eager_pareto(
        heuristic: ComponentSpec,
        random_seed: u64,
        options: EagerSearchOptions,
    ) -> SearchConfiguration {
        let (g, h) = (ComponentId(0), ComponentId(1));

        SearchConfiguration::new(
            OpenListSpec::Pareto {
                evaluators: vec![h, g],
                preferred_only: false,
                state_uniform_selection: false,
                random_seed,
            },
            options,
        )
        .with_component(g, ComponentSpec::G)
        .with_component(h, heuristic)
    }

    pub fn with_component(mut self, id: ComponentId, spec: ComponentSpec) -> SearchConfiguration {
        let _ = self.components.insert(id, spec);
        self
    }

    pub fn with_f_evaluator(mut self, id: ComponentId) -> SearchConfiguration {
        self.f_evaluator = Some(id);
        self
    }

    pub fn with_preferred_operator_evaluators(
        mut self,
        evaluators: Vec<ComponentId>,
    ) -> SearchConfiguration {
        self.preferred_operator_evaluators = evaluators;
        self
    }

    pub fn with_pdb_options(mut self, pdb_options: PdbOptions) -> SearchConfiguration {
        self.pdb_options = pdb_options;
        self
    }

    pub fn options(&self) -> EagerSearchOptions {
        self.options
    }

    /// Builds all components reachable from the open list, the f evaluator and the preferred
    /// operator evaluators, and the search on top of them.
    ///
    /// Abstraction heuristics record their tables in `proof` before it is handed to the search.
    pub fn build(
        &self,
        task: Rc<dyn AbstractTask>,
        mut proof: ProofSession,
    ) -> Result<EagerSearch, ConfigurationError> {
        if proof.is_enabled() && self.options.cost_type != OperatorCost::Normal {
            return Err(ConfigurationError::ProofRequiresNormalCost(
                self.options.cost_type,
            ));
        }
        if proof.is_enabled() && self.options.bound != INFINITY {
            return Err(ConfigurationError::ProofWithBound(self.options.bound));
        }

        let mut cache = ComponentCache::new(Rc::clone(&task), &self.components, self.pdb_options);

        let open_list: Box<dyn OpenList<StateId>> = match &self.open_list {
            OpenListSpec::BestFirst(id) => {
                Box::new(BestFirstOpenList::new(cache.evaluator(*id, &mut proof)?, false))
            }
            OpenListSpec::TieBreaking {
                evaluators,
                allow_unsafe_pruning,
            } => {
                if evaluators.is_empty() {
                    return Err(ConfigurationError::NoEvaluators);
                }
                let evaluators = evaluators
                    .iter()
                    .map(|&id| cache.evaluator(id, &mut proof))
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(TieBreakingOpenList::new(
                    evaluators,
                    *allow_unsafe_pruning,
                    false,
                ))
            }
            OpenListSpec::Pareto {
                evaluators,
                preferred_only,
                state_uniform_selection,
                random_seed,
            } => {
                if evaluators.is_empty() {
                    return Err(ConfigurationError::NoEvaluators);
                }
                let evaluators = evaluators
                    .iter()
                    .map(|&id| cache.evaluator(id, &mut proof))
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(ParetoOpenList::new(
                    evaluators,
                    *preferred_only,
                    *state_uniform_selection,
                    Box::new(SmallRng::seed_from_u64(*random_seed)),
                ))
            }
        };

        let f_evaluator = self
            .f_evaluator
            .map(|id| cache.evaluator(id, &mut proof))
            .transpose()?;
        let preferred_operator_evaluators = self
            .preferred_operator_evaluators
            .iter()
            .map(|&id| cache.evaluator(id, &mut proof))
            .collect::<Result<Vec<_>, _>>()?;

        let mut search = EagerSearch::new(task, cache.into_store(), open_list, self.options)?
            .with_preferred_operator_evaluators(preferred_operator_evaluators)
            .with_proof(proof);
        if let Some(f_evaluator) = f_evaluator {
            search = search.with_f_evaluator(f_evaluator);
        }
        Ok(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::PatternSpec;
    use crate::pdbs::GreedyPatternOptions;
    use crate::search::termination::Indefinite;
    use crate::search::SearchStatus;
    use crate::task::properties;
    use crate::task::test_tasks;

    fn solve(configuration: &SearchConfiguration, task: Rc<dyn AbstractTask>) -> (SearchStatus, i32) {
        let mut search = configuration
            .build(Rc::clone(&task), ProofSession::default())
            .expect("valid configuration");
        let status = search.search(Indefinite);
        let cost = search
            .plan()
            .map_or(-1, |plan| properties::plan_cost(task.as_ref(), plan));
        (status, cost)
    }

    #[test]
    fn astar_with_a_pdb_finds_the_optimal_plan() {
        let configuration = SearchConfiguration::astar(
            ComponentSpec::Pdb(PatternSpec::Manual(vec![0, 1])),
            EagerSearchOptions::default(),
        );

        let (status, cost) = solve(&configuration, Rc::new(test_tasks::two_switches()));

        assert_eq!(SearchStatus::Solved, status);
        assert_eq!(3, cost);
    }

    #[test]
    fn astar_with_combo_pdbs_finds_the_optimal_plan() {
        let configuration = SearchConfiguration::astar(
            ComponentSpec::ComboPdbs(GreedyPatternOptions::default()),
            EagerSearchOptions::default(),
        );

        let (status, cost) = solve(&configuration, Rc::new(test_tasks::line(2)));

        assert_eq!(SearchStatus::Solved, status);
        assert_eq!(6, cost);
    }

    #[test]
    fn weighted_and_greedy_searches_find_a_plan() {
        let task: Rc<dyn AbstractTask> = Rc::new(test_tasks::line(1));

        let wastar = SearchConfiguration::wastar(
            ComponentSpec::Blind,
            3,
            EagerSearchOptions::default(),
        );
        let greedy = SearchConfiguration::eager_greedy(
            ComponentSpec::Pdb(PatternSpec::Greedy(GreedyPatternOptions::default())),
            EagerSearchOptions::default(),
        );

        assert_eq!((SearchStatus::Solved, 3), solve(&wastar, Rc::clone(&task)));
        assert_eq!((SearchStatus::Solved, 3), solve(&greedy, task));
    }

    #[test]
    fn pareto_searches_find_a_plan() {
        let task: Rc<dyn AbstractTask> = Rc::new(test_tasks::line(2));
        let configuration = SearchConfiguration::eager_pareto(
            ComponentSpec::Blind,
            42,
            EagerSearchOptions::default(),
        );

        let (status, cost) = solve(&configuration, Rc::clone(&task));

        assert_eq!(SearchStatus::Solved, status);
        assert_eq!(6, cost);
    }

    #[test]
    fn empty_pareto_lists_are_rejected() {
        let configuration = SearchConfiguration::new(
            OpenListSpec::Pareto {
                evaluators: vec![],
                preferred_only: false,
                state_uniform_selection: true,
                random_seed: 0,
            },
            EagerSearchOptions::default(),
        );

        let result = configuration.build(
            Rc::new(test_tasks::two_switches()),
            ProofSession::default(),
        );

        assert!(matches!(result, Err(ConfigurationError::NoEvaluators)));
    }

    #[test]
    fn empty_tie_breaking_lists_are_rejected() {
        let configuration = SearchConfiguration::new(
            OpenListSpec::TieBreaking {
                evaluators: vec![],
                allow_unsafe_pruning: false,
            },
            EagerSearchOptions::default(),
        );

        let result = configuration.build(
            Rc::new(test_tasks::two_switches()),
            ProofSession::default(),
        );

        assert!(matches!(result, Err(ConfigurationError::NoEvaluators)));
    }

    #[test]
    fn proofs_reject_a_bound() {
        let task: Rc<dyn AbstractTask> = Rc::new(test_tasks::two_switches());
        let directory = std::env::temp_dir().join(format!(
            "sprout-configuration-bound-{}",
            std::process::id()
        ));
        let proof = ProofSession::create(&directory, task.as_ref()).expect("writable directory");
        let configuration = SearchConfiguration::astar(
            ComponentSpec::Blind,
            EagerSearchOptions {
                bound: 7,
                ..EagerSearchOptions::default()
            },
        );

        let result = configuration.build(task, proof);
        let _ = std::fs::remove_dir_all(&directory);

        assert!(matches!(result, Err(ConfigurationError::ProofWithBound(7))));
    }

    #[test]
    fn proofs_require_normal_costs() {
        let task: Rc<dyn AbstractTask> = Rc::new(test_tasks::two_switches());
        let directory = std::env::temp_dir().join(format!(
            "sprout-configuration-test-{}",
            std::process::id()
        ));
        let proof = ProofSession::create(&directory, task.as_ref()).expect("writable directory");
        let configuration = SearchConfiguration::astar(
            ComponentSpec::Blind,
            EagerSearchOptions {
                cost_type: OperatorCost::One,
                ..EagerSearchOptions::default()
            },
        );

        let result = configuration.build(task, proof);
        let _ = std::fs::remove_dir_all(&directory);

        assert!(matches!(
            result,
            Err(ConfigurationError::ProofRequiresNormalCost(OperatorCost::One))
        ));
    }
}
