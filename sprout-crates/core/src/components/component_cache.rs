use std::collections::BTreeMap;
use std::rc::Rc;

use itertools::Itertools;
use log::debug;

use super::ComponentId;
use super::ComponentSpec;
use super::ConfigurationError;
use super::PatternSpec;
use crate::containers::HashMap;
use crate::evaluation::BlindSearchHeuristic;
use crate::evaluation::Combination;
use crate::evaluation::CombiningEvaluator;
use crate::evaluation::EvaluatorId;
use crate::evaluation::EvaluatorStore;
use crate::evaluation::GEvaluator;
use crate::evaluation::HeuristicEvaluator;
use crate::evaluation::WeightedEvaluator;
use crate::landmarks::LandmarkSumHeuristic;
use crate::pdbs::ComboPatterns;
use crate::pdbs::GreedyPattern;
use crate::pdbs::ManualPattern;
use crate::pdbs::Pattern;
use crate::pdbs::PatternCollectionGenerator;
use crate::pdbs::PatternGenerator;
use crate::pdbs::PdbHeuristic;
use crate::pdbs::PdbOptions;
use crate::proof::ProofSession;
use crate::task::AbstractTask;

/// Builds evaluators from their [`ComponentSpec`]s, constructing every component at most once.
///
/// A component referenced by several others (e.g. the heuristic used both in `f = g + h` and as
/// a tie-breaker) ends up as a single evaluator in the store.
#[derive(Debug)]
pub struct ComponentCache<'a> {
    task: Rc<dyn AbstractTask>,
    specs: &'a BTreeMap<ComponentId, ComponentSpec>,
    pdb_options: PdbOptions,
    store: EvaluatorStore,
    built: HashMap<ComponentId, EvaluatorId>,
    /// The components currently being built, innermost last.
    building: Vec<ComponentId>,
}

impl<'a> ComponentCache<'a> {
    pub fn new(
        task: Rc<dyn AbstractTask>,
        specs: &'a BTreeMap<ComponentId, ComponentSpec>,
        pdb_options: PdbOptions,
    ) -> ComponentCache<'a> {
        ComponentCache {
            task,
            specs,
            pdb_options,
            store: EvaluatorStore::default(),
            built: HashMap::default(),
            building: Vec::new(),
        }
    }

    /// The evaluator of component `id`, building it and its dependencies if necessary.
    pub fn evaluator(
        &mut self,
        id: ComponentId,
        proof: &mut ProofSession,
    ) -> Result<EvaluatorId, ConfigurationError> {
        let specs = self.specs;
        let spec = specs
            .get(&id)
            .ok_or(ConfigurationError::UnknownComponent(id))?;
        let indentation = " ".repeat(self.building.len());

        if let Some(&evaluator) = self.built.get(&id) {
            debug!(
                "{indentation}Reusing task specific {} '{id}'...",
                spec.product_name()
            );
            return Ok(evaluator);
        }
        if self.building.contains(&id) {
            return Err(ConfigurationError::CyclicComponent(id));
        }

        debug!(
            "{indentation}Creating task specific {} '{id}'...",
            spec.product_name()
        );
        self.building.push(id);
        let result = self.build(spec, proof);
        let _ = self.building.pop();

        let evaluator = result?;
        let _ = self.built.insert(id, evaluator);
        Ok(evaluator)
    }

    pub fn into_store(self) -> EvaluatorStore {
        self.store
    }

    fn build(
        &mut self,
        spec: &ComponentSpec,
        proof: &mut ProofSession,
    ) -> Result<EvaluatorId, ConfigurationError> {
        let evaluator = match spec {
            ComponentSpec::G => self.store.add(GEvaluator),
            ComponentSpec::Blind => self.store.add(HeuristicEvaluator::new(
                BlindSearchHeuristic::new(Rc::clone(&self.task)),
            )),
            ComponentSpec::LandmarkSum => self.store.add(HeuristicEvaluator::new(
                LandmarkSumHeuristic::new(Rc::clone(&self.task)),
            )),
            ComponentSpec::Pdb(pattern_spec) => {
                let pattern = match pattern_spec {
                    PatternSpec::Manual(variables) => {
                        ManualPattern::new(variables.clone()).generate(self.task.as_ref())?
                    }
                    PatternSpec::Greedy(options) => {
                        GreedyPattern::new(*options).generate(self.task.as_ref())?
                    }
                };
                self.add_pdb(pattern, proof)?
            }
            ComponentSpec::ComboPdbs(options) => {
                let patterns = ComboPatterns::new(*options).generate(self.task.as_ref())?;
                let pdbs = patterns
                    .into_iter()
                    .map(|pattern| self.add_pdb(pattern, proof))
                    .collect::<Result<Vec<_>, _>>()?;
                self.add_combination(Combination::Max, pdbs)?
            }
            ComponentSpec::Weighted { evaluator, weight } => {
                if *weight <= 0 {
                    return Err(ConfigurationError::NonPositiveWeight(*weight));
                }
                let evaluator = self.evaluator(*evaluator, proof)?;
                let weighted = WeightedEvaluator::new(evaluator, *weight, &self.store);
                self.store.add(weighted)
            }
            ComponentSpec::Sum(components) | ComponentSpec::Max(components) => {
                let combination = if matches!(spec, ComponentSpec::Sum(_)) {
                    Combination::Sum
                } else {
                    Combination::Max
                };
                let evaluators = components
                    .iter()
                    .map(|&component| self.evaluator(component, proof))
                    .collect::<Result<Vec<_>, _>>()?;
                self.add_combination(combination, evaluators)?
            }
        };
        Ok(evaluator)
    }

    fn add_pdb(
        &mut self,
        pattern: Pattern,
        proof: &mut ProofSession,
    ) -> Result<EvaluatorId, ConfigurationError> {
        let heuristic =
            PdbHeuristic::new(Rc::clone(&self.task), pattern, self.pdb_options, proof)?;
        Ok(self.store.add(HeuristicEvaluator::new(heuristic)))
    }

    fn add_combination(
        &mut self,
        combination: Combination,
        evaluators: Vec<EvaluatorId>,
    ) -> Result<EvaluatorId, ConfigurationError> {
        if evaluators.is_empty() {
            return Err(ConfigurationError::NoEvaluators);
        }
        // A combination of one evaluator is that evaluator.
        if let &[evaluator] = evaluators.as_slice() {
            return Ok(evaluator);
        }

        let operator = match combination {
            Combination::Max => "max",
            Combination::Sum => "sum",
        };
        let name = format!(
            "{operator}({})",
            evaluators
                .iter()
                .map(|&evaluator| self.store.get(evaluator).name())
                .join(", ")
        );
        let combining = CombiningEvaluator::new(name, combination, evaluators, &self.store);
        Ok(self.store.add(combining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdbs::GreedyPatternOptions;
    use crate::pdbs::PdbError;
    use crate::task::test_tasks;

    fn specs(entries: Vec<(u32, ComponentSpec)>) -> BTreeMap<ComponentId, ComponentSpec> {
        entries
            .into_iter()
            .map(|(id, spec)| (ComponentId(id), spec))
            .collect()
    }

    fn task() -> Rc<dyn AbstractTask> {
        Rc::new(test_tasks::two_switches())
    }

    #[test]
    fn shared_components_are_built_once() {
        let specs = specs(vec![
            (0, ComponentSpec::G),
            (1, ComponentSpec::Blind),
            (2, ComponentSpec::Sum(vec![ComponentId(0), ComponentId(1)])),
        ]);
        let mut cache = ComponentCache::new(task(), &specs, PdbOptions::default());
        let mut proof = ProofSession::default();

        let f = cache.evaluator(ComponentId(2), &mut proof).expect("valid");
        let h = cache.evaluator(ComponentId(1), &mut proof).expect("valid");

        let store = cache.into_store();
        assert_eq!(3, store.len());
        assert_eq!("sum(g, blind)", store.get(f).name());
        assert_eq!("blind", store.get(h).name());
    }

    #[test]
    fn combo_pdbs_are_combined_by_max() {
        let specs = specs(vec![(
            0,
            ComponentSpec::ComboPdbs(GreedyPatternOptions { max_states: 2 }),
        )]);
        let mut cache = ComponentCache::new(task(), &specs, PdbOptions::default());

        let combo = cache
            .evaluator(ComponentId(0), &mut ProofSession::default())
            .expect("valid");

        let store = cache.into_store();
        assert_eq!("max(pdb_p_0, pdb_p_1)", store.get(combo).name());
    }

    #[test]
    fn unknown_components_are_reported() {
        let specs = specs(vec![(0, ComponentSpec::Max(vec![ComponentId(7)]))]);
        let mut cache = ComponentCache::new(task(), &specs, PdbOptions::default());

        assert_eq!(
            Err(ConfigurationError::UnknownComponent(ComponentId(7))),
            cache.evaluator(ComponentId(0), &mut ProofSession::default())
        );
    }

    #[test]
    fn cycles_are_reported() {
        let specs = specs(vec![
            (0, ComponentSpec::Sum(vec![ComponentId(1)])),
            (1, ComponentSpec::Max(vec![ComponentId(0)])),
        ]);
        let mut cache = ComponentCache::new(task(), &specs, PdbOptions::default());

        assert_eq!(
            Err(ConfigurationError::CyclicComponent(ComponentId(0))),
            cache.evaluator(ComponentId(0), &mut ProofSession::default())
        );
    }

    #[test]
    fn invalid_patterns_fail_the_construction() {
        let specs = specs(vec![(0, ComponentSpec::Pdb(PatternSpec::Manual(vec![5])))]);
        let mut cache = ComponentCache::new(task(), &specs, PdbOptions::default());

        assert_eq!(
            Err(ConfigurationError::Pdb(PdbError::InvalidPattern {
                variable: 5,
                num_variables: 2
            })),
            cache.evaluator(ComponentId(0), &mut ProofSession::default())
        );
    }

    #[test]
    fn weights_must_be_positive() {
        let specs = specs(vec![
            (0, ComponentSpec::Blind),
            (
                1,
                ComponentSpec::Weighted {
                    evaluator: ComponentId(0),
                    weight: 0,
                },
            ),
        ]);
        let mut cache = ComponentCache::new(task(), &specs, PdbOptions::default());

        assert_eq!(
            Err(ConfigurationError::NonPositiveWeight(0)),
            cache.evaluator(ComponentId(1), &mut ProofSession::default())
        );
    }
}
