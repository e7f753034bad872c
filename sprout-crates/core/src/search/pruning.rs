use std::fmt::Debug;

use log::debug;

use crate::create_statistics_struct;
use crate::state::State;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::task::AbstractTask;
use crate::task::OperatorId;

/// Removes or reorders the operators which are applied when a state is expanded.
///
/// Pruning methods must not have effects beyond the operator list they are handed.
pub trait PruningMethod: Debug {
    fn name(&self) -> &str;

    fn initialize(&mut self, _task: &dyn AbstractTask) {}

    fn prune(&mut self, state: &State, operators: &mut Vec<OperatorId>);

    /// Whether the method never removes an operator. Certificates need every transition.
    fn keeps_every_operator(&self) -> bool {
        false
    }
}

/// Keeps every applicable operator.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPruning;

impl PruningMethod for NullPruning {
    fn name(&self) -> &str {
        "null"
    }

    fn initialize(&mut self, _task: &dyn AbstractTask) {
        debug!("pruning method: none");
    }

    fn prune(&mut self, _: &State, _: &mut Vec<OperatorId>) {}

    fn keeps_every_operator(&self) -> bool {
        true
    }
}

create_statistics_struct!(
    /// The number of successors before and after pruning.
    PruningStatistics {
        successors_before_pruning: u64,
        successors_after_pruning: u64,
});

/// Applies a [`PruningMethod`] and counts what it removes.
#[derive(Debug)]
pub struct Pruner {
    method: Box<dyn PruningMethod>,
    statistics: PruningStatistics,
}

impl Default for Pruner {
    fn default() -> Self {
        Pruner::new(Box::new(NullPruning))
    }
}

impl Pruner {
    pub fn new(method: Box<dyn PruningMethod>) -> Pruner {
        Pruner {
            method,
            statistics: PruningStatistics::default(),
        }
    }

    pub fn initialize(&mut self, task: &dyn AbstractTask) {
        self.method.initialize(task);
    }

    pub fn name(&self) -> &str {
        self.method.name()
    }

    pub fn keeps_every_operator(&self) -> bool {
        self.method.keeps_every_operator()
    }

    pub fn prune_operators(&mut self, state: &State, operators: &mut Vec<OperatorId>) {
        self.statistics.successors_before_pruning += operators.len() as u64;
        self.method.prune(state, operators);
        self.statistics.successors_after_pruning += operators.len() as u64;
    }

    pub fn statistics(&self) -> PruningStatistics {
        self.statistics
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics
            .log(statistic_logger.scoped(self.method.name()));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::containers::StorageKey;
    use crate::state::StateRegistry;
    use crate::task::test_tasks;

    /// Keeps only operators with an even id.
    #[derive(Debug)]
    struct EvenOperators;

    impl PruningMethod for EvenOperators {
        fn name(&self) -> &str {
            "even"
        }

        fn prune(&mut self, _: &State, operators: &mut Vec<OperatorId>) {
            operators.retain(|op| op.index() % 2 == 0);
        }
    }

    #[test]
    fn counts_successors_before_and_after_pruning() {
        let state = StateRegistry::new(Rc::new(test_tasks::two_switches())).initial_state();
        let mut pruner = Pruner::new(Box::new(EvenOperators));

        let mut operators = (0..5).map(OperatorId::new).collect::<Vec<_>>();
        pruner.prune_operators(&state, &mut operators);

        assert_eq!(3, operators.len());
        assert_eq!(5, pruner.statistics().successors_before_pruning);
        assert_eq!(3, pruner.statistics().successors_after_pruning);
    }

    #[test]
    fn only_the_null_method_keeps_every_operator() {
        assert!(Pruner::default().keeps_every_operator());
        assert!(!Pruner::new(Box::new(EvenOperators)).keeps_every_operator());
    }
}
