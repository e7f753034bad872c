use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;

use super::compute_abstract_operators;
use super::AbstractOperator;
use super::MatchTree;
use super::Pattern;
use super::PdbError;
use super::Projection;
use crate::basic_types::Random;
use crate::evaluation::INFINITY;
use crate::sprout_assert_moderate;
use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::OperatorId;

/// One step of an abstract plan: the concrete operators which induce the same abstract
/// transition at the same cost. Unless wildcard plans are requested, every step holds a single
/// operator.
pub type AbstractPlanStep = Vec<OperatorId>;

/// The goal distances of all abstract states of a [`Projection`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternDatabase {
    projection: Projection,
    /// Indexed by the rank of the abstract state; [`INFINITY`] for states from which no abstract
    /// goal is reachable.
    distances: Vec<i32>,
}

impl PatternDatabase {
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn pattern(&self) -> &Pattern {
        self.projection.pattern()
    }

    pub fn distances(&self) -> &[i32] {
        &self.distances
    }

    /// The goal distance of the abstract state of the concrete state with `values`.
    pub fn value(&self, values: &[usize]) -> i32 {
        self.distances[self.projection.rank(values)]
    }

    /// The average over all finite distances, or infinity if there are none.
    pub fn mean_finite_h(&self) -> f64 {
        let (sum, count) = self
            .distances
            .iter()
            .filter(|&&distance| distance != INFINITY)
            .fold((0.0, 0_usize), |(sum, count), &distance| {
                (sum + f64::from(distance), count + 1)
            });

        if count == 0 {
            f64::INFINITY
        } else {
            sum / count as f64
        }
    }
}

/// Builds the pattern database of `pattern`. `operator_costs` overrides the operator costs of
/// the task when given.
pub fn compute_pdb(
    task: &dyn AbstractTask,
    pattern: Pattern,
    operator_costs: Option<&[i32]>,
) -> Result<PatternDatabase, PdbError> {
    let builder = PdbBuilder::new(task, pattern, operator_costs)?;
    let (distances, _) = builder.compute_distances(false);
    Ok(PatternDatabase {
        projection: builder.projection,
        distances,
    })
}

/// Builds the pattern database of `pattern` together with an optimal abstract plan from the
/// abstract initial state.
///
/// The plan is empty if the initial state is an abstract goal or an abstract dead end.
pub fn compute_pdb_and_plan<R: Random>(
    task: &dyn AbstractTask,
    pattern: Pattern,
    operator_costs: Option<&[i32]>,
    random: &mut R,
    wildcard_plan: bool,
) -> Result<(PatternDatabase, Vec<AbstractPlanStep>), PdbError> {
    let builder = PdbBuilder::new(task, pattern, operator_costs)?;
    let (distances, generating_operators) = builder.compute_distances(true);

    let initial_state = builder.projection.rank(task.initial_state_values());
    let plan = builder.extract_plan(
        &distances,
        &generating_operators,
        initial_state,
        random,
        wildcard_plan,
    );

    Ok((
        PatternDatabase {
            projection: builder.projection,
            distances,
        },
        plan,
    ))
}

/// Everything needed to explore the abstract state space.
#[derive(Debug)]
struct PdbBuilder {
    projection: Projection,
    operators: Vec<AbstractOperator>,
    match_tree: MatchTree,
    /// The abstract goal, as pattern positions and values.
    abstract_goals: Vec<(usize, usize)>,
}

impl PdbBuilder {
    fn new(
        task: &dyn AbstractTask,
        pattern: Pattern,
        operator_costs: Option<&[i32]>,
    ) -> Result<PdbBuilder, PdbError> {
        let projection = Projection::new(task, pattern)?;
        debug!(
            "Building the pattern database of {} with {} abstract states",
            projection.pattern(),
            projection.num_abstract_states()
        );

        let operators = compute_abstract_operators(task, &projection, operator_costs);
        let mut match_tree = MatchTree::new(&projection);
        for (index, operator) in operators.iter().enumerate() {
            match_tree.insert(index, operator.regression_preconditions());
        }

        let abstract_goals = task
            .goals()
            .iter()
            .filter_map(|goal| {
                projection
                    .pattern()
                    .iter()
                    .position(|&var| var == goal.var)
                    .map(|position| (position, goal.value))
            })
            .collect();

        Ok(PdbBuilder {
            projection,
            operators,
            match_tree,
            abstract_goals,
        })
    }

    fn is_goal(&self, index: usize) -> bool {
        self.abstract_goals
            .iter()
            .all(|&(position, value)| self.projection.unrank(index, position) == value)
    }

    /// Dijkstra's algorithm backwards from the abstract goal states. When requested, the second
    /// component holds for every reached non-goal state the operator leading to it on a cheapest
    /// path towards the goal.
    fn compute_distances(&self, track_generating_operators: bool) -> (Vec<i32>, Vec<Option<usize>>) {
        let num_states = self.projection.num_abstract_states();
        let mut distances = vec![INFINITY; num_states];
        let mut generating_operators = if track_generating_operators {
            vec![None; num_states]
        } else {
            Vec::new()
        };

        let mut queue = BinaryHeap::new();
        for index in (0..num_states).filter(|&index| self.is_goal(index)) {
            distances[index] = 0;
            queue.push(Reverse((0, index)));
        }

        let mut applicable = Vec::new();
        while let Some(Reverse((distance, state))) = queue.pop() {
            if distance > distances[state] {
                continue;
            }

            applicable.clear();
            self.match_tree.applicable_operators(state, &mut applicable);
            for &op in &applicable {
                let operator = &self.operators[op];
                let predecessor = operator.predecessor(state);
                sprout_assert_moderate!(predecessor < num_states);

                let alternative = distance.saturating_add(operator.cost());
                if alternative < distances[predecessor] {
                    distances[predecessor] = alternative;
                    if track_generating_operators {
                        generating_operators[predecessor] = Some(op);
                    }
                    queue.push(Reverse((alternative, predecessor)));
                }
            }
        }

        (distances, generating_operators)
    }

    /// Follows the generating operators forward from `initial_state` to an abstract goal.
    fn extract_plan<R: Random>(
        &self,
        distances: &[i32],
        generating_operators: &[Option<usize>],
        initial_state: usize,
        random: &mut R,
        wildcard_plan: bool,
    ) -> Vec<AbstractPlanStep> {
        let mut plan = Vec::new();
        if distances[initial_state] == INFINITY {
            return plan;
        }

        let mut current = initial_state;
        let mut applicable = Vec::new();
        while !self.is_goal(current) {
            let Some(generating) = generating_operators[current] else {
                break;
            };
            let operator = &self.operators[generating];
            let successor = operator.successor(current);

            // All operators which lead from the current state to the same successor at the same
            // cost are equally good.
            applicable.clear();
            self.match_tree
                .applicable_operators(successor, &mut applicable);
            let mut step = applicable
                .iter()
                .map(|&op| &self.operators[op])
                .filter(|candidate| {
                    candidate.cost() == operator.cost()
                        && candidate.predecessor(successor) == current
                })
                .map(AbstractOperator::concrete_operator)
                .collect::<Vec<_>>();
            step.sort_unstable();
            step.dedup();

            if wildcard_plan {
                random.shuffle(&mut step);
                plan.push(step);
            } else {
                let chosen = step[random.generate_usize_in_range(0..step.len())];
                plan.push(vec![chosen]);
            }

            sprout_assert_moderate!(
                distances[successor] < distances[current]
                    || (operator.cost() == 0 && distances[successor] == distances[current])
            );
            current = successor;
        }

        plan
    }
}

/// Whether `plan` leads from the initial state of `task` to a goal state when the first
/// operator of every step is applied.
pub fn is_concrete_plan(task: &dyn AbstractTask, plan: &[AbstractPlanStep]) -> bool {
    let mut values = task.initial_state_values().to_vec();
    for step in plan {
        let Some(&op) = step.first() else {
            return false;
        };
        let operator = task.operator(op);
        if !properties::is_applicable(operator, &values) {
            return false;
        }
        values = properties::apply(operator, &values);
    }
    properties::is_goal_state(task, &values)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::basic_types::TestRandom;
    use crate::task::test_tasks;
    use crate::task::FactPair;
    use crate::task::PlanningTask;

    fn pattern(variables: Vec<usize>, task: &PlanningTask) -> Pattern {
        Pattern::normalized(variables, task.variables.len()).expect("valid pattern")
    }

    #[test]
    fn distances_are_computed_backwards_from_the_goal() {
        let task = PlanningTask {
            variables: vec![test_tasks::variable("x", 3)],
            operators: vec![
                test_tasks::operator("a", &[(0, 1)], &[(0, 0)], 2),
                test_tasks::operator("b", &[(0, 2)], &[(0, 1)], 3),
            ],
            initial_state: vec![2],
            goals: vec![FactPair::new(0, 0)],
            ..Default::default()
        };

        let pdb = compute_pdb(&task, pattern(vec![0], &task), None).expect("small pattern");

        assert_eq!(&[0, 2, 5], pdb.distances());
        assert_eq!(5, pdb.value(&[2]));
        assert!((pdb.mean_finite_h() - 7.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn states_unreachable_from_the_initial_state_get_a_distance_too() {
        let task = test_tasks::two_switches();

        let pdb = compute_pdb(&task, pattern(vec![0, 1], &task), None).expect("small pattern");

        // Ranks are a + 2 * b; a = 0, b = 1 is never reached but is one step from the goal.
        assert_eq!(&[3, 2, 1, 0], pdb.distances());
    }

    #[test]
    fn projecting_on_no_variable_gives_a_single_goal_state() {
        let task = test_tasks::two_switches();

        let pdb = compute_pdb(&task, pattern(vec![], &task), None).expect("small pattern");

        assert_eq!(&[0], pdb.distances());
    }

    #[test]
    fn states_without_operators_towards_the_goal_are_dead_ends() {
        let mut task = test_tasks::line(1);
        task.operators.clear();

        let pdb = compute_pdb(&task, pattern(vec![0], &task), None).expect("small pattern");

        assert_eq!(&[INFINITY, INFINITY, INFINITY, 0], pdb.distances());
        assert_eq!(0.0, pdb.mean_finite_h());
    }

    #[test]
    fn mean_of_only_dead_ends_is_infinite() {
        let task = test_tasks::line(1);
        let pdb = compute_pdb(&task, pattern(vec![0], &task), None).expect("small pattern");

        let dead = PatternDatabase {
            projection: pdb.projection().clone(),
            distances: vec![INFINITY; 4],
        };

        assert!(dead.mean_finite_h().is_infinite());
    }

    #[test]
    fn building_twice_gives_identical_tables() {
        let task = test_tasks::line(3);

        let first = compute_pdb(&task, pattern(vec![0], &task), None).expect("small pattern");
        let second = compute_pdb(&task, pattern(vec![0], &task), None).expect("small pattern");

        assert_eq!(first, second);
        assert_eq!(&[9, 6, 3, 0], first.distances());
    }

    #[test]
    fn cost_overrides_change_the_distances() {
        let task = test_tasks::line(3);
        let costs = [1, 1, 1, 1, 1, 1];

        let pdb =
            compute_pdb(&task, pattern(vec![0], &task), Some(&costs)).expect("small pattern");

        assert_eq!(&[3, 2, 1, 0], pdb.distances());
    }

    #[test]
    fn the_extracted_plan_reaches_the_goal() {
        let task = test_tasks::two_switches();
        let mut random = SmallRng::seed_from_u64(42);

        let (pdb, plan) = compute_pdb_and_plan(
            &task,
            pattern(vec![0, 1], &task),
            None,
            &mut random,
            false,
        )
        .expect("small pattern");

        assert_eq!(3, pdb.value(task.initial_state_values()));
        assert_eq!(
            vec![vec![OperatorId::new(0)], vec![OperatorId::new(1)]],
            plan
        );
        assert!(is_concrete_plan(&task, &plan));
    }

    #[test]
    fn wildcard_steps_hold_all_equivalent_operators() {
        let task = PlanningTask {
            variables: vec![test_tasks::variable("x", 2), test_tasks::variable("y", 2)],
            operators: vec![
                test_tasks::operator("set-x", &[(0, 0)], &[(0, 1)], 1),
                test_tasks::operator("set-x-and-y", &[(0, 0)], &[(0, 1), (1, 1)], 1),
                test_tasks::operator("set-x-expensively", &[(0, 0)], &[(0, 1)], 4),
            ],
            initial_state: vec![0, 0],
            goals: vec![FactPair::new(0, 1)],
            ..Default::default()
        };
        let mut random = TestRandom {
            usizes: vec![0],
            position: 0,
        };

        let (_, plan) =
            compute_pdb_and_plan(&task, pattern(vec![0], &task), None, &mut random, true)
                .expect("small pattern");

        assert_eq!(1, plan.len());
        let mut step = plan[0].clone();
        step.sort_unstable();
        assert_eq!(vec![OperatorId::new(0), OperatorId::new(1)], step);
    }

    #[test]
    fn no_plan_is_extracted_from_a_dead_end() {
        let mut task = test_tasks::two_switches();
        task.initial_state = vec![0, 1];
        let _ = task.operators.remove(0);
        let mut random = SmallRng::seed_from_u64(42);

        let (pdb, plan) = compute_pdb_and_plan(
            &task,
            pattern(vec![0, 1], &task),
            None,
            &mut random,
            false,
        )
        .expect("small pattern");

        assert_eq!(INFINITY, pdb.value(task.initial_state_values()));
        assert!(plan.is_empty());
    }
}
