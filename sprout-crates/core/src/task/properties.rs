//! Queries about a task that are derived from its capability surface.

use super::AbstractTask;
use super::Effect;
use super::Operator;
use super::OperatorId;
use super::TaskError;

pub fn is_goal_state(task: &dyn AbstractTask, values: &[usize]) -> bool {
    task.goals().iter().all(|goal| values[goal.var] == goal.value)
}

pub fn is_applicable(operator: &Operator, values: &[usize]) -> bool {
    operator
        .preconditions
        .iter()
        .all(|pre| values[pre.var] == pre.value)
}

/// Whether the conditions of `effect` hold in the state with the given values.
pub fn does_fire(effect: &Effect, values: &[usize]) -> bool {
    effect
        .conditions
        .iter()
        .all(|condition| values[condition.var] == condition.value)
}

/// The values of the state that results from applying `operator` in the state with `values`.
pub fn apply(operator: &Operator, values: &[usize]) -> Vec<usize> {
    let mut successor = values.to_vec();
    for effect in operator.effects.iter() {
        if does_fire(effect, values) {
            successor[effect.fact.var] = effect.fact.value;
        }
    }
    successor
}

/// The smallest operator cost, or `i32::MAX` if the task has no operators.
pub fn min_operator_cost(task: &dyn AbstractTask) -> i32 {
    task.operator_ids()
        .map(|op| task.operator_cost(op))
        .min()
        .unwrap_or(i32::MAX)
}

pub fn max_operator_cost(task: &dyn AbstractTask) -> i32 {
    task.operator_ids()
        .map(|op| task.operator_cost(op))
        .max()
        .unwrap_or(0)
}

pub fn is_unit_cost(task: &dyn AbstractTask) -> bool {
    task.operator_ids().all(|op| task.operator_cost(op) == 1)
}

pub fn operator_costs(task: &dyn AbstractTask) -> Vec<i32> {
    task.operator_ids().map(|op| task.operator_cost(op)).collect()
}

pub fn has_axioms(task: &dyn AbstractTask) -> bool {
    !task.axioms().is_empty()
}

pub fn has_conditional_effects(task: &dyn AbstractTask) -> bool {
    task.operators()
        .iter()
        .any(|op| op.effects.iter().any(|effect| !effect.conditions.is_empty()))
}

pub fn verify_no_axioms(task: &dyn AbstractTask, component: &str) -> Result<(), TaskError> {
    if has_axioms(task) {
        return Err(TaskError::Axioms {
            component: component.to_owned(),
        });
    }
    Ok(())
}

pub fn verify_no_conditional_effects(
    task: &dyn AbstractTask,
    component: &str,
) -> Result<(), TaskError> {
    if has_conditional_effects(task) {
        return Err(TaskError::ConditionalEffects {
            component: component.to_owned(),
        });
    }
    Ok(())
}

/// The total cost of `plan` under the operator costs of `task`.
pub fn plan_cost(task: &dyn AbstractTask, plan: &[OperatorId]) -> i32 {
    plan.iter().map(|&op| task.operator_cost(op)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::FactPair;
    use crate::task::PlanningTask;

    fn toggle_task() -> PlanningTask {
        PlanningTask {
            operators: vec![Operator {
                name: "toggle".to_owned(),
                preconditions: vec![FactPair::new(0, 0)],
                effects: vec![
                    Effect::unconditional(FactPair::new(0, 1)),
                    Effect {
                        fact: FactPair::new(1, 1),
                        conditions: vec![FactPair::new(1, 0)],
                    },
                ],
                cost: 2,
            }],
            initial_state: vec![0, 0],
            goals: vec![FactPair::new(0, 1)],
            ..Default::default()
        }
    }

    #[test]
    fn conditional_effect_fires_only_when_condition_holds() {
        let task = toggle_task();
        let op = &task.operators[0];

        assert_eq!(vec![1, 1], apply(op, &[0, 0]));
        assert_eq!(vec![1, 2], apply(op, &[0, 2]));
    }

    #[test]
    fn conditional_effects_are_reported() {
        let task = toggle_task();

        assert!(has_conditional_effects(&task));
        assert_eq!(
            Err(TaskError::ConditionalEffects {
                component: "test".to_owned()
            }),
            verify_no_conditional_effects(&task, "test")
        );
        assert!(verify_no_axioms(&task, "test").is_ok());
    }

    #[test]
    fn goal_test_checks_every_goal_fact() {
        let task = toggle_task();

        assert!(!is_goal_state(&task, &[0, 0]));
        assert!(is_goal_state(&task, &[1, 0]));
    }
}
