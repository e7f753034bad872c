//! Small tasks shared by the unit tests.

use super::Effect;
use super::FactPair;
use super::Operator;
use super::PlanningTask;
use super::Variable;

pub(crate) fn variable(name: &str, domain_size: usize) -> Variable {
    Variable {
        name: name.to_owned(),
        domain_size,
        axiom_layer: None,
        fact_names: (0..domain_size)
            .map(|value| format!("Atom {name}({value})"))
            .collect(),
    }
}

pub(crate) fn operator(
    name: &str,
    preconditions: &[(usize, usize)],
    effects: &[(usize, usize)],
    cost: i32,
) -> Operator {
    Operator {
        name: name.to_owned(),
        preconditions: preconditions
            .iter()
            .map(|&(var, value)| FactPair::new(var, value))
            .collect(),
        effects: effects
            .iter()
            .map(|&(var, value)| Effect::unconditional(FactPair::new(var, value)))
            .collect(),
        cost,
    }
}

/// Two binary variables; `a` has to be set before `b`. The optimal plan costs 3.
pub(crate) fn two_switches() -> PlanningTask {
    PlanningTask {
        variables: vec![variable("a", 2), variable("b", 2)],
        operators: vec![
            operator("set-a", &[(0, 0)], &[(0, 1)], 1),
            operator("set-b", &[(0, 1), (1, 0)], &[(1, 1)], 2),
        ],
        initial_state: vec![0, 0],
        goals: vec![FactPair::new(0, 1), FactPair::new(1, 1)],
        use_metric: true,
        ..Default::default()
    }
}

/// A line `0 - 1 - 2 - 3` which can be walked in both directions, with the goal at the far end.
/// Moving right costs `right_cost`, moving left costs one.
pub(crate) fn line(right_cost: i32) -> PlanningTask {
    let mut operators = Vec::new();
    for position in 0..3 {
        operators.push(operator(
            &format!("right {position}"),
            &[(0, position)],
            &[(0, position + 1)],
            right_cost,
        ));
        operators.push(operator(
            &format!("left {}", position + 1),
            &[(0, position + 1)],
            &[(0, position)],
            1,
        ));
    }

    PlanningTask {
        variables: vec![variable("at", 4)],
        operators,
        initial_state: vec![0],
        goals: vec![FactPair::new(0, 3)],
        use_metric: true,
        ..Default::default()
    }
}
