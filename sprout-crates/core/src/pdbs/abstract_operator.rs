use super::Projection;
use crate::containers::StorageKey;
use crate::task::AbstractTask;
use crate::task::FactPair;
use crate::task::OperatorId;

/// An operator of the projection, specialized to one assignment of the pattern variables which
/// the concrete operator changes without requiring a value for them.
///
/// All facts refer to positions in the pattern, not to task variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbstractOperator {
    concrete_operator: OperatorId,
    cost: i32,
    /// The facts that hold after applying the operator: prevail conditions and effects, sorted
    /// by position.
    regression_preconditions: Vec<FactPair>,
    /// Added to the index of an abstract state to obtain the index of its predecessor.
    hash_effect: i64,
}

impl AbstractOperator {
    pub fn concrete_operator(&self) -> OperatorId {
        self.concrete_operator
    }

    pub fn cost(&self) -> i32 {
        self.cost
    }

    pub fn regression_preconditions(&self) -> &[FactPair] {
        &self.regression_preconditions
    }

    pub fn hash_effect(&self) -> i64 {
        self.hash_effect
    }

    /// The abstract state from which applying the operator leads to `successor`.
    pub fn predecessor(&self, successor: usize) -> usize {
        (successor as i64 + self.hash_effect) as usize
    }

    /// The abstract state reached by applying the operator in `predecessor`.
    pub fn successor(&self, predecessor: usize) -> usize {
        (predecessor as i64 - self.hash_effect) as usize
    }
}

/// The partial abstract operator built up while multiplying out an operator.
#[derive(Debug, Default)]
struct Specialization {
    /// Facts required and left unchanged.
    prevail: Vec<FactPair>,
    /// Required values of the changed positions, parallel to `effects`.
    preconditions: Vec<FactPair>,
    effects: Vec<FactPair>,
}

/// Builds the abstract operators of all operators of `task`. `operator_costs` overrides the
/// costs of the task when given.
pub fn compute_abstract_operators(
    task: &dyn AbstractTask,
    projection: &Projection,
    operator_costs: Option<&[i32]>,
) -> Vec<AbstractOperator> {
    let mut variable_to_position = vec![None; task.num_variables()];
    for (position, &var) in projection.pattern().iter().enumerate() {
        variable_to_position[var] = Some(position);
    }

    let mut operators = Vec::new();
    for op in task.operator_ids() {
        let cost = operator_costs.map_or_else(|| task.operator_cost(op), |costs| costs[op.index()]);
        build_abstract_operators_for(
            task,
            projection,
            &variable_to_position,
            op,
            cost,
            &mut operators,
        );
    }
    operators
}

fn build_abstract_operators_for(
    task: &dyn AbstractTask,
    projection: &Projection,
    variable_to_position: &[Option<usize>],
    op: OperatorId,
    cost: i32,
    operators: &mut Vec<AbstractOperator>,
) {
    let operator = task.operator(op);

    let mut precondition_on = vec![None; task.num_variables()];
    for pre in &operator.preconditions {
        precondition_on[pre.var] = Some(pre.value);
    }

    let mut specialization = Specialization::default();
    let mut effects_without_precondition = Vec::new();
    let mut is_changed = vec![false; task.num_variables()];

    for effect in &operator.effects {
        let Some(position) = variable_to_position[effect.fact.var] else {
            continue;
        };
        let fact = FactPair::new(position, effect.fact.value);
        match precondition_on[effect.fact.var] {
            Some(value) => {
                is_changed[effect.fact.var] = true;
                specialization
                    .preconditions
                    .push(FactPair::new(position, value));
                specialization.effects.push(fact);
            }
            None => effects_without_precondition.push(fact),
        }
    }

    for pre in &operator.preconditions {
        if let Some(position) = variable_to_position[pre.var] {
            if !is_changed[pre.var] {
                specialization
                    .prevail
                    .push(FactPair::new(position, pre.value));
            }
        }
    }

    multiply_out(
        projection,
        op,
        cost,
        &effects_without_precondition,
        &mut specialization,
        operators,
    );
}

/// Enumerates every prior value of the pattern variables the operator changes without a
/// precondition, and emits one abstract operator per combination. A combination under which the
/// operator changes nothing is dropped.
fn multiply_out(
    projection: &Projection,
    op: OperatorId,
    cost: i32,
    effects_without_precondition: &[FactPair],
    specialization: &mut Specialization,
    operators: &mut Vec<AbstractOperator>,
) {
    let Some((&effect, remaining)) = effects_without_precondition.split_first() else {
        if !specialization.effects.is_empty() {
            operators.push(build_abstract_operator(projection, op, cost, specialization));
        }
        return;
    };

    for value in 0..projection.domain_size(effect.var) {
        if value == effect.value {
            specialization.prevail.push(FactPair::new(effect.var, value));
        } else {
            specialization
                .preconditions
                .push(FactPair::new(effect.var, value));
            specialization.effects.push(effect);
        }

        multiply_out(projection, op, cost, remaining, specialization, operators);

        if value == effect.value {
            let _ = specialization.prevail.pop();
        } else {
            let _ = specialization.preconditions.pop();
            let _ = specialization.effects.pop();
        }
    }
}

fn build_abstract_operator(
    projection: &Projection,
    op: OperatorId,
    cost: i32,
    specialization: &Specialization,
) -> AbstractOperator {
    let mut regression_preconditions = specialization.prevail.clone();
    regression_preconditions.extend_from_slice(&specialization.effects);
    regression_preconditions.sort_unstable();
    crate::sprout_assert_moderate!(regression_preconditions
        .windows(2)
        .all(|pair| pair[0].var != pair[1].var));

    let hash_effect = specialization
        .preconditions
        .iter()
        .zip(&specialization.effects)
        .map(|(pre, eff)| {
            crate::sprout_assert_eq_moderate!(pre.var, eff.var);
            (pre.value as i64 - eff.value as i64) * projection.multiplier(pre.var) as i64
        })
        .sum();

    AbstractOperator {
        concrete_operator: op,
        cost,
        regression_preconditions,
        hash_effect,
    }
}
