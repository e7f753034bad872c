//! The pseudo-Boolean encoding of the planning task which the certificate is checked against.

use std::io;
use std::io::Write;

use itertools::Itertools;

use super::encoding::bireify;
use super::encoding::conjunction;
use super::encoding::disjunction;
use super::encoding::BitWidth;
use super::names::DeltaComparison;
use super::names::ProofConstraint;
use super::names::ProofName;
use super::names::Tag;
use super::names::TaggedName;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::task::AbstractTask;
use crate::task::FactPair;
use crate::task::OperatorId;

/// The constraints of the task encoding, in the order they are written.
#[derive(Clone, Debug)]
pub(crate) struct TaskEncoding {
    pub(crate) constraints: Vec<ProofConstraint>,
    /// For every operator cost `c`, the id of `delta_cost_geq_c → prime^spent - spent >= c`.
    /// Formula constraints are numbered from one in the order they are written.
    pub(crate) delta_at_least: HashMap<i32, u64>,
}

pub(crate) fn encode_task(task: &dyn AbstractTask, width: BitWidth) -> TaskEncoding {
    let mut constraints = Vec::new();
    let mut delta_at_least = HashMap::default();

    for tag in Tag::BOTH {
        for (var, variable) in task.variables().iter().enumerate() {
            let values = || (0..variable.domain_size).map(move |value| fact(var, value, tag));
            constraints.push(disjunction(values().map(TaggedName::positive)));

            let mut at_most_one = disjunction(values().map(TaggedName::negative));
            at_most_one.degree = variable.domain_size as i64 - 1;
            constraints.push(at_most_one);
        }
    }

    let initial_state = task
        .initial_state_values()
        .iter()
        .enumerate()
        .map(|(var, &value)| fact(var, value, Tag::Current).positive())
        .chain(
            (0..width.bits()).map(|bit| ProofName::SpentBit(bit).current().negative()),
        );
    push_definition(
        &mut constraints,
        ProofName::InitialState.current(),
        conjunction(initial_state),
    );

    let goal = task
        .goals()
        .iter()
        .map(|goal| fact(goal.var, goal.value, Tag::Current).positive());
    push_definition(&mut constraints, ProofName::Goal.current(), conjunction(goal));

    for var in 0..task.num_variables() {
        let frame = ProofName::Frame(var).current();
        for value in 0..task.domain_size(var) {
            let before = fact(var, value, Tag::Current);
            let after = fact(var, value, Tag::Primed);
            constraints.push(disjunction([
                frame.clone().negative(),
                before.clone().negative(),
                after.clone().positive(),
            ]));
            constraints.push(disjunction([
                frame.clone().negative(),
                before.positive(),
                after.negative(),
            ]));
        }
    }

    for op in task.operator_ids() {
        encode_operator(task, op, &mut constraints);
    }

    for cost in task.operator_ids().map(|op| task.operator_cost(op)).sorted().dedup() {
        let delta = |comparison| ProofName::DeltaCost { comparison, cost }.current();

        let _ = delta_at_least.insert(cost, constraints.len() as u64 + 1);
        push_definition(
            &mut constraints,
            delta(DeltaComparison::AtLeast),
            width.delta_at_least(cost),
        );
        push_definition(
            &mut constraints,
            delta(DeltaComparison::AtMost),
            width.delta_at_most(cost),
        );
        push_definition(
            &mut constraints,
            delta(DeltaComparison::Equal),
            conjunction([
                delta(DeltaComparison::AtLeast).positive(),
                delta(DeltaComparison::AtMost).positive(),
            ]),
        );
    }

    let operators = task
        .operator_ids()
        .map(|op| ProofName::Operator(op).current().positive());
    push_definition(
        &mut constraints,
        ProofName::Transition.current(),
        disjunction(operators),
    );

    TaskEncoding {
        constraints,
        delta_at_least,
    }
}

fn encode_operator(task: &dyn AbstractTask, op: OperatorId, constraints: &mut Vec<ProofConstraint>) {
    let operator = task.operator(op);
    let applied = || ProofName::Operator(op).current();

    for pre in &operator.preconditions {
        constraints.push(disjunction([
            applied().negative(),
            fact(pre.var, pre.value, Tag::Current).positive(),
        ]));
    }

    let mut effect_conditions: Vec<Option<TaggedName>> = Vec::new();
    for (index, effect) in operator.effects.iter().enumerate() {
        if effect.conditions.is_empty() {
            effect_conditions.push(None);
            continue;
        }

        let condition = ProofName::EffectCondition { op, effect: index }.current();
        push_definition(
            constraints,
            condition.clone(),
            conjunction(
                effect
                    .conditions
                    .iter()
                    .map(|c| fact(c.var, c.value, Tag::Current).positive()),
            ),
        );
        effect_conditions.push(Some(condition));
    }

    for (effect, condition) in operator.effects.iter().zip(&effect_conditions) {
        let mut clause = vec![applied().negative()];
        clause.extend(condition.clone().map(TaggedName::negative));
        clause.push(fact(effect.fact.var, effect.fact.value, Tag::Primed).positive());
        constraints.push(disjunction(clause));
    }

    for var in 0..task.num_variables() {
        let affecting = operator
            .effects
            .iter()
            .zip(&effect_conditions)
            .filter(|(effect, _)| effect.fact.var == var)
            .collect::<Vec<_>>();

        if affecting.iter().any(|(_, condition)| condition.is_none()) {
            continue;
        }

        let mut clause = vec![applied().negative()];
        clause.extend(
            affecting
                .into_iter()
                .filter_map(|(_, condition)| condition.clone().map(TaggedName::positive)),
        );
        clause.push(ProofName::Frame(var).current().positive());
        constraints.push(disjunction(clause));
    }

    constraints.push(disjunction([
        applied().negative(),
        ProofName::DeltaCost {
            comparison: DeltaComparison::Equal,
            cost: task.operator_cost(op),
        }
        .current()
        .positive(),
    ]));
}

fn push_definition(
    constraints: &mut Vec<ProofConstraint>,
    reified: TaggedName,
    constraint: ProofConstraint,
) {
    let definition = bireify(&reified, constraint);
    constraints.push(definition.right);
    constraints.push(definition.left);
}

fn fact(var: usize, value: usize, tag: Tag) -> TaggedName {
    ProofName::Fact(FactPair::new(var, value)).tagged(tag)
}

/// Writes the constraints in OPB format, preceded by the variable and constraint counts.
pub(crate) fn write_opb(constraints: &[ProofConstraint], mut sink: impl Write) -> io::Result<()> {
    let variables = constraints
        .iter()
        .flat_map(|constraint| constraint.terms.iter())
        .map(|term| &term.literal.name)
        .collect::<HashSet<_>>();

    writeln!(
        sink,
        "* #variable= {} #constraint= {}",
        variables.len(),
        constraints.len()
    )?;
    for constraint in constraints {
        writeln!(sink, "{constraint} ;")?;
    }
    sink.flush()
}
