use std::rc::Rc;

use super::Pattern;
use super::PdbError;
use crate::proof::AbstractionEncoding;
use crate::sprout_assert_moderate;
use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::FactPair;
use crate::task::Operator;

/// The largest number of abstract states a projection may have.
pub const MAX_ABSTRACT_STATES: usize = i32::MAX as usize;

/// The projection of a task onto a [`Pattern`].
///
/// Abstract states are numbered with a mixed-radix scheme: the value of the `i`-th pattern
/// variable contributes `value * hash_multipliers[i]` to the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pattern: Pattern,
    domain_sizes: Vec<usize>,
    hash_multipliers: Vec<usize>,
    num_abstract_states: usize,
    name: Rc<str>,
}

impl Projection {
    /// Fails if the task has axioms or conditional effects, or if the abstract state space does
    /// not fit into [`MAX_ABSTRACT_STATES`].
    pub fn new(task: &dyn AbstractTask, pattern: Pattern) -> Result<Projection, PdbError> {
        properties::verify_no_axioms(task, "pattern databases")?;
        properties::verify_no_conditional_effects(task, "pattern databases")?;

        let mut domain_sizes = Vec::with_capacity(pattern.len());
        let mut hash_multipliers = Vec::with_capacity(pattern.len());
        let mut num_abstract_states = 1_usize;

        for &var in pattern.iter() {
            hash_multipliers.push(num_abstract_states);
            let domain_size = task.domain_size(var);
            domain_sizes.push(domain_size);

            num_abstract_states = num_abstract_states
                .checked_mul(domain_size)
                .filter(|&size| size <= MAX_ABSTRACT_STATES)
                .ok_or_else(|| PdbError::PatternTooLarge {
                    pattern: pattern.clone(),
                    limit: MAX_ABSTRACT_STATES,
                })?;
        }

        Ok(Projection {
            name: pattern.proof_name().into(),
            pattern,
            domain_sizes,
            hash_multipliers,
            num_abstract_states,
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn num_abstract_states(&self) -> usize {
        self.num_abstract_states
    }

    /// The domain size of the variable at `position` in the pattern.
    pub fn domain_size(&self, position: usize) -> usize {
        self.domain_sizes[position]
    }

    pub fn multiplier(&self, position: usize) -> usize {
        self.hash_multipliers[position]
    }

    /// The index of the abstract state of the concrete state with `values`.
    pub fn rank(&self, values: &[usize]) -> usize {
        self.pattern
            .iter()
            .zip(&self.hash_multipliers)
            .map(|(&var, &multiplier)| multiplier * values[var])
            .sum()
    }

    /// The value of the variable at `position` in the pattern in the abstract state `index`.
    pub fn unrank(&self, index: usize, position: usize) -> usize {
        sprout_assert_moderate!(
            index < self.num_abstract_states,
            "abstract state {index} out of range"
        );
        (index / self.hash_multipliers[position]) % self.domain_sizes[position]
    }

    /// The values of all pattern variables in the abstract state `index`, by pattern position.
    pub fn abstract_values(&self, index: usize) -> Vec<usize> {
        (0..self.pattern.len())
            .map(|position| self.unrank(index, position))
            .collect()
    }
}

impl AbstractionEncoding for Projection {
    fn abstraction_name(&self) -> Rc<str> {
        Rc::clone(&self.name)
    }

    fn num_abstract_states(&self) -> usize {
        self.num_abstract_states
    }

    fn abstract_facts(&self, index: usize) -> Vec<FactPair> {
        self.pattern
            .iter()
            .enumerate()
            .map(|(position, &var)| FactPair::new(var, self.unrank(index, position)))
            .collect()
    }

    fn abstract_successor(&self, operator: &Operator, index: usize) -> Option<usize> {
        let mut successor = index;
        for (position, &var) in self.pattern.iter().enumerate() {
            let value = self.unrank(index, position);
            if operator
                .preconditions
                .iter()
                .any(|pre| pre.var == var && pre.value != value)
            {
                return None;
            }

            if let Some(effect) = operator.effects.iter().find(|effect| effect.fact.var == var) {
                let multiplier = self.hash_multipliers[position];
                successor = successor - value * multiplier + effect.fact.value * multiplier;
            }
        }
        Some(successor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::test_tasks;
    use crate::task::PlanningTask;
    use crate::task::TaskError;

    fn task_with_domains(domain_sizes: &[usize]) -> PlanningTask {
        PlanningTask {
            variables: domain_sizes
                .iter()
                .enumerate()
                .map(|(var, &size)| test_tasks::variable(&format!("v{var}"), size))
                .collect(),
            initial_state: vec![0; domain_sizes.len()],
            ..Default::default()
        }
    }

    fn projection(task: &PlanningTask, variables: Vec<usize>) -> Projection {
        let pattern = Pattern::normalized(variables, task.variables.len()).expect("valid pattern");
        Projection::new(task, pattern).expect("small pattern")
    }

    #[test]
    fn rank_and_unrank_are_inverse() {
        let task = task_with_domains(&[3, 2, 4, 5]);
        let projection = projection(&task, vec![0, 2, 3]);
        assert_eq!(60, projection.num_abstract_states());

        for index in 0..projection.num_abstract_states() {
            let mut values = vec![0; 4];
            for (position, &var) in projection.pattern().iter().enumerate() {
                values[var] = projection.unrank(index, position);
            }
            values[1] = 1;

            assert_eq!(index, projection.rank(&values));
        }
    }

    #[test]
    fn abstract_facts_name_the_pattern_variables() {
        let task = task_with_domains(&[3, 2, 4]);
        let projection = projection(&task, vec![0, 2]);

        // 7 = 1 * 1 + 2 * 3
        assert_eq!(
            vec![FactPair::new(0, 1), FactPair::new(2, 2)],
            projection.abstract_facts(7)
        );
        assert_eq!("p_0_2", &*projection.abstraction_name());
    }

    #[test]
    fn abstract_successors_follow_the_pattern_effects() {
        let task = test_tasks::two_switches();
        let projection = projection(&task, vec![1]);

        // set-a neither requires nor changes b, so it loops in both abstract states.
        assert_eq!(Some(0), projection.abstract_successor(&task.operators[0], 0));
        assert_eq!(Some(1), projection.abstract_successor(&task.operators[0], 1));
        // set-b requires b = 0 and sets it to 1.
        assert_eq!(Some(1), projection.abstract_successor(&task.operators[1], 0));
        assert_eq!(None, projection.abstract_successor(&task.operators[1], 1));
    }

    #[test]
    fn too_large_patterns_are_rejected() {
        let task = task_with_domains(&[1 << 16, 1 << 16]);
        let pattern = Pattern::normalized(vec![0, 1], 2).expect("valid pattern");

        assert!(matches!(
            Projection::new(&task, pattern),
            Err(PdbError::PatternTooLarge { .. })
        ));
    }

    #[test]
    fn conditional_effects_are_not_supported() {
        let mut task = test_tasks::two_switches();
        task.operators[0].effects[0].conditions = vec![FactPair::new(1, 0)];
        let pattern = Pattern::normalized(vec![0], 2).expect("valid pattern");

        assert!(matches!(
            Projection::new(&task, pattern),
            Err(PdbError::UnsupportedTask(TaskError::ConditionalEffects { .. }))
        ));
    }
}
