use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Deref;

use itertools::Itertools;
use log::warn;

use super::PdbError;

/// A sorted, duplicate-free list of variables onto which the task is projected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<usize>);

impl Pattern {
    /// Sorts `variables` and removes duplicates. Fails if a variable does not exist in a task
    /// with `num_variables` variables.
    pub fn normalized(
        mut variables: Vec<usize>,
        num_variables: usize,
    ) -> Result<Pattern, PdbError> {
        if let Some(&variable) = variables.iter().find(|&&var| var >= num_variables) {
            return Err(PdbError::InvalidPattern {
                variable,
                num_variables,
            });
        }

        variables.sort_unstable();
        let length = variables.len();
        variables.dedup();
        if variables.len() != length {
            warn!("Removed duplicate variables from the pattern {variables:?}");
        }

        Ok(Pattern(variables))
    }

    pub fn variables(&self) -> &[usize] {
        &self.0
    }

    /// The name of the pattern in proofs, e.g. `p_0_2`.
    pub fn proof_name(&self) -> String {
        std::iter::once("p".to_owned())
            .chain(self.0.iter().map(ToString::to_string))
            .join("_")
    }
}

impl Deref for Pattern {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_are_sorted_and_deduplicated() {
        let pattern = Pattern::normalized(vec![3, 0, 3, 1], 4).expect("all variables exist");

        assert_eq!(&[0, 1, 3], pattern.variables());
        assert_eq!("p_0_1_3", pattern.proof_name());
        assert_eq!("[0, 1, 3]", pattern.to_string());
    }

    #[test]
    fn unknown_variables_are_rejected() {
        assert_eq!(
            Err(PdbError::InvalidPattern {
                variable: 4,
                num_variables: 4
            }),
            Pattern::normalized(vec![0, 4], 4)
        );
    }

    #[test]
    fn the_empty_pattern_has_a_name() {
        assert_eq!("p", Pattern::default().proof_name());
    }
}
