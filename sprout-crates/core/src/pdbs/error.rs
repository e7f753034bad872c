use thiserror::Error;

use super::Pattern;
use crate::task::TaskError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdbError {
    /// The number of abstract states does not fit into the index space.
    #[error("pattern {pattern} is too large: more than {limit} abstract states")]
    PatternTooLarge { pattern: Pattern, limit: usize },
    #[error("pattern variable {variable} does not exist, the task has {num_variables} variables")]
    InvalidPattern {
        variable: usize,
        num_variables: usize,
    },
    #[error(transparent)]
    UnsupportedTask(#[from] TaskError),
}
