use std::fmt::Debug;

use log::info;

use super::Pattern;
use super::PdbError;
use crate::task::AbstractTask;

/// Chooses a single pattern for a task.
pub trait PatternGenerator: Debug {
    fn name(&self) -> &str;

    fn generate(&self, task: &dyn AbstractTask) -> Result<Pattern, PdbError>;
}

/// Chooses a collection of patterns for a task, whose heuristics are combined by maximizing.
pub trait PatternCollectionGenerator: Debug {
    fn name(&self) -> &str;

    fn generate(&self, task: &dyn AbstractTask) -> Result<Vec<Pattern>, PdbError>;
}

/// A pattern given by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualPattern {
    variables: Vec<usize>,
}

impl ManualPattern {
    pub fn new(variables: Vec<usize>) -> ManualPattern {
        ManualPattern { variables }
    }
}

impl PatternGenerator for ManualPattern {
    fn name(&self) -> &str {
        "manual pattern"
    }

    fn generate(&self, task: &dyn AbstractTask) -> Result<Pattern, PdbError> {
        let pattern = Pattern::normalized(self.variables.clone(), task.num_variables())?;
        info!("Manual pattern: {pattern}");
        Ok(pattern)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GreedyPatternOptions {
    /// The largest number of abstract states of a generated pattern.
    pub max_states: usize,
}

impl Default for GreedyPatternOptions {
    fn default() -> Self {
        GreedyPatternOptions {
            max_states: 1_000_000,
        }
    }
}

/// Adds the goal variables, then all other variables, to the pattern until the next one would
/// make the abstraction larger than the limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GreedyPattern {
    options: GreedyPatternOptions,
}

impl GreedyPattern {
    pub fn new(options: GreedyPatternOptions) -> GreedyPattern {
        GreedyPattern { options }
    }
}

impl PatternGenerator for GreedyPattern {
    fn name(&self) -> &str {
        "greedy pattern"
    }

    fn generate(&self, task: &dyn AbstractTask) -> Result<Pattern, PdbError> {
        let mut order = Vec::with_capacity(task.num_variables());
        let mut seen = vec![false; task.num_variables()];
        let goal_variables = task.goals().iter().map(|goal| goal.var);
        for var in goal_variables.chain(0..task.num_variables()) {
            if !seen[var] {
                seen[var] = true;
                order.push(var);
            }
        }

        let mut variables = Vec::new();
        let mut size = 1_usize;
        for var in order {
            match size.checked_mul(task.domain_size(var)) {
                Some(next) if next <= self.options.max_states => {
                    size = next;
                    variables.push(var);
                }
                _ => break,
            }
        }

        let pattern = Pattern::normalized(variables, task.num_variables())?;
        info!("Greedy pattern: {pattern}");
        Ok(pattern)
    }
}

/// One greedy pattern and a singleton pattern for every goal variable the greedy pattern misses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComboPatterns {
    options: GreedyPatternOptions,
}

impl ComboPatterns {
    pub fn new(options: GreedyPatternOptions) -> ComboPatterns {
        ComboPatterns { options }
    }
}

impl PatternCollectionGenerator for ComboPatterns {
    fn name(&self) -> &str {
        "combo pattern collection"
    }

    fn generate(&self, task: &dyn AbstractTask) -> Result<Vec<Pattern>, PdbError> {
        let large_pattern = GreedyPattern::new(self.options).generate(task)?;
        let mut used = vec![false; task.num_variables()];
        for &var in large_pattern.iter() {
            used[var] = true;
        }

        let mut patterns = vec![large_pattern];
        for goal in task.goals() {
            if !used[goal.var] {
                used[goal.var] = true;
                patterns.push(Pattern::normalized(vec![goal.var], task.num_variables())?);
            }
        }

        info!("Combo pattern collection: {} pattern(s)", patterns.len());
        Ok(patterns)
    }
}
