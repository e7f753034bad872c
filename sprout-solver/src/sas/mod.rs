//! Reading of planning tasks in the SAS format written by the translator.
//!
//! The format is line based. A task consists of the sections `version`, `metric`, the variables,
//! the mutex groups, the initial `state`, the `goal`, the operators and the axioms (`rule`),
//! where every section except the counts is delimited by `begin_<section>` and `end_<section>`
//! lines. See [`SasReader`] for an example.

mod error;

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

pub use error::SasError;
use sprout_core::task::Axiom;
use sprout_core::task::Effect;
use sprout_core::task::FactPair;
use sprout_core::task::MutexGroup;
use sprout_core::task::Operator;
use sprout_core::task::PlanningTask;
use sprout_core::task::Variable;

/// The versions of the SAS format which can be read. Version 4 only differs from version 3 in the
/// translator writing a pseudo-Boolean encoding next to the task.
const SUPPORTED_VERSIONS: [u32; 2] = [3, 4];

/// Read the task stored at `path`.
pub fn read_task_file(path: impl AsRef<Path>) -> Result<PlanningTask, SasError> {
    let file = File::open(path)?;
    SasReader::new(file).read_task()
}

/// Reads a [`PlanningTask`] from a source in the SAS format.
///
/// # Example
/// ```
/// use sprout_solver::sas::SasReader;
/// use sprout_solver::task::FactPair;
///
/// let source = "\
/// begin_version
/// 3
/// end_version
/// begin_metric
/// 1
/// end_metric
/// 1
/// begin_variable
/// var0
/// -1
/// 2
/// Atom off()
/// Atom on()
/// end_variable
/// 0
/// begin_state
/// 0
/// end_state
/// begin_goal
/// 1
/// 0 1
/// end_goal
/// 1
/// begin_operator
/// switch-on
/// 0
/// 1
/// 0 0 0 1
/// 5
/// end_operator
/// 0
/// ";
///
/// let task = SasReader::new(source.as_bytes())
///     .read_task()
///     .expect("valid task");
///
/// assert_eq!(vec![FactPair::new(0, 1)], task.goals);
/// assert_eq!(5, task.operators[0].cost);
/// ```
#[derive(Debug)]
pub struct SasReader<R> {
    source: BufReader<R>,
    string_buffer: String,
    line_nr: usize,
}

impl<R: Read> SasReader<R> {
    pub fn new(source: R) -> SasReader<R> {
        SasReader {
            source: BufReader::new(source),
            string_buffer: String::new(),
            line_nr: 0,
        }
    }

    pub fn read_task(mut self) -> Result<PlanningTask, SasError> {
        self.read_version()?;
        let use_metric = self.read_metric()?;

        let num_variables = self.read_count("the number of variables")?;
        let variables = (0..num_variables)
            .map(|_| self.read_variable())
            .collect::<Result<Vec<_>, _>>()?;

        let num_mutex_groups = self.read_count("the number of mutex groups")?;
        let mutex_groups = (0..num_mutex_groups)
            .map(|_| self.read_mutex_group(&variables))
            .collect::<Result<Vec<_>, _>>()?;

        let initial_state = self.read_state(&variables)?;
        let goals = self.read_goal(&variables)?;

        let num_operators = self.read_count("the number of operators")?;
        let operators = (0..num_operators)
            .map(|_| self.read_operator(&variables, use_metric))
            .collect::<Result<Vec<_>, _>>()?;

        let num_axioms = self.read_count("the number of axioms")?;
        let axioms = (0..num_axioms)
            .map(|_| self.read_axiom(&variables))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlanningTask {
            variables,
            mutex_groups,
            operators,
            axioms,
            initial_state,
            goals,
            use_metric,
        })
    }

    fn read_version(&mut self) -> Result<(), SasError> {
        self.expect_magic("begin_version")?;
        let version = self.read_count("the file version")?;
        self.expect_magic("end_version")?;

        match u32::try_from(version) {
            Ok(version) if SUPPORTED_VERSIONS.contains(&version) => Ok(()),
            Ok(version) => Err(SasError::UnsupportedVersion(version)),
            Err(_) => Err(self.error(format!("version {version} is out of range"))),
        }
    }

    fn read_metric(&mut self) -> Result<bool, SasError> {
        self.expect_magic("begin_metric")?;
        let use_metric = match self.read_count("the metric flag")? {
            0 => false,
            1 => true,
            other => return Err(self.error(format!("expected metric 0 or 1, found {other}"))),
        };
        self.expect_magic("end_metric")?;
        Ok(use_metric)
    }

    fn read_variable(&mut self) -> Result<Variable, SasError> {
        self.expect_magic("begin_variable")?;
        let name = self.next_line("a variable name")?.trim().to_owned();

        let axiom_layer = match self.read_numbers("an axiom layer", 1)?[0] {
            -1 => None,
            layer => Some(self.to_index(layer)?),
        };

        let domain_size = self.read_count("a domain size")?;
        if domain_size == 0 {
            return Err(self.error(format!("variable {name} has an empty domain")));
        }
        let fact_names = (0..domain_size)
            .map(|_| {
                self.next_line("a fact name")
                    .map(|line| line.trim().to_owned())
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.expect_magic("end_variable")?;

        Ok(Variable {
            name,
            domain_size,
            axiom_layer,
            fact_names,
        })
    }

    fn read_mutex_group(&mut self, variables: &[Variable]) -> Result<MutexGroup, SasError> {
        self.expect_magic("begin_mutex_group")?;
        let facts = self.read_facts(variables)?;
        self.expect_magic("end_mutex_group")?;

        Ok(MutexGroup { facts })
    }

    fn read_state(&mut self, variables: &[Variable]) -> Result<Vec<usize>, SasError> {
        self.expect_magic("begin_state")?;
        let values = (0..variables.len())
            .map(|var| {
                let value = self.read_numbers("an initial value", 1)?[0];
                self.fact(variables, var as i64, value)
                    .map(|fact| fact.value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.expect_magic("end_state")?;

        Ok(values)
    }

    fn read_goal(&mut self, variables: &[Variable]) -> Result<Vec<FactPair>, SasError> {
        self.expect_magic("begin_goal")?;
        let goals = self.read_facts(variables)?;
        self.expect_magic("end_goal")?;

        Ok(goals)
    }

    fn read_operator(
        &mut self,
        variables: &[Variable],
        use_metric: bool,
    ) -> Result<Operator, SasError> {
        self.expect_magic("begin_operator")?;
        let name = self.next_line("an operator name")?.trim().to_owned();

        let mut preconditions = self.read_facts(variables)?;

        let num_effects = self.read_count("the number of effects")?;
        let mut effects = Vec::new();
        for _ in 0..num_effects {
            let numbers = self.read_numbers_line("an effect")?;
            let num_conditions = self.to_index(numbers[0])?;
            if numbers.len() != 1 + 2 * num_conditions + 3 {
                return Err(self.error(format!(
                    "an effect with {num_conditions} condition(s) has {} numbers, expected {}",
                    numbers.len(),
                    1 + 2 * num_conditions + 3
                )));
            }

            let conditions = numbers[1..1 + 2 * num_conditions]
                .chunks_exact(2)
                .map(|pair| self.fact(variables, pair[0], pair[1]))
                .collect::<Result<Vec<_>, _>>()?;

            let [var, pre, post] = [
                numbers[numbers.len() - 3],
                numbers[numbers.len() - 2],
                numbers[numbers.len() - 1],
            ];
            if pre != -1 {
                preconditions.push(self.fact(variables, var, pre)?);
            }
            effects.push(Effect {
                fact: self.fact(variables, var, post)?,
                conditions,
            });
        }

        let cost = self.read_numbers("an operator cost", 1)?[0];
        let cost = i32::try_from(cost)
            .ok()
            .filter(|&cost| cost >= 0)
            .ok_or_else(|| self.error(format!("operator cost {cost} is out of range")))?;
        self.expect_magic("end_operator")?;

        preconditions.sort_unstable();
        preconditions.dedup();

        Ok(Operator {
            name,
            preconditions,
            effects,
            cost: if use_metric { cost } else { 1 },
        })
    }

    /// Axioms are stored as `<var> <old value> <new value>` after their conditions. A known old
    /// value is an extra condition.
    fn read_axiom(&mut self, variables: &[Variable]) -> Result<Axiom, SasError> {
        self.expect_magic("begin_rule")?;
        let mut conditions = self.read_facts(variables)?;

        let numbers = self.read_numbers("an axiom effect", 3)?;
        if numbers[1] != -1 {
            conditions.push(self.fact(variables, numbers[0], numbers[1])?);
        }
        let effect = self.fact(variables, numbers[0], numbers[2])?;
        self.expect_magic("end_rule")?;

        Ok(Axiom { conditions, effect })
    }

    /// Reads a count followed by that many `<var> <value>` lines.
    fn read_facts(&mut self, variables: &[Variable]) -> Result<Vec<FactPair>, SasError> {
        let count = self.read_count("the number of facts")?;
        (0..count)
            .map(|_| {
                let numbers = self.read_numbers("a fact", 2)?;
                self.fact(variables, numbers[0], numbers[1])
            })
            .collect()
    }

    fn fact(&self, variables: &[Variable], var: i64, value: i64) -> Result<FactPair, SasError> {
        let var = self.to_index(var)?;
        let value = self.to_index(value)?;

        match variables.get(var) {
            Some(variable) if value < variable.domain_size => Ok(FactPair::new(var, value)),
            Some(variable) => Err(self.error(format!(
                "value {value} is outside the domain of {} (size {})",
                variable.name, variable.domain_size
            ))),
            None => Err(self.error(format!(
                "variable {var} does not exist, the task has {} variables",
                variables.len()
            ))),
        }
    }

    fn to_index(&self, number: i64) -> Result<usize, SasError> {
        usize::try_from(number).map_err(|_| self.error(format!("expected an index, found {number}")))
    }

    fn read_count(&mut self, expected: &str) -> Result<usize, SasError> {
        let number = self.read_numbers(expected, 1)?[0];
        self.to_index(number)
    }

    /// Reads a line with exactly `count` integers.
    fn read_numbers(&mut self, expected: &str, count: usize) -> Result<Vec<i64>, SasError> {
        let numbers = self.read_numbers_line(expected)?;
        if numbers.len() != count {
            return Err(self.error(format!(
                "expected {count} number(s) for {expected}, found {}",
                numbers.len()
            )));
        }
        Ok(numbers)
    }

    /// Reads a line with at least one integer.
    fn read_numbers_line(&mut self, expected: &str) -> Result<Vec<i64>, SasError> {
        let line = self.next_line(expected)?;
        let numbers = line
            .split_whitespace()
            .map(|token| token.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| self.error(format!("expected {expected}, found '{}'", line.trim())))?;

        if numbers.is_empty() {
            return Err(self.error(format!("expected {expected}, found an empty line")));
        }
        Ok(numbers)
    }

    fn expect_magic(&mut self, magic: &str) -> Result<(), SasError> {
        let line = self.next_line(magic)?;
        if line.trim() != magic {
            return Err(self.error(format!("expected '{magic}', found '{}'", line.trim())));
        }
        Ok(())
    }

    fn next_line(&mut self, expected: &str) -> Result<String, SasError> {
        self.string_buffer.clear();
        let read_bytes = self.source.read_line(&mut self.string_buffer)?;
        if read_bytes == 0 {
            return Err(SasError::UnexpectedEnd {
                expected: expected.to_owned(),
            });
        }

        self.line_nr += 1;
        Ok(self
            .string_buffer
            .trim_end_matches(['\n', '\r'])
            .to_owned())
    }

    fn error(&self, reason: impl Into<String>) -> SasError {
        SasError::Parse {
            line_nr: self.line_nr,
            reason: reason.into(),
        }
    }
}
