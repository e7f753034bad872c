use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;

/// Logs statistics under the name of the component they belong to.
///
/// The name is built from scopes, outermost first: the expanded states of the search end up as
/// `search_expanded_states`, the counters of a pruning method as `search_pruning_{method}_...`.
/// Scopes are often evaluator or method names such as `max(pdb_p_0, blind)`, so every character
/// which may not appear in a statistic name is replaced by an underscore.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    name: String,
}

impl StatisticLogger {
    pub fn new(scopes: impl IntoIterator<Item = impl Display>) -> StatisticLogger {
        StatisticLogger {
            name: scopes
                .into_iter()
                .map(|scope| statistic_name(&scope.to_string()))
                .filter(|scope| !scope.is_empty())
                .join("_"),
        }
    }

    /// The logger for `scope` within the scope of this logger.
    pub fn scoped(&self, scope: impl Display) -> StatisticLogger {
        let scope = statistic_name(&scope.to_string());
        let name = match (self.name.is_empty(), scope.is_empty()) {
            (true, _) => scope,
            (false, true) => self.name.clone(),
            (false, false) => format!("{}_{scope}", self.name),
        };
        StatisticLogger { name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name, value);
    }
}

/// `scope` with every character outside `[A-Za-z0-9_]` replaced, and without leading or trailing
/// underscores.
fn statistic_name(scope: &str) -> String {
    scope
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .trim_matches('_')
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_joined_outermost_first() {
        let search = StatisticLogger::new(["search"]);

        assert_eq!("search", search.name());
        assert_eq!(
            "search_pruning_null_successors_before_pruning",
            search
                .scoped("pruning")
                .scoped("null")
                .scoped("successors_before_pruning")
                .name()
        );
    }

    #[test]
    fn evaluator_names_become_valid_statistic_names() {
        let logger = StatisticLogger::new(["evaluator", "max(pdb_p_0, blind)"]);

        assert_eq!("evaluator_max_pdb_p_0__blind", logger.name());
    }

    #[test]
    fn empty_scopes_are_skipped() {
        assert_eq!("proof", StatisticLogger::default().scoped("proof").name());
        assert_eq!("proof", StatisticLogger::new(["", "proof"]).scoped("()").name());
    }
}
