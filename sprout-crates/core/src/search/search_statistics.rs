use log::info;

use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of a best-first search.
    SearchStatistics {
        expanded_states: u64,
        reopened_states: u64,
        /// States for which the open list evaluated whether they are dead ends.
        evaluated_states: u64,
        /// Evaluator computations which were not served from a cache.
        evaluations: u64,
        generated_states: u64,
        dead_end_states: u64,
        /// Applicable operators, counted before pruning.
        generated_operators: u64,
        expanded_until_last_jump: u64,
        reopened_until_last_jump: u64,
        evaluated_until_last_jump: u64,
        generated_until_last_jump: u64,
});

impl SearchStatistics {
    /// Logs the counters in a human readable form.
    pub fn print_summary(&self) {
        info!("Expanded {} state(s).", self.expanded_states);
        info!("Reopened {} state(s).", self.reopened_states);
        info!("Evaluated {} state(s).", self.evaluated_states);
        info!("Evaluations: {}", self.evaluations);
        info!("Generated {} state(s).", self.generated_states);
        info!("Dead ends: {} state(s).", self.dead_end_states);
        info!(
            "Expanded until last jump: {} state(s).",
            self.expanded_until_last_jump
        );
        info!(
            "Reopened until last jump: {} state(s).",
            self.reopened_until_last_jump
        );
        info!(
            "Evaluated until last jump: {} state(s).",
            self.evaluated_until_last_jump
        );
        info!(
            "Generated until last jump: {} state(s).",
            self.generated_until_last_jump
        );
    }

    fn basic_statistics(&self) -> String {
        let mut line = format!(
            "{} evaluated, {} expanded",
            self.evaluated_states, self.expanded_states
        );
        if self.reopened_states > 0 {
            line.push_str(&format!(", {} reopened", self.reopened_states));
        }
        line
    }
}

/// Tracks the f values of the expanded nodes and reports every new f-layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FLayerProgress {
    last_f: Option<i32>,
}

impl FLayerProgress {
    /// Reports the f value of the initial state.
    pub fn start(&mut self, f: i32, statistics: &SearchStatistics) {
        self.last_f = Some(f);
        info!("f = {f}, {}", statistics.basic_statistics());
    }

    /// Called for every expanded node. When `f` exceeds all earlier values, a line is logged and
    /// the counters are remembered as the state at the last jump.
    pub fn report(&mut self, f: i32, statistics: &mut SearchStatistics) {
        if self.last_f.is_some_and(|last| f <= last) {
            return;
        }

        self.last_f = Some(f);
        info!("f = {f}, {}", statistics.basic_statistics());

        statistics.expanded_until_last_jump = statistics.expanded_states;
        statistics.reopened_until_last_jump = statistics.reopened_states;
        statistics.evaluated_until_last_jump = statistics.evaluated_states;
        statistics.generated_until_last_jump = statistics.generated_states;
    }

    pub fn last_f(&self) -> Option<i32> {
        self.last_f
    }
}
