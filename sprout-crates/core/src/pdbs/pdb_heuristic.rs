use std::rc::Rc;

use itertools::Itertools;
use log::debug;
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::compute_pdb;
use super::compute_pdb_and_plan;
use super::is_concrete_plan;
use super::Pattern;
use super::PatternDatabase;
use super::PdbError;
use crate::containers::OrderedSet;
use crate::evaluation::Heuristic;
use crate::proof::EstimateCertificate;
use crate::proof::ProofSession;
use crate::state::State;
use crate::task::AbstractTask;
use crate::task::OperatorId;

/// Options of a pattern database heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PdbOptions {
    /// Extract an optimal abstract plan from the initial state and log it at debug level.
    pub extract_abstract_plan: bool,
    /// Report every step of the abstract plan as the set of all equivalent operators.
    pub wildcard_plan: bool,
    /// Seeds the tie-breaking between equivalent operators of the abstract plan.
    pub random_seed: u64,
}

impl Default for PdbOptions {
    fn default() -> Self {
        PdbOptions {
            extract_abstract_plan: false,
            wildcard_plan: false,
            random_seed: 42,
        }
    }
}

/// The goal distance of the abstract state of a state in the projection onto a pattern.
#[derive(Debug)]
pub struct PdbHeuristic {
    task: Rc<dyn AbstractTask>,
    pdb: PatternDatabase,
    name: String,
}

impl PdbHeuristic {
    /// Builds the pattern database of `pattern` and records its distances in the proof.
    pub fn new(
        task: Rc<dyn AbstractTask>,
        pattern: Pattern,
        options: PdbOptions,
        proof: &mut ProofSession,
    ) -> Result<PdbHeuristic, PdbError> {
        debug!("Initializing pattern database heuristic...");

        let pdb = if options.extract_abstract_plan {
            let mut random = SmallRng::seed_from_u64(options.random_seed);
            let (pdb, plan) = compute_pdb_and_plan(
                task.as_ref(),
                pattern,
                None,
                &mut random,
                options.wildcard_plan,
            )?;

            debug!(
                "Abstract plan of {}: {}",
                pdb.pattern(),
                plan.iter()
                    .map(|step| {
                        step.iter()
                            .map(|&op| task.operator(op).name.as_str())
                            .join(" | ")
                    })
                    .join(", ")
            );
            if is_concrete_plan(task.as_ref(), &plan) {
                debug!("The abstract plan solves the task");
            }
            pdb
        } else {
            compute_pdb(task.as_ref(), pattern, None)?
        };

        info!(
            "Pattern database of {}: {} abstract states, mean finite h {:.2}",
            pdb.pattern(),
            pdb.distances().len(),
            pdb.mean_finite_h()
        );
        proof.certify_abstraction(task.as_ref(), pdb.projection(), pdb.distances());

        Ok(PdbHeuristic {
            name: format!("pdb_{}", pdb.pattern().proof_name()),
            task,
            pdb,
        })
    }

    pub fn pattern_database(&self) -> &PatternDatabase {
        &self.pdb
    }
}

impl Heuristic for PdbHeuristic {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute_heuristic(
        &mut self,
        state: &State,
        _: &mut OrderedSet<OperatorId>,
        proof: &mut ProofSession,
    ) -> i32 {
        let values = self.task.convert_ancestor_state_values(state.values());
        let index = self.pdb.projection().rank(&values);
        let distance = self.pdb.distances()[index];

        proof.certify_estimate(
            state,
            distance,
            EstimateCertificate::Abstraction {
                abstraction: self.pdb.projection(),
                index,
            },
        );
        distance
    }
}
