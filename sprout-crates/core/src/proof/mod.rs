//! Sprout can certify the optimality of the plans it finds. During search, a [`ProofSession`]
//! records which nodes were expanded and which bounds the heuristics established, as definitions
//! and derivations in the pseudo-Boolean proof format. Once the optimal cost is known the session
//! closes the proof with the lemmas which, together, show that no cheaper plan exists.
//!
//! The proof is checked against `task.opb`, the pseudo-Boolean encoding of the task which is
//! written when the session is created.
mod encoding;
mod error;
mod names;
mod session;
mod task_encoding;

use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;

pub use encoding::BitWidth;
pub use error::*;
pub use names::*;
use session::SessionImpl;

use crate::state::State;
use crate::state::StateId;
use crate::task::AbstractTask;
use crate::task::FactPair;
use crate::task::Operator;
use crate::task::OperatorId;

/// The file with the task encoding.
pub const TASK_FILE: &str = "task.opb";
/// The file which lists the parts of the proof.
pub const META_FILE: &str = "proof.meta";
/// The assembled proof.
pub const PROOF_FILE: &str = "plan.pbp";

/// An abstraction of the task whose abstract states can be described as a conjunction of facts.
pub trait AbstractionEncoding {
    /// The name of the abstraction as it appears in the proof, e.g. `p_0_2`.
    fn abstraction_name(&self) -> Rc<str>;

    fn num_abstract_states(&self) -> usize;

    /// The facts which hold in every concrete state of the abstract state `index`.
    fn abstract_facts(&self, index: usize) -> Vec<FactPair>;

    /// The abstract state reached by applying `operator` in abstract state `index`, or `None` if
    /// the operator is not applicable there.
    fn abstract_successor(&self, operator: &Operator, index: usize) -> Option<usize>;
}

/// What a heuristic estimate rests on.
#[derive(Clone, Copy)]
pub enum EstimateCertificate<'a> {
    /// No operator is cheaper than the estimate, and only goal states are estimated at zero.
    MinimumCost { evaluator: &'a str },
    /// The estimate is the goal distance of abstract state `index`, whose distances were
    /// recorded with [`ProofSession::certify_abstraction`].
    Abstraction {
        abstraction: &'a dyn AbstractionEncoding,
        index: usize,
    },
}

/// The certificate of a search run.
///
/// When no certificate should be produced, use the implementation of [`Default`]; all methods are
/// then no-ops. Failures to write the certificate during search are never reported to the caller;
/// they are logged and mark the session as degraded instead.
#[derive(Debug, Default)]
pub struct ProofSession {
    internal: Option<SessionImpl>,
}

impl ProofSession {
    /// Create a session writing its files to `directory`, which is created if it does not exist.
    ///
    /// The encoding of `task` is written immediately.
    pub fn create(directory: &Path, task: &dyn AbstractTask) -> std::io::Result<ProofSession> {
        Ok(ProofSession {
            internal: Some(SessionImpl::create(directory, task)?),
        })
    }

    /// Also write a gzipped copy of the assembled proof.
    pub fn with_compression(mut self, compress: bool) -> ProofSession {
        if let Some(session) = self.internal.as_mut() {
            session.set_compression(compress);
        }
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.internal.is_some()
    }

    /// Whether some part of the certificate could not be written.
    pub fn is_degraded(&self) -> bool {
        self.internal
            .as_ref()
            .is_some_and(|session| session.is_degraded())
    }

    pub fn bit_width(&self) -> Option<BitWidth> {
        self.internal.as_ref().map(|session| session.bit_width())
    }

    /// Record that the node of `state` with cost `g` was expanded, generating the given
    /// successors.
    pub fn log_expansion(&mut self, state: &State, g: i32, successors: &[(OperatorId, StateId)]) {
        if let Some(session) = self.internal.as_mut() {
            session.log_expansion(state, g, successors);
        }
    }

    /// Record that `h` is a lower bound on the cost of reaching a goal from `state`.
    pub fn certify_estimate(&mut self, state: &State, h: i32, certificate: EstimateCertificate<'_>) {
        if let Some(session) = self.internal.as_mut() {
            session.certify_estimate(state, h, certificate);
        }
    }

    /// Record the goal distances of a freshly built abstraction of `task`.
    pub fn certify_abstraction(
        &mut self,
        task: &dyn AbstractTask,
        abstraction: &dyn AbstractionEncoding,
        distances: &[i32],
    ) {
        if let Some(session) = self.internal.as_mut() {
            session.certify_abstraction(task, abstraction, distances);
        }
    }

    /// Mark the certificate as incomplete, e.g. because the search skips transitions which the
    /// certificate cannot account for.
    pub fn mark_incomplete(&mut self, reason: impl Into<String>) {
        if let Some(session) = self.internal.as_mut() {
            session.mark_incomplete(reason.into());
        }
    }

    /// Close the proof for a plan of cost `optimal_cost` and assemble it.
    ///
    /// Returns the path to the assembled proof, or `None` if the session is disabled.
    pub fn finalize(self, optimal_cost: i32) -> Result<Option<PathBuf>, ProofError> {
        match self.internal {
            Some(session) => session.finalize(optimal_cost).map(Some),
            None => Ok(None),
        }
    }
}
