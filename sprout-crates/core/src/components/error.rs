use thiserror::Error;

use super::ComponentId;
use crate::pdbs::PdbError;
use crate::task::OperatorCost;

/// Errors which prevent a search from being built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("the cost bound must not be negative, got {0}")]
    NegativeBound(i32),
    #[error("an open list needs at least one evaluator")]
    NoEvaluators,
    #[error("component {0} is referenced but not defined")]
    UnknownComponent(ComponentId),
    #[error("component {0} depends on itself")]
    CyclicComponent(ComponentId),
    #[error("weights must be positive, got {0}")]
    NonPositiveWeight(i32),
    /// Proofs reason about the real operator costs.
    #[error("proof logging requires normal operator costs, got {0:?}")]
    ProofRequiresNormalCost(OperatorCost),
    /// A bound removes transitions which the proof has to account for.
    #[error("proof logging does not support a cost bound, got {0}")]
    ProofWithBound(i32),
    #[error(transparent)]
    Pdb(#[from] PdbError),
}
