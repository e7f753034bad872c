use thiserror::Error;

/// Task features which a component does not support.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The task derives variables through axioms.
    #[error("{component} does not support axioms")]
    Axioms { component: String },
    /// Some operator has an effect that depends on a condition.
    #[error("{component} does not support conditional effects")]
    ConditionalEffects { component: String },
}
