use sprout_solver::components::ConfigurationError;
use sprout_solver::pdbs::PdbError;
use sprout_solver::proof::ProofError;
use sprout_solver::sas::SasError;
use sprout_solver::search::SearchStatus;
use thiserror::Error;

pub(crate) type SproutResult<T> = Result<T, SproutError>;

#[derive(Error, Debug)]
pub(crate) enum SproutError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Failed to read the task, more details: {0}")]
    InvalidTask(#[from] SasError),
    #[error("Invalid search configuration, more details: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Failed to assemble the proof, more details: {0}")]
    Proof(#[from] ProofError),
    #[error("Proof generation for {0} is not supported.")]
    ProofGenerationNotSupported(String),
}

impl SproutError {
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            SproutError::IOError(_) | SproutError::Proof(_) => ExitCode::SearchCriticalError,
            SproutError::Configuration(ConfigurationError::Pdb(PdbError::UnsupportedTask(_))) => {
                ExitCode::SearchUnsupported
            }
            SproutError::InvalidTask(_)
            | SproutError::Configuration(_)
            | SproutError::ProofGenerationNotSupported(_) => ExitCode::SearchInputError,
        }
    }
}

/// The exit codes of the planner, shared with the scripts which drive it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExitCode {
    Success,
    /// The whole state space was explored without finding a plan.
    SearchUnsolvable,
    /// No plan was found, but the search was not complete.
    SearchUnsolvedIncomplete,
    SearchOutOfTime,
    SearchCriticalError,
    SearchInputError,
    SearchUnsupported,
}

impl ExitCode {
    /// The exit code for a search which ended with `status`. A search under a cost bound which
    /// ends without a plan only shows that no cheaper plan exists.
    pub(crate) fn for_status(status: SearchStatus, bounded: bool) -> ExitCode {
        match status {
            SearchStatus::Solved => ExitCode::Success,
            SearchStatus::Failed if bounded => ExitCode::SearchUnsolvedIncomplete,
            SearchStatus::Failed => ExitCode::SearchUnsolvable,
            SearchStatus::Timeout => ExitCode::SearchOutOfTime,
            SearchStatus::InProgress => ExitCode::SearchCriticalError,
        }
    }

    pub(crate) fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::SearchUnsolvable => 11,
            ExitCode::SearchUnsolvedIncomplete => 12,
            ExitCode::SearchOutOfTime => 23,
            ExitCode::SearchCriticalError => 32,
            ExitCode::SearchInputError => 33,
            ExitCode::SearchUnsupported => 34,
        }
    }
}
