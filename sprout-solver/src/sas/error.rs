use std::io;

/// The errors that can be encountered when reading a task in the SAS format.
#[derive(Debug, thiserror::Error)]
pub enum SasError {
    #[error("failed to read the task: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse task line {line_nr}: {reason}")]
    Parse { line_nr: usize, reason: String },

    #[error("the task ended while {expected} was expected")]
    UnexpectedEnd { expected: String },

    #[error("SAS file version {0} is not supported")]
    UnsupportedVersion(u32),
}
