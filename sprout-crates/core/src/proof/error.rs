use pbp_format::AssembleError;

/// The errors which can occur when the certificate is assembled after the search.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("failed to write the certificate: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to assemble the certificate: {0}")]
    Assemble(#[from] AssembleError),
}
