//! This crate contains abstractions for dealing with the line-based pseudo-Boolean proof format
//! consumed by VeriPB-style checkers. Planners use it to produce a certificate that a returned plan
//! is optimal.
//!
//! To write proofs see [`writer::ProofWriter`], and to read them back see
//! [`reader::ProofReader`]. A proof that is spread over several files can be stitched together
//! into a single file with [`assemble`].

mod assemble;
mod constraint;
mod names;

pub mod reader;
pub mod steps;
pub mod writer;

pub use assemble::*;
pub use constraint::*;
pub use names::*;
