//! Describing a search declaratively and building it.
//!
//! A [`SearchConfiguration`] names its evaluators by [`ComponentId`] and describes each with a
//! [`ComponentSpec`]. Building resolves the specs through a [`ComponentCache`], so an evaluator
//! referenced from several places (for example the heuristic of A*, which is part of `f` and
//! breaks ties) is constructed once and shared.
mod component_cache;
mod component_spec;
mod error;
mod search_configuration;

pub use component_cache::*;
pub use component_spec::*;
pub use error::*;
pub use search_configuration::*;
