//! # Sprout
//! Sprout is an optimal classical planner. It solves tasks with finite-domain variables, as
//! written by the translator in the SAS format, with eager best-first search. Search is guided by
//! heuristics such as pattern databases.
//!
//! A distinguishing feature of Sprout is that it can produce a _certificate of optimality_: a
//! pseudo-Boolean proof, checkable against the encoding of the task, which shows that no plan is
//! cheaper than the one found.
//!
//! # Using Sprout
//! The first step is to **read a task**, either from a file with [`sas::read_task_file`] or from
//! any other source with a [`sas::SasReader`]. A search is then described by a
//! [`components::SearchConfiguration`] and built on top of the task:
//! ```rust
//! # use std::rc::Rc;
//! # use sprout_solver::components::ComponentSpec;
//! # use sprout_solver::components::SearchConfiguration;
//! # use sprout_solver::proof::ProofSession;
//! # use sprout_solver::sas::SasReader;
//! # use sprout_solver::search::termination::Indefinite;
//! # use sprout_solver::search::EagerSearchOptions;
//! # use sprout_solver::search::SearchStatus;
//! let source = "begin_version\n3\nend_version\nbegin_metric\n1\nend_metric\n\
//!     1\nbegin_variable\nvar0\n-1\n2\nAtom off()\nAtom on()\nend_variable\n\
//!     0\nbegin_state\n0\nend_state\nbegin_goal\n1\n0 1\nend_goal\n\
//!     1\nbegin_operator\nswitch-on\n0\n1\n0 0 0 1\n2\nend_operator\n0\n";
//! let task = SasReader::new(source.as_bytes())
//!     .read_task()
//!     .expect("valid task");
//!
//! let mut search = SearchConfiguration::astar(ComponentSpec::Blind, EagerSearchOptions::default())
//!     .build(Rc::new(task), ProofSession::default())
//!     .expect("valid configuration");
//!
//! assert_eq!(SearchStatus::Solved, search.search(Indefinite));
//! ```
//!
//! To certify the plan, pass a session created with [`proof::ProofSession::create`] instead of
//! the default one, and close it with [`search::EagerSearch::finalize_proof`] once the search
//! has finished.
pub mod sas;

pub use sprout_core::*;
