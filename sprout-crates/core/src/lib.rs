//! # Sprout
//! The core of an optimal classical planner. A task with finite-domain variables is solved by an
//! [`search::EagerSearch`], guided by evaluators such as [`pdbs::PdbHeuristic`]. If requested,
//! a [`proof::ProofSession`] records a pseudo-Boolean certificate which shows that the plan found
//! is optimal.
//!
//! ```rust
//! # use std::rc::Rc;
//! # use sprout_core::components::ComponentSpec;
//! # use sprout_core::components::PatternSpec;
//! # use sprout_core::components::SearchConfiguration;
//! # use sprout_core::proof::ProofSession;
//! # use sprout_core::search::termination::Indefinite;
//! # use sprout_core::search::EagerSearchOptions;
//! # use sprout_core::search::SearchStatus;
//! # use sprout_core::task::Effect;
//! # use sprout_core::task::FactPair;
//! # use sprout_core::task::Operator;
//! # use sprout_core::task::PlanningTask;
//! # use sprout_core::task::Variable;
//! let task = PlanningTask {
//!     variables: vec![Variable {
//!         name: "light".to_owned(),
//!         domain_size: 2,
//!         axiom_layer: None,
//!         fact_names: vec!["Atom off()".to_owned(), "Atom on()".to_owned()],
//!     }],
//!     operators: vec![Operator {
//!         name: "switch-on".to_owned(),
//!         preconditions: vec![FactPair::new(0, 0)],
//!         effects: vec![Effect::unconditional(FactPair::new(0, 1))],
//!         cost: 2,
//!     }],
//!     initial_state: vec![0],
//!     goals: vec![FactPair::new(0, 1)],
//!     use_metric: true,
//!     ..Default::default()
//! };
//!
//! let configuration = SearchConfiguration::astar(
//!     ComponentSpec::Pdb(PatternSpec::Manual(vec![0])),
//!     EagerSearchOptions::default(),
//! );
//! let mut search = configuration
//!     .build(Rc::new(task), ProofSession::default())
//!     .expect("valid configuration");
//!
//! assert_eq!(SearchStatus::Solved, search.search(Indefinite));
//! assert_eq!(1, search.plan().map_or(0, |plan| plan.len()));
//! ```
pub(crate) mod basic_types;
pub mod components;
pub mod containers;
pub mod evaluation;
pub mod landmarks;
pub mod open_list;
pub mod pdbs;
pub mod proof;
pub mod search;
pub mod state;
pub mod statistics;
pub mod task;

#[doc(hidden)]
pub mod asserts;

pub use convert_case;
pub use rand;

pub use crate::basic_types::Random;
