//! The planning task as the search sees it: finite-domain variables, operators with
//! preconditions, effects and costs, a goal and an initial state.
//!
//! Components only access a task through the [`AbstractTask`] trait, so that a decorated task
//! (see [`CostAdaptedTask`]) can be used wherever the root task can.

mod abstract_task;
mod cost_adapted_task;
mod error;
mod planning_task;
pub mod properties;
#[cfg(test)]
pub(crate) mod test_tasks;

pub use abstract_task::*;
pub use cost_adapted_task::*;
pub use error::*;
pub use planning_task::*;
