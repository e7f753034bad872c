//! The data shape of landmarks and a heuristic built on the goal landmarks of a task.
mod goal_landmarks;
mod landmark;
mod landmark_sum_heuristic;

pub use goal_landmarks::*;
pub use landmark::*;
pub use landmark_sum_heuristic::*;
