//! Interned states and the registry that owns them.

mod state_registry;
mod successor_generator;

use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Index;
use std::rc::Rc;

pub use state_registry::*;
pub use successor_generator::*;

use crate::containers::StorageKey;

/// The dense id of a registered state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StorageKey for StateId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        StateId(index as u32)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A handle to a registered state. Cloning the handle does not copy the values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    id: StateId,
    values: Rc<[usize]>,
}

impl State {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }
}

impl Index<usize> for State {
    type Output = usize;

    fn index(&self, var: usize) -> &Self::Output {
        &self.values[var]
    }
}
