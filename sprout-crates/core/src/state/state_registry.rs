use std::rc::Rc;

use super::State;
use super::StateId;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::OperatorId;

/// Interns full variable assignments, handing out one [`StateId`] per distinct assignment.
///
/// The registry is the only component that creates states; everything else refers to them by id
/// or through cheap [`State`] handles.
#[derive(Debug)]
pub struct StateRegistry {
    task: Rc<dyn AbstractTask>,
    states: KeyedVec<StateId, Rc<[usize]>>,
    ids: HashMap<Rc<[usize]>, StateId>,
}

impl StateRegistry {
    pub fn new(task: Rc<dyn AbstractTask>) -> StateRegistry {
        StateRegistry {
            task,
            states: KeyedVec::default(),
            ids: HashMap::default(),
        }
    }

    pub fn initial_state(&mut self) -> State {
        let values = self.task.initial_state_values().to_vec();
        self.register(values)
    }

    /// The state reached by applying `op` in `predecessor`. The operator must be applicable.
    pub fn successor_state(&mut self, predecessor: &State, op: OperatorId) -> State {
        let operator = self.task.operator(op);
        crate::sprout_assert_moderate!(properties::is_applicable(
            operator,
            predecessor.values()
        ));

        let values = properties::apply(operator, predecessor.values());
        self.register(values)
    }

    pub fn lookup_state(&self, id: StateId) -> State {
        State {
            id,
            values: Rc::clone(&self.states[id]),
        }
    }

    /// The number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn register(&mut self, values: Vec<usize>) -> State {
        let values: Rc<[usize]> = values.into();

        if let Some(&id) = self.ids.get(&values) {
            return State {
                id,
                values: Rc::clone(&self.states[id]),
            };
        }

        let id = self.states.push(Rc::clone(&values));
        let _ = self.ids.insert(Rc::clone(&values), id);

        State { id, values }
    }
}
