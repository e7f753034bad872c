use crate::containers::KeyedVec;
use crate::sprout_assert_eq_moderate;
use crate::sprout_assert_moderate;
use crate::state::StateId;
use crate::task::OperatorId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeStatus {
    /// The state has not been reached yet.
    #[default]
    New,
    Open,
    Closed,
    /// No goal can be reached from the state.
    DeadEnd,
}

/// What the search knows about one state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchNodeInfo {
    status: NodeStatus,
    /// The cost of the best known path under the adjusted operator costs.
    g: i32,
    /// The cost of the same path under the costs of the task.
    real_g: i32,
    parent: Option<StateId>,
    creating_operator: Option<OperatorId>,
}

impl SearchNodeInfo {
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn is_new(&self) -> bool {
        self.status == NodeStatus::New
    }

    pub fn is_open(&self) -> bool {
        self.status == NodeStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == NodeStatus::Closed
    }

    pub fn is_dead_end(&self) -> bool {
        self.status == NodeStatus::DeadEnd
    }

    pub fn g(&self) -> i32 {
        sprout_assert_moderate!(!self.is_new(), "a new node has no g value");
        self.g
    }

    pub fn real_g(&self) -> i32 {
        sprout_assert_moderate!(!self.is_new(), "a new node has no g value");
        self.real_g
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    pub fn creating_operator(&self) -> Option<OperatorId> {
        self.creating_operator
    }
}

/// The transition that leads from a parent node to one of its successors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub parent: StateId,
    pub operator: OperatorId,
    /// The cost of the operator under the cost type of the search.
    pub adjusted_cost: i32,
    /// The cost of the operator in the task.
    pub cost: i32,
}

/// The search nodes of one search, one per registered state.
///
/// Every status change checks the status the node is expected to be in.
#[derive(Debug, Default)]
pub struct SearchSpace {
    infos: KeyedVec<StateId, SearchNodeInfo>,
}

impl SearchSpace {
    /// The node of `state`, which is [`NodeStatus::New`] if the search never touched it.
    pub fn node(&self, state: StateId) -> SearchNodeInfo {
        self.infos.get(state).copied().unwrap_or_default()
    }

    /// The number of states the search has touched.
    pub fn len(&self) -> usize {
        self.infos.iter().filter(|info| !info.is_new()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn open_initial(&mut self, state: StateId) {
        let info = self.info_mut(state);
        sprout_assert_eq_moderate!(NodeStatus::New, info.status);

        *info = SearchNodeInfo {
            status: NodeStatus::Open,
            g: 0,
            real_g: 0,
            parent: None,
            creating_operator: None,
        };
    }

    pub fn open_new_node(&mut self, state: StateId, transition: Transition) {
        sprout_assert_eq_moderate!(NodeStatus::New, self.node(state).status);
        self.update_parent(state, transition);
        self.infos[state].status = NodeStatus::Open;
    }

    pub fn reopen_closed_node(&mut self, state: StateId, transition: Transition) {
        sprout_assert_eq_moderate!(NodeStatus::Closed, self.node(state).status);
        self.update_parent(state, transition);
        self.infos[state].status = NodeStatus::Open;
    }

    pub fn update_open_node_parent(&mut self, state: StateId, transition: Transition) {
        sprout_assert_eq_moderate!(NodeStatus::Open, self.node(state).status);
        self.update_parent(state, transition);
    }

    /// Record a cheaper path to a closed node without reopening it. The path traced back from
    /// the node then no longer matches its g value.
    pub fn update_closed_node_parent(&mut self, state: StateId, transition: Transition) {
        sprout_assert_eq_moderate!(NodeStatus::Closed, self.node(state).status);
        self.update_parent(state, transition);
    }

    pub fn close(&mut self, state: StateId) {
        sprout_assert_eq_moderate!(NodeStatus::Open, self.node(state).status);
        self.infos[state].status = NodeStatus::Closed;
    }

    pub fn mark_as_dead_end(&mut self, state: StateId) {
        self.info_mut(state).status = NodeStatus::DeadEnd;
    }

    /// The operators on the path from the initial state to `goal`, in the order they are applied.
    pub fn trace_path(&self, goal: StateId) -> Vec<OperatorId> {
        let mut path = Vec::new();
        let mut current = goal;

        loop {
            let info = self.node(current);
            sprout_assert_moderate!(!info.is_new(), "cannot trace a path through a new node");
            match (info.parent, info.creating_operator) {
                (Some(parent), Some(op)) => {
                    path.push(op);
                    current = parent;
                }
                _ => break,
            }
        }

        path.reverse();
        path
    }

    fn update_parent(&mut self, state: StateId, transition: Transition) {
        let parent = self.node(transition.parent);
        let info = self.info_mut(state);

        info.g = parent.g + transition.adjusted_cost;
        info.real_g = parent.real_g + transition.cost;
        info.parent = Some(transition.parent);
        info.creating_operator = Some(transition.operator);
    }

    fn info_mut(&mut self, state: StateId) -> &mut SearchNodeInfo {
        self.infos.accomodate(state, SearchNodeInfo::default());
        &mut self.infos[state]
    }
}
