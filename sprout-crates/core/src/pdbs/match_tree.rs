use super::Projection;
use crate::task::FactPair;

/// A node of the [`MatchTree`]. Inner nodes test the value of one pattern position; the
/// operators stored at a node are those whose preconditions are exactly the tests on the path
/// to it.
#[derive(Debug, Default)]
struct Node {
    /// The pattern position tested at this node, `None` for a leaf.
    position: Option<usize>,
    /// One subtree per value of the tested position.
    successors: Vec<Option<Box<Node>>>,
    /// The subtree of operators which do not care about the tested position.
    star_successor: Option<Box<Node>>,
    operators: Vec<usize>,
}

impl Node {
    fn testing(position: usize, domain_size: usize) -> Node {
        let mut node = Node::default();
        node.initialize(position, domain_size);
        node
    }

    fn initialize(&mut self, position: usize, domain_size: usize) {
        self.position = Some(position);
        self.successors = (0..domain_size).map(|_| None).collect();
    }
}

/// A discrimination tree over the regression preconditions of the abstract operators, which
/// retrieves the operators that are applicable in reverse in an abstract state.
///
/// Positions are tested in increasing order along every path.
#[derive(Debug)]
pub struct MatchTree {
    domain_sizes: Vec<usize>,
    hash_multipliers: Vec<usize>,
    root: Option<Box<Node>>,
}

impl MatchTree {
    pub fn new(projection: &Projection) -> MatchTree {
        let positions = 0..projection.pattern().len();
        MatchTree {
            domain_sizes: positions
                .clone()
                .map(|position| projection.domain_size(position))
                .collect(),
            hash_multipliers: positions
                .map(|position| projection.multiplier(position))
                .collect(),
            root: None,
        }
    }

    /// Insert the operator with index `operator`. Its `regression_preconditions` must be sorted
    /// by position.
    pub fn insert(&mut self, operator: usize, regression_preconditions: &[FactPair]) {
        insert_recursive(
            &mut self.root,
            &self.domain_sizes,
            operator,
            regression_preconditions,
        );
    }

    /// Collects the operators whose regression preconditions hold in the abstract state `index`.
    pub fn applicable_operators(&self, index: usize, result: &mut Vec<usize>) {
        if let Some(root) = self.root.as_deref() {
            self.collect_recursive(root, index, result);
        }
    }

    fn collect_recursive(&self, node: &Node, index: usize, result: &mut Vec<usize>) {
        result.extend_from_slice(&node.operators);

        let Some(position) = node.position else {
            return;
        };

        let value = (index / self.hash_multipliers[position]) % self.domain_sizes[position];
        if let Some(child) = node.successors[value].as_deref() {
            self.collect_recursive(child, index, result);
        }
        if let Some(star) = node.star_successor.as_deref() {
            self.collect_recursive(star, index, result);
        }
    }
}

fn insert_recursive(
    edge: &mut Option<Box<Node>>,
    domain_sizes: &[usize],
    operator: usize,
    regression_preconditions: &[FactPair],
) {
    let Some((fact, remaining)) = regression_preconditions.split_first() else {
        edge.get_or_insert_with(Box::default)
            .operators
            .push(operator);
        return;
    };

    match edge.as_ref().and_then(|node| node.position) {
        None => {
            edge.get_or_insert_with(Box::default)
                .initialize(fact.var, domain_sizes[fact.var]);
        }
        Some(position) if position > fact.var => {
            // The tested position was skipped on the way here: put a node testing it in front,
            // with the existing subtree as its star successor.
            let mut node = Node::testing(fact.var, domain_sizes[fact.var]);
            node.star_successor = edge.take();
            *edge = Some(Box::new(node));
        }
        Some(position) if position < fact.var => {
            let node = edge.get_or_insert_with(Box::default);
            insert_recursive(
                &mut node.star_successor,
                domain_sizes,
                operator,
                regression_preconditions,
            );
            return;
        }
        Some(_) => {}
    }

    let node = edge.get_or_insert_with(Box::default);
    insert_recursive(
        &mut node.successors[fact.value],
        domain_sizes,
        operator,
        remaining,
    );
}
