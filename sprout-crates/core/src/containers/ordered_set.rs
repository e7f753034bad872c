use std::hash::Hash;

use super::HashSet;

/// A set which remembers the order in which its elements were first inserted.
///
/// Used for preferred operators, where duplicates are dropped but the order in which heuristics
/// report them must be reproducible.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    elements: Vec<T>,
    contained: HashSet<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        OrderedSet {
            elements: Vec::new(),
            contained: HashSet::default(),
        }
    }
}

impl<T: Copy + Eq + Hash> OrderedSet<T> {
    /// Insert `element`, returning whether it was not yet present.
    pub fn insert(&mut self, element: T) -> bool {
        let is_new = self.contained.insert(element);
        if is_new {
            self.elements.push(element);
        }
        is_new
    }

    pub fn contains(&self, element: &T) -> bool {
        self.contained.contains(element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.contained.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }

    /// Remove all elements, returning them in insertion order.
    pub fn take(&mut self) -> Vec<T> {
        self.contained.clear();
        std::mem::take(&mut self.elements)
    }
}
