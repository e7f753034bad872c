use std::collections::BTreeMap;
use std::collections::VecDeque;

use super::OpenList;
use crate::evaluation::EvaluationContext;
use crate::evaluation::EvaluatorId;
use crate::evaluation::EvaluatorStore;
use crate::sprout_assert_simple;
use crate::Random;

/// Keeps the entries in buckets by the values of several evaluators, and removes entries from a
/// randomly chosen bucket on the Pareto front, i.e. a bucket whose key no other key dominates.
///
/// A key dominates another if it is at most as large in every component and differs from it.
#[derive(Debug)]
pub struct ParetoOpenList<Entry> {
    buckets: BTreeMap<Vec<i32>, VecDeque<Entry>>,
    /// The keys of the buckets on the Pareto front, in the order they joined it.
    nondominated: Vec<Vec<i32>>,
    size: usize,
    evaluators: Vec<EvaluatorId>,
    preferred_only: bool,
    /// Choose a front bucket with a probability proportional to its size, instead of uniformly.
    state_uniform_selection: bool,
    random: Box<dyn Random>,
}

impl<Entry> ParetoOpenList<Entry> {
    pub fn new(
        evaluators: Vec<EvaluatorId>,
        preferred_only: bool,
        state_uniform_selection: bool,
        random: Box<dyn Random>,
    ) -> ParetoOpenList<Entry> {
        sprout_assert_simple!(!evaluators.is_empty());

        ParetoOpenList {
            buckets: BTreeMap::new(),
            nondominated: Vec::new(),
            size: 0,
            evaluators,
            preferred_only,
            state_uniform_selection,
            random,
        }
    }

    fn is_dominated(&self, key: &[i32]) -> bool {
        self.buckets.keys().any(|other| dominates(other, key))
    }

    fn select_key(&mut self) -> Option<Vec<i32>> {
        if self.nondominated.is_empty() {
            return None;
        }

        let index = if self.state_uniform_selection {
            let front_size = self
                .nondominated
                .iter()
                .map(|key| self.buckets.get(key).map_or(0, VecDeque::len))
                .sum::<usize>();
            let mut remaining = self.random.generate_usize_in_range(0..front_size);
            self.nondominated
                .iter()
                .position(|key| {
                    let bucket_size = self.buckets.get(key).map_or(0, VecDeque::len);
                    if remaining < bucket_size {
                        return true;
                    }
                    remaining -= bucket_size;
                    false
                })
                .unwrap_or(0)
        } else {
            self.random
                .generate_usize_in_range(0..self.nondominated.len())
        };

        Some(self.nondominated[index].clone())
    }

    /// Drops the emptied bucket of `key` and moves the keys which only it dominated onto the
    /// front.
    fn remove_key(&mut self, key: &[i32]) {
        let _ = self.buckets.remove(key);
        self.nondominated.retain(|other| other.as_slice() != key);

        let uncovered = self
            .buckets
            .keys()
            .filter(|candidate| dominates(key, candidate))
            .filter(|candidate| !self.is_dominated(candidate))
            .cloned()
            .collect::<Vec<_>>();
        self.nondominated.extend(uncovered);
    }
}

fn dominates(key: &[i32], other: &[i32]) -> bool {
    key != other && key.iter().zip(other).all(|(a, b)| a <= b)
}

impl<Entry: std::fmt::Debug> OpenList<Entry> for ParetoOpenList<Entry> {
    fn do_insertion(
        &mut self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
        entry: Entry,
    ) {
        let key = self
            .evaluators
            .iter()
            .map(|&evaluator| evaluators.value(evaluator, context))
            .collect::<Vec<_>>();

        if !self.buckets.contains_key(&key) && !self.is_dominated(&key) {
            self.nondominated.retain(|other| !dominates(&key, other));
            self.nondominated.push(key.clone());
        }
        self.buckets.entry(key).or_default().push_back(entry);
        self.size += 1;
    }

    fn remove_min(&mut self) -> Option<Entry> {
        let key = self.select_key()?;
        let bucket = self.buckets.get_mut(&key)?;
        let entry = bucket.pop_front();
        if bucket.is_empty() {
            self.remove_key(&key);
        }

        if entry.is_some() {
            self.size -= 1;
        }
        entry
    }

    fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn len(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.nondominated.clear();
        self.size = 0;
    }

    fn is_dead_end(
        &self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
    ) -> bool {
        if self.is_reliable_dead_end(evaluators, context) {
            return true;
        }

        self.evaluators
            .iter()
            .all(|&evaluator| evaluators.is_infinite(evaluator, context))
    }

    fn is_reliable_dead_end(
        &self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
    ) -> bool {
        self.evaluators.iter().any(|&evaluator| {
            evaluators.is_infinite(evaluator, context)
                && evaluators.get(evaluator).dead_ends_are_reliable()
        })
    }

    fn only_contains_preferred_entries(&self) -> bool {
        self.preferred_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::TestRandom;
    use crate::open_list::tests::context_with_g;
    use crate::open_list::tests::ShiftedG;
    use crate::proof::ProofSession;

    /// Two evaluators which pull in opposite directions: `g` and `10 - g`, so that no key
    /// dominates another.
    #[derive(Debug)]
    struct Mirrored;

    impl crate::evaluation::Evaluator for Mirrored {
        fn name(&self) -> &str {
            "mirrored-g"
        }

        fn dead_ends_are_reliable(&self) -> bool {
            true
        }

        fn compute_result(
            &mut self,
            context: &mut EvaluationContext<'_>,
            _: &mut crate::evaluation::Dependencies<'_>,
        ) -> crate::evaluation::EvaluationResult {
            crate::evaluation::EvaluationResult::new(10 - context.g())
        }
    }

    fn choices(usizes: Vec<usize>) -> Box<dyn Random> {
        Box::new(TestRandom {
            usizes,
            position: 0,
        })
    }

    #[test]
    fn dominated_keys_wait_until_the_front_is_empty() {
        let mut evaluators = EvaluatorStore::default();
        let g = evaluators.add(ShiftedG::new(0));
        let shifted = evaluators.add(ShiftedG::new(1));
        let mut open_list = ParetoOpenList::new(vec![g, shifted], false, false, choices(vec![0]));
        let mut proof = ProofSession::default();

        for (entry, g_value) in [("late", 3), ("early", 1), ("middle", 2)] {
            open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, g_value), entry);
        }

        assert_eq!(3, open_list.len());
        assert_eq!(Some("early"), open_list.remove_min());
        assert_eq!(Some("middle"), open_list.remove_min());
        assert_eq!(Some("late"), open_list.remove_min());
        assert!(open_list.is_empty());
        assert_eq!(None, open_list.remove_min());
    }

    #[test]
    fn incomparable_keys_are_chosen_at_random() {
        let mut evaluators = EvaluatorStore::default();
        let g = evaluators.add(ShiftedG::new(0));
        let mirrored = evaluators.add(Mirrored);
        let mut open_list =
            ParetoOpenList::new(vec![g, mirrored], false, false, choices(vec![1, 0, 0]));
        let mut proof = ProofSession::default();

        for (entry, g_value) in [("a", 1), ("b", 2), ("c", 3)] {
            open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, g_value), entry);
        }

        // The front starts out as [a, b, c].
        assert_eq!(Some("b"), open_list.remove_min());
        assert_eq!(Some("a"), open_list.remove_min());
        assert_eq!(Some("c"), open_list.remove_min());
    }

    #[test]
    fn state_uniform_selection_weighs_buckets_by_size() {
        let mut evaluators = EvaluatorStore::default();
        let g = evaluators.add(ShiftedG::new(0));
        let mirrored = evaluators.add(Mirrored);
        let mut open_list =
            ParetoOpenList::new(vec![g, mirrored], false, true, choices(vec![2]));
        let mut proof = ProofSession::default();

        for (entry, g_value) in [("a1", 1), ("a2", 1), ("b", 2)] {
            open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, g_value), entry);
        }

        // Entry 2 of the front [a1, a2, b] lies in the bucket of b.
        assert_eq!(Some("b"), open_list.remove_min());
    }

    #[test]
    fn removing_a_front_key_uncovers_the_keys_it_dominated() {
        let mut evaluators = EvaluatorStore::default();
        let g = evaluators.add(ShiftedG::new(0));
        let mut open_list = ParetoOpenList::new(vec![g], false, false, choices(vec![0]));
        let mut proof = ProofSession::default();

        open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, 4), "dominated");
        open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, 2), "front");
        assert_eq!(vec![vec![2]], open_list.nondominated);

        assert_eq!(Some("front"), open_list.remove_min());
        assert_eq!(vec![vec![4]], open_list.nondominated);
    }

    #[test]
    fn unreliable_dead_ends_need_agreement() {
        let mut evaluators = EvaluatorStore::default();
        let unreliable = evaluators.add(ShiftedG {
            dead_ends: vec![5],
            reliable: false,
            ..ShiftedG::new(0)
        });
        let finite = evaluators.add(ShiftedG::new(0));
        let mut proof = ProofSession::default();

        let mixed = ParetoOpenList::<()>::new(vec![unreliable, finite], false, false, choices(vec![0]));
        assert!(!mixed.is_dead_end(&mut evaluators, &mut context_with_g(&mut proof, 5)));

        let agreeing =
            ParetoOpenList::<()>::new(vec![unreliable, unreliable], false, false, choices(vec![0]));
        assert!(agreeing.is_dead_end(&mut evaluators, &mut context_with_g(&mut proof, 5)));
    }
}
