use std::collections::BTreeMap;
use std::collections::VecDeque;

use super::OpenList;
use crate::evaluation::EvaluationContext;
use crate::evaluation::EvaluatorId;
use crate::evaluation::EvaluatorStore;

/// Orders the entries by the value of a single evaluator.
#[derive(Debug)]
pub struct BestFirstOpenList<Entry> {
    buckets: BTreeMap<i32, VecDeque<Entry>>,
    size: usize,
    evaluator: EvaluatorId,
    preferred_only: bool,
}

impl<Entry> BestFirstOpenList<Entry> {
    pub fn new(evaluator: EvaluatorId, preferred_only: bool) -> BestFirstOpenList<Entry> {
        BestFirstOpenList {
            buckets: BTreeMap::new(),
            size: 0,
            evaluator,
            preferred_only,
        }
    }
}

impl<Entry: std::fmt::Debug> OpenList<Entry> for BestFirstOpenList<Entry> {
    fn do_insertion(
        &mut self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
        entry: Entry,
    ) {
        let key = evaluators.value(self.evaluator, context);
        self.buckets.entry(key).or_default().push_back(entry);
        self.size += 1;
    }

    fn remove_min(&mut self) -> Option<Entry> {
        let mut bucket = self.buckets.first_entry()?;
        let entry = bucket.get_mut().pop_front();
        if bucket.get().is_empty() {
            let _ = bucket.remove();
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
        self.size = 0;
    }

    fn is_dead_end(
        &self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
    ) -> bool {
        evaluators.is_infinite(self.evaluator, context)
    }

    fn is_reliable_dead_end(
        &self,
        evaluators: &mut EvaluatorStore,
        context: &mut EvaluationContext<'_>,
    ) -> bool {
        self.is_dead_end(evaluators, context)
            && evaluators.get(self.evaluator).dead_ends_are_reliable()
    }

    fn only_contains_preferred_entries(&self) -> bool {
        self.preferred_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_list::tests::context_with_g;
    use crate::open_list::tests::ShiftedG;
    use crate::proof::ProofSession;

    #[test]
    fn equal_keys_leave_in_insertion_order() {
        let mut evaluators = EvaluatorStore::default();
        let g = evaluators.add(ShiftedG::new(0));
        let mut open_list = BestFirstOpenList::new(g, false);
        let mut proof = ProofSession::default();

        for entry in ["e1", "e2", "e3"] {
            open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, 4), entry);
        }

        assert_eq!(Some("e1"), open_list.remove_min());
        assert_eq!(Some("e2"), open_list.remove_min());
        assert_eq!(Some("e3"), open_list.remove_min());
        assert_eq!(None, open_list.remove_min());
    }

    #[test]
    fn smallest_key_is_removed_first() {
        let mut evaluators = EvaluatorStore::default();
        let g = evaluators.add(ShiftedG::new(0));
        let mut open_list = BestFirstOpenList::new(g, false);
        let mut proof = ProofSession::default();

        for (entry, key) in [("late", 7), ("early", 2), ("middle", 5)] {
            open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, key), entry);
        }

        assert_eq!(3, open_list.len());
        assert_eq!(Some("early"), open_list.remove_min());
        assert_eq!(Some("middle"), open_list.remove_min());
        assert_eq!(Some("late"), open_list.remove_min());
        assert!(open_list.is_empty());
    }

    #[test]
    fn dead_ends_are_not_inserted() {
        let mut evaluators = EvaluatorStore::default();
        let g = evaluators.add(ShiftedG {
            dead_ends: vec![3],
            ..ShiftedG::new(0)
        });
        let mut open_list = BestFirstOpenList::new(g, false);
        let mut proof = ProofSession::default();

        open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, 3), "dead");

        assert!(open_list.is_empty());
    }

    #[test]
    fn preferred_only_list_skips_other_entries() {
        let mut evaluators = EvaluatorStore::default();
        let g = evaluators.add(ShiftedG::new(0));
        let mut open_list = BestFirstOpenList::new(g, true);
        let mut proof = ProofSession::default();

        open_list.insert(&mut evaluators, &mut context_with_g(&mut proof, 1), "skipped");

        assert!(open_list.is_empty());
    }
}
