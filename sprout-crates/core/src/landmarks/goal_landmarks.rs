use log::debug;

use super::Landmark;
use crate::task::AbstractTask;

/// The atomic landmarks of the goal facts, with every operator that adds a goal fact as one of
/// its achievers.
pub fn goal_landmarks(task: &dyn AbstractTask) -> Vec<Landmark> {
    let landmarks = task
        .goals()
        .iter()
        .map(|&goal| {
            let mut landmark = Landmark::atomic(goal, true);
            landmark.is_derived = task.variables()[goal.var].axiom_layer.is_some();
            landmark.possible_achievers = task
                .operator_ids()
                .filter(|&op| {
                    task.operator(op)
                        .effects
                        .iter()
                        .any(|effect| effect.fact == goal)
                })
                .collect();
            landmark
        })
        .collect::<Vec<_>>();

    debug!("Found {} goal landmark(s)", landmarks.len());
    landmarks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::test_tasks;
    use crate::task::FactPair;
    use crate::task::OperatorId;

    #[test]
    fn goal_facts_are_landmarks_with_their_achievers() {
        let task = test_tasks::two_switches();

        let landmarks = goal_landmarks(&task);

        assert_eq!(2, landmarks.len());
        assert_eq!(vec![FactPair::new(0, 1)], landmarks[0].facts);
        assert_eq!(vec![OperatorId::new(0)], landmarks[0].possible_achievers);
        assert_eq!(vec![OperatorId::new(1)], landmarks[1].possible_achievers);
        assert!(landmarks.iter().all(|landmark| landmark.is_true_in_goal));
    }
}
