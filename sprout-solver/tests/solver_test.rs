#![cfg(test)]

mod helpers;

use std::fs::File;

use helpers::instance_path;
use helpers::run_planner;
use helpers::run_planner_on;
use helpers::run_planner_with_proof;
use pbp_format::reader::ProofReader;
use pbp_format::steps::Closing;
use pbp_format::steps::Step;

const DELIVERY_PLAN: &str = "\
(drive l0 l1)
(load l1)
(drive l1 l2)
(unload l2)
; cost = 6 (general cost)
";

macro_rules! optimal_plan_test {
    ($name:ident, $instance:literal, [$($arg:literal),*], $plan:expr) => {
        #[test]
        fn $name() {
            let run = run_planner(stringify!($name), $instance, [$($arg),*]);

            assert_eq!(0, run.exit_code, "{}", run.log());
            assert_eq!($plan, run.plan());

            run.cleanup();
        }
    };
}

optimal_plan_test!(astar_blind, "delivery", ["--heuristic", "blind"], DELIVERY_PLAN);
optimal_plan_test!(astar_greedy_pattern, "delivery", ["--heuristic", "pdb"], DELIVERY_PLAN);
optimal_plan_test!(
    astar_manual_pattern,
    "delivery",
    ["--heuristic", "pdb", "--pattern", "1"],
    DELIVERY_PLAN
);
optimal_plan_test!(
    astar_combo,
    "delivery",
    ["--heuristic", "combo", "--max-states", "4"],
    DELIVERY_PLAN
);
optimal_plan_test!(
    astar_with_reopening,
    "delivery",
    ["--heuristic", "pdb", "--reopen-closed"],
    DELIVERY_PLAN
);
optimal_plan_test!(
    astar_unit_costs,
    "two_switches",
    ["--heuristic", "blind", "--cost-type", "one"],
    "(set-a)\n(set-b)\n; cost = 3 (general cost)\n"
);

#[test]
fn weighted_and_greedy_searches_find_plans() {
    for (test_name, args) in [
        ("wastar", &["--search", "wastar", "--weight", "3"][..]),
        ("greedy_lmsum", &["--search", "greedy", "--heuristic", "lmsum"][..]),
        ("pareto", &["--search", "pareto", "--heuristic", "pdb"][..]),
    ] {
        let run = run_planner(test_name, "delivery", args.iter().copied());

        assert_eq!(0, run.exit_code, "{}", run.log());
        assert!(run.plan().ends_with("(general cost)\n"));

        run.cleanup();
    }
}

#[test]
fn certificates_are_written_and_parse() {
    for heuristic in ["blind", "pdb", "combo"] {
        let run = run_planner_with_proof(
            &format!("proof_{heuristic}"),
            "two_switches",
            ["--heuristic", heuristic],
        );
        assert_eq!(0, run.exit_code, "{}", run.log());

        let proof = ProofReader::new(
            File::open(run.proof_dir.join("plan.pbp")).expect("the proof was written"),
        )
        .read_to_end()
        .expect("the proof parses");
        assert!(matches!(proof.first(), Some(Step::Header { .. })));
        assert!(matches!(proof.last(), Some(Step::Closing(Closing::End))));

        let task = ProofReader::new(
            File::open(run.proof_dir.join("task.opb")).expect("the encoding was written"),
        )
        .read_to_end()
        .expect("the encoding parses");
        assert!(task.iter().any(|step| matches!(step, Step::Constraint(_))));

        run.cleanup();
    }
}

#[test]
fn statistics_are_logged_on_request() {
    let run = run_planner(
        "statistics",
        "delivery",
        ["--heuristic", "blind", "--log-statistics"],
    );

    assert_eq!(0, run.exit_code);
    let log = run.log();
    assert!(log.contains("%%%sprout-stat:"), "{log}");
    assert!(log.contains("%%%sprout-stat-end"), "{log}");

    run.cleanup();
}

#[test]
fn unsolvable_tasks_exit_with_11() {
    for heuristic in ["blind", "pdb"] {
        let run = run_planner(
            &format!("unsolvable_{heuristic}"),
            "unsolvable",
            ["--heuristic", heuristic],
        );

        assert_eq!(11, run.exit_code, "{}", run.log());
        assert!(!run.plan_file.exists());

        run.cleanup();
    }
}

#[test]
fn bounded_searches_without_a_plan_exit_with_12() {
    let run = run_planner("bounded", "delivery", ["--heuristic", "blind", "--bound", "6"]);

    assert_eq!(12, run.exit_code, "{}", run.log());

    run.cleanup();
}

#[test]
fn exhausted_time_limits_exit_with_23() {
    let run = run_planner(
        "timeout",
        "delivery",
        ["--heuristic", "blind", "--time-limit", "0"],
    );

    assert_eq!(23, run.exit_code, "{}", run.log());

    run.cleanup();
}

#[test]
fn invalid_input_exits_with_33() {
    let missing = run_planner_on(
        "missing_task",
        &instance_path("does_not_exist"),
        ["--heuristic", "blind"],
        false,
    );
    assert_eq!(33, missing.exit_code);
    missing.cleanup();

    let unknown_variable = run_planner(
        "unknown_variable",
        "delivery",
        ["--heuristic", "pdb", "--pattern", "0,7"],
    );
    assert_eq!(33, unknown_variable.exit_code);
    unknown_variable.cleanup();

    let uncertified = run_planner_with_proof("uncertified", "delivery", ["--search", "greedy"]);
    assert_eq!(33, uncertified.exit_code);
    uncertified.cleanup();

    let bounded = run_planner_with_proof(
        "bounded_proof",
        "delivery",
        ["--heuristic", "blind", "--bound", "7"],
    );
    assert_eq!(33, bounded.exit_code, "{}", bounded.log());
    assert!(!bounded.proof_dir.join("plan.pbp").exists());
    bounded.cleanup();
}

#[test]
fn unsupported_task_features_exit_with_34() {
    let run = run_planner("axioms", "axioms", ["--heuristic", "pdb"]);

    assert_eq!(34, run.exit_code, "{}", run.log());

    run.cleanup();
}
