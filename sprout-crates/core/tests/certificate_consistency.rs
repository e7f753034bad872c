#![cfg(test)]

mod helpers;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;

use helpers::ProofChecker;
use pbp_format::reader::ProofReader;
use pbp_format::reader::ReadStep;
use pbp_format::steps::Closing;
use pbp_format::steps::Step;
use pbp_format::Constraint;
use sprout_core::components::ComponentSpec;
use sprout_core::components::PatternSpec;
use sprout_core::components::SearchConfiguration;
use sprout_core::containers::HashSet;
use sprout_core::proof::ProofSession;
use sprout_core::proof::PROOF_FILE;
use sprout_core::proof::TASK_FILE;
use sprout_core::search::termination::Indefinite;
use sprout_core::search::EagerSearchOptions;
use sprout_core::search::SearchStatus;
use sprout_core::task::AbstractTask;
use sprout_core::task::Effect;
use sprout_core::task::FactPair;
use sprout_core::task::Operator;
use sprout_core::task::PlanningTask;
use sprout_core::task::Variable;

fn variable(name: &str, domain_size: usize) -> Variable {
    Variable {
        name: name.to_owned(),
        domain_size,
        axiom_layer: None,
        fact_names: (0..domain_size)
            .map(|value| format!("Atom {name}({value})"))
            .collect(),
    }
}

/// Two switches, where the second can only be flipped once the first is on. The cheapest plan
/// costs 3.
fn two_switches() -> PlanningTask {
    PlanningTask {
        variables: vec![variable("a", 2), variable("b", 2)],
        operators: vec![
            Operator {
                name: "set-a".to_owned(),
                preconditions: vec![FactPair::new(0, 0)],
                effects: vec![Effect::unconditional(FactPair::new(0, 1))],
                cost: 1,
            },
            Operator {
                name: "set-b".to_owned(),
                preconditions: vec![FactPair::new(0, 1), FactPair::new(1, 0)],
                effects: vec![Effect::unconditional(FactPair::new(1, 1))],
                cost: 2,
            },
        ],
        initial_state: vec![0, 0],
        goals: vec![FactPair::new(0, 1), FactPair::new(1, 1)],
        use_metric: true,
        ..Default::default()
    }
}

fn proof_directory(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "sprout-certificate-{name}-{}",
        std::process::id()
    ))
}

fn read_steps(path: &Path) -> Vec<ReadStep> {
    let file = File::open(path).expect("the file exists");
    ProofReader::new(BufReader::new(file))
        .read_to_end()
        .expect("the file parses")
}

fn mentions(constraint: &Constraint<String>, name: &str) -> bool {
    constraint
        .terms
        .iter()
        .any(|term| term.literal.name == name)
}

/// The files of a certificate, read back after the search.
struct Certificate {
    proof: Vec<ReadStep>,
    task: Vec<ReadStep>,
    bytes: Vec<u8>,
}

/// Solves `task` with A* and the given heuristic while writing a certificate into a directory
/// of its own.
fn certify(name: &str, heuristic: ComponentSpec) -> Certificate {
    let directory = proof_directory(name);
    let task: Rc<dyn AbstractTask> = Rc::new(two_switches());
    let proof = ProofSession::create(&directory, task.as_ref()).expect("writable directory");

    let mut search = SearchConfiguration::astar(heuristic, EagerSearchOptions::default())
        .build(Rc::clone(&task), proof)
        .expect("valid configuration");
    assert_eq!(SearchStatus::Solved, search.search(Indefinite));
    assert!(!search.proof().is_degraded());

    let proof_path = search
        .finalize_proof()
        .expect("the proof is written")
        .expect("a proof was requested");
    assert_eq!(directory.join(PROOF_FILE), proof_path);

    let certificate = Certificate {
        proof: read_steps(&proof_path),
        task: read_steps(&directory.join(TASK_FILE)),
        bytes: std::fs::read(&proof_path).expect("the proof is readable"),
    };
    let _ = std::fs::remove_dir_all(&directory);

    certificate
}

fn labels(proof: &[ReadStep]) -> HashSet<String> {
    let mut labels: HashSet<String> = HashSet::default();
    for step in proof {
        let label = match step {
            Step::Redundance(redundance) => redundance.label.as_ref(),
            Step::ReverseUnitPropagation(rup) => rup.label.as_ref(),
            Step::Polynomial(pol) => pol.label.as_ref(),
            _ => None,
        };
        if let Some(label) = label {
            assert!(labels.insert(label.clone()), "label {label} is used twice");
        }
    }
    labels
}

fn assert_well_formed(proof: &[ReadStep]) {
    assert!(matches!(
        &proof[0],
        Step::Header { version } if version == "2.0"
    ));
    assert!(matches!(proof[1], Step::LoadFormula(_)));
    assert!(matches!(
        &proof[proof.len() - 3..],
        [
            Step::Closing(Closing::Output),
            Step::Closing(Closing::Conclusion),
            Step::Closing(Closing::End),
        ]
    ));

    let labels = labels(proof);
    for lemma in [
        "budget_geq",
        "budget_leq",
        "budget_sanity",
        "spent_exhausts_budget",
        "overspent_budget",
        "budget_full",
        "spent_fills_budget",
    ] {
        assert!(labels.contains(lemma), "{lemma} is missing");
    }
    assert!(labels.contains("balance_leq_-1_Lreif"));
}

#[test]
fn blind_search_certificate_is_well_formed() {
    let Certificate { proof, task, .. } = certify("blind", ComponentSpec::Blind);

    assert_well_formed(&proof);

    // Every expansion shows that the transition relation preserves the invariant.
    assert!(proof.iter().any(|step| matches!(
        step,
        Step::ReverseUnitPropagation(rup)
            if mentions(&rup.constraint, "transition")
                && mentions(&rup.constraint, "prime^invar")
    )));
    assert!(task.iter().any(|step| matches!(step, Step::Constraint(_))));
    assert!(task
        .iter()
        .all(|step| matches!(step, Step::Constraint(_) | Step::Comment(_))));
}

#[test]
fn pdb_certificate_records_the_abstraction() {
    let Certificate { proof, .. } =
        certify("pdb", ComponentSpec::Pdb(PatternSpec::Manual(vec![0, 1])));

    assert_well_formed(&proof);

    assert!(proof.iter().any(|step| matches!(
        step,
        Step::Comment(comment) if comment.text.starts_with("abstraction p_0_1")
    )));
    assert!(proof.iter().any(|step| matches!(
        step,
        Step::Redundance(redundance) if mentions(&redundance.constraint, "dead_p_0_1")
    )));
}

#[test]
fn blind_search_certificate_follows_by_unit_propagation() {
    let Certificate { proof, task, .. } = certify("blind_replay", ComponentSpec::Blind);

    let derived = ProofChecker::new(&task).replay(&proof);

    assert!(derived > 0);
}

#[test]
fn pdb_certificate_follows_by_unit_propagation() {
    let Certificate { proof, task, .. } = certify(
        "pdb_replay",
        ComponentSpec::Pdb(PatternSpec::Manual(vec![0, 1])),
    );

    let derived = ProofChecker::new(&task).replay(&proof);

    assert!(derived > 0);
}

#[test]
fn certificates_are_reproducible() {
    for (name, heuristic) in [
        ("blind", ComponentSpec::Blind),
        ("pdb", ComponentSpec::Pdb(PatternSpec::Manual(vec![0, 1]))),
    ] {
        let first = certify(&format!("{name}_first"), heuristic.clone());
        let second = certify(&format!("{name}_second"), heuristic);

        assert_eq!(first.bytes, second.bytes, "{name} certificates differ");
    }
}
