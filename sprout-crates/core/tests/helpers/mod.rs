//! Replays a certificate the way a pseudo-Boolean proof checker does. Definitions (`red` steps)
//! are taken as given, `pol` steps are evaluated, and every `rup` step has to end in a conflict
//! under unit propagation.

use pbp_format::reader::ReadStep;
use pbp_format::steps::PolItem;
use pbp_format::steps::Step;
use pbp_format::Constraint;
use sprout_core::containers::HashMap;

/// `Σ a x >= degree` over positive literals only; a negative coefficient stands for the negated
/// literal.
#[derive(Clone, Debug, Default)]
struct Linear {
    coefficients: HashMap<String, i64>,
    degree: i64,
}

impl Linear {
    fn new(constraint: &Constraint<String>) -> Linear {
        let mut linear = Linear {
            coefficients: HashMap::default(),
            degree: constraint.degree,
        };
        for term in &constraint.terms {
            let coefficient = term.coefficient as i64;
            // a ~x = a - a x
            if term.literal.negated {
                linear.add_term(&term.literal.name, -coefficient);
                linear.degree -= coefficient;
            } else {
                linear.add_term(&term.literal.name, coefficient);
            }
        }
        linear
    }

    fn add_term(&mut self, name: &str, coefficient: i64) {
        let entry = self.coefficients.entry(name.to_owned()).or_insert(0);
        *entry += coefficient;
        if *entry == 0 {
            let _ = self.coefficients.remove(name);
        }
    }

    fn add(mut self, other: &Linear) -> Linear {
        for (name, &coefficient) in &other.coefficients {
            self.add_term(name, coefficient);
        }
        self.degree += other.degree;
        self
    }

    fn multiply(mut self, factor: i64) -> Linear {
        self.coefficients
            .values_mut()
            .for_each(|coefficient| *coefficient *= factor);
        self.degree *= factor;
        self
    }

    fn normalized(&self) -> Normalized {
        let mut degree = self.degree;
        let mut terms = Vec::with_capacity(self.coefficients.len());
        for (name, &coefficient) in &self.coefficients {
            if coefficient < 0 {
                degree -= coefficient;
                terms.push((name.clone(), false, -coefficient));
            } else {
                terms.push((name.clone(), true, coefficient));
            }
        }
        Normalized { terms, degree }
    }
}

/// `Σ a l >= degree` with positive coefficients. A term `(x, value, a)` is satisfied once `x`
/// takes `value`.
#[derive(Clone, Debug)]
struct Normalized {
    terms: Vec<(String, bool, i64)>,
    degree: i64,
}

impl Normalized {
    /// `¬(Σ a l >= d)` is `Σ a ~l >= Σ a - d + 1`.
    fn negation(&self) -> Normalized {
        let sum = self.terms.iter().map(|(_, _, a)| a).sum::<i64>();
        Normalized {
            terms: self
                .terms
                .iter()
                .map(|(name, value, a)| (name.clone(), !value, *a))
                .collect(),
            degree: sum - self.degree + 1,
        }
    }

    /// The coefficients of the terms which can still be satisfied, minus the degree.
    fn slack(&self, assignment: &HashMap<String, bool>) -> i64 {
        self.terms
            .iter()
            .filter(|(name, value, _)| assignment.get(name).map_or(true, |v| v == value))
            .map(|(_, _, a)| a)
            .sum::<i64>()
            - self.degree
    }
}

/// Runs unit propagation over `constraints` to a fixpoint and reports whether it ends in a
/// conflict.
fn propagates_to_conflict(constraints: &[Normalized]) -> bool {
    let mut assignment = HashMap::default();
    loop {
        let mut changed = false;
        for constraint in constraints {
            let slack = constraint.slack(&assignment);
            if slack < 0 {
                return true;
            }
            for (name, value, a) in &constraint.terms {
                if *a > slack && !assignment.contains_key(name) {
                    let _ = assignment.insert(name.clone(), *value);
                    changed = true;
                }
            }
        }
        if !changed {
            return false;
        }
    }
}

/// Checks the steps of a proof against the constraints of its formula.
#[derive(Debug)]
pub(crate) struct ProofChecker {
    formula: Vec<Linear>,
    labelled: HashMap<String, Linear>,
    database: Vec<Normalized>,
    num_derivations: usize,
}

impl ProofChecker {
    pub(crate) fn new(formula: &[ReadStep]) -> ProofChecker {
        let formula = formula
            .iter()
            .filter_map(|step| match step {
                Step::Constraint(formula_constraint) => {
                    Some(Linear::new(&formula_constraint.constraint))
                }
                Step::Comment(_) => None,
                other => panic!("unexpected step {other:?} in the formula"),
            })
            .collect();

        ProofChecker {
            formula,
            labelled: HashMap::default(),
            database: Vec::new(),
            num_derivations: 0,
        }
    }

    /// Replays every step, panicking at the first one which does not follow. Returns the number
    /// of derived (`rup` and `pol`) constraints.
    pub(crate) fn replay(&mut self, proof: &[ReadStep]) -> usize {
        for step in proof {
            match step {
                Step::Header { .. } | Step::Comment(_) | Step::Closing(_) => {}
                Step::LoadFormula(load) => {
                    assert_eq!(Some(self.formula.len() as u64), load.num_constraints);
                    let formula = self.formula.iter().map(Linear::normalized).collect::<Vec<_>>();
                    self.database.extend(formula);
                }
                Step::Redundance(redundance) => {
                    assert_eq!(
                        0, self.num_derivations,
                        "{:?} is defined after the first derivation",
                        redundance.label
                    );
                    self.add(redundance.label.as_ref(), Linear::new(&redundance.constraint));
                }
                Step::ReverseUnitPropagation(rup) => {
                    let linear = Linear::new(&rup.constraint);
                    let mut constraints = self.database.clone();
                    constraints.push(linear.normalized().negation());
                    assert!(
                        propagates_to_conflict(&constraints),
                        "rup {} does not follow by unit propagation",
                        rup.constraint
                    );
                    self.num_derivations += 1;
                    self.add(rup.label.as_ref(), linear);
                }
                Step::Polynomial(pol) => {
                    let linear = self.evaluate(&pol.items);
                    self.num_derivations += 1;
                    self.add(pol.label.as_ref(), linear);
                }
                Step::Constraint(_) => panic!("formula constraints cannot appear in a proof"),
            }
        }
        self.num_derivations
    }

    fn evaluate(&self, items: &[PolItem<String>]) -> Linear {
        let mut stack: Vec<Linear> = Vec::new();
        for item in items {
            match item {
                PolItem::Step(label) => stack.push(
                    self.labelled
                        .get(label)
                        .unwrap_or_else(|| panic!("unknown label {label}"))
                        .clone(),
                ),
                PolItem::ConstraintId(id) => {
                    let index = usize::try_from(*id).expect("small id") - 1;
                    stack.push(
                        self.formula
                            .get(index)
                            .unwrap_or_else(|| panic!("no formula constraint {id}"))
                            .clone(),
                    );
                }
                PolItem::Add => {
                    let second = stack.pop().expect("two operands");
                    let first = stack.pop().expect("two operands");
                    stack.push(first.add(&second));
                }
                PolItem::Multiply(factor) => {
                    let top = stack.pop().expect("an operand");
                    stack.push(top.multiply(*factor as i64));
                }
                other => panic!("{other:?} is not used by the planner"),
            }
        }
        assert_eq!(1, stack.len(), "pol leaves {} constraints", stack.len());
        stack.pop().expect("one constraint")
    }

    fn add(&mut self, label: Option<&String>, linear: Linear) {
        self.database.push(linear.normalized());
        if let Some(label) = label {
            let _ = self.labelled.insert(label.clone(), linear);
        }
    }
}

#[test]
fn unit_propagation_finds_implied_clauses() {
    let parse = |source: &str| {
        pbp_format::reader::ProofReader::new(source.as_bytes())
            .read_to_end()
            .expect("valid source")
    };
    let formula = parse("1 ~a 1 b >= 1 ;\n1 ~b 1 c >= 1 ;\n");

    let mut checker = ProofChecker::new(&formula);
    let derived = checker.replay(&parse(
        "pseudo-Boolean proof version 2.0\nf 2\nrup 1 ~a 1 c >= 1 ;\n@s pol 1 2 + ;\n",
    ));

    assert_eq!(2, derived);
}

#[test]
#[should_panic(expected = "does not follow by unit propagation")]
fn unit_propagation_rejects_unsupported_clauses() {
    let parse = |source: &str| {
        pbp_format::reader::ProofReader::new(source.as_bytes())
            .read_to_end()
            .expect("valid source")
    };
    let formula = parse("1 ~a 1 b >= 1 ;\n");

    let _ = ProofChecker::new(&formula).replay(&parse(
        "pseudo-Boolean proof version 2.0\nf 1\nrup 1 ~a 1 c >= 1 ;\n",
    ));
}
