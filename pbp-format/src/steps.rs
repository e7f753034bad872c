//! Contains the definitions of the steps that make up a pseudo-Boolean proof.

use crate::Constraint;

/// The version line which opens every proof.
pub const PROOF_VERSION: &str = "2.0";

/// A comment line, `* <text>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment<Text> {
    pub text: Text,
}

/// Instruct the checker to load the constraints of the formula, `f <count>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadFormula {
    pub num_constraints: Option<u64>,
}

/// A redundance-based strengthening step, `@label red <constraint> ; <witness>`.
///
/// The witness substitution maps variables to constants. It is what makes the introduction of a
/// fresh name sound: the constraint holds after substituting the witness into any assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redundance<Label, PbConstraint, Witness> {
    pub label: Option<Label>,
    pub constraint: PbConstraint,
    pub witness: Witness,
}

/// A reverse unit propagation step, `@label rup <constraint> ;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReverseUnitPropagation<Label, PbConstraint> {
    pub label: Option<Label>,
    pub constraint: PbConstraint,
}

/// One token of a polish-notation derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolItem<Label> {
    /// A reference to an earlier step by its label.
    Step(Label),
    /// A reference to a constraint by its (1-based) id, e.g. one loaded from the formula.
    ConstraintId(u64),
    /// Add the top two constraints.
    Add,
    /// Multiply the top constraint by the given factor.
    Multiply(u64),
    /// Divide the top constraint by the given divisor and round up.
    Divide(u64),
    /// Saturate the coefficients of the top constraint.
    Saturate,
}

/// A cutting-planes derivation in polish notation, `@label pol <items> ;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<Label, Items> {
    pub label: Option<Label>,
    pub items: Items,
}

/// A constraint on its own line, as it appears in the formula (`.opb`) file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormulaConstraint<PbConstraint> {
    pub constraint: PbConstraint,
}

/// The closing section of a proof. The planner never claims anything about the formula's
/// solutions, so both the output and the conclusion are `NONE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Closing {
    /// `output NONE`
    Output,
    /// `conclusion NONE`
    Conclusion,
    /// `end pseudo-Boolean proof`
    End,
}

/// A single line of a proof or formula file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step<Name, Text> {
    Header {
        version: Text,
    },
    LoadFormula(LoadFormula),
    Comment(Comment<Text>),
    Redundance(Redundance<Text, Constraint<Name>, Vec<(Name, bool)>>),
    ReverseUnitPropagation(ReverseUnitPropagation<Text, Constraint<Name>>),
    Polynomial(Polynomial<Text, Vec<PolItem<Text>>>),
    Constraint(FormulaConstraint<Constraint<Name>>),
    Closing(Closing),
}
