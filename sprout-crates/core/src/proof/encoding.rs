//! The arithmetic behind the certificate: the two directions of a definition, and the comparisons
//! over the spent and budget bit-vectors.

use pbp_format::Constraint;
use pbp_format::Literal;
use pbp_format::Term;

use super::names::ProofConstraint;
use super::names::ProofLiteral;
use super::names::ProofName;
use super::names::Tag;
use super::names::TaggedName;

/// The number of bits of the spent and budget bit-vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitWidth {
    bits: u32,
}

impl BitWidth {
    /// The widest bit-vector that is ever used, bounding the size of the coefficients.
    pub const MAX_BITS: u32 = 30;

    /// `min(variable_count + max_cost_bits, MAX_BITS)`, where `max_cost_bits` is the number of
    /// bits needed for the most expensive operator (at least one).
    pub fn for_task(variable_count: usize, max_operator_cost: i32) -> BitWidth {
        let max_cost = u64::try_from(max_operator_cost).unwrap_or(0);
        let max_cost_bits = (u64::BITS - max_cost.leading_zeros()).max(1);
        let bits = (variable_count as u64 + u64::from(max_cost_bits)).min(u64::from(Self::MAX_BITS));

        BitWidth { bits: bits as u32 }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// The first value which no longer fits in the bit-vector.
    pub fn max_int(&self) -> i64 {
        1 << self.bits
    }

    /// The largest value of a bit-vector, `max_int - 1`.
    pub fn max_value(&self) -> i64 {
        self.max_int() - 1
    }

    pub fn can_represent(&self, value: i64) -> bool {
        (0..self.max_int()).contains(&value)
    }

    /// Whether `budget - spent <= x` can be written down. The balance ranges over
    /// `[-max_value, max_value]`, so the degree `max_value - x` of its encoding lies in
    /// `[0, 2 max_value]`.
    pub fn can_bound_balance(&self, x: i64) -> bool {
        (0..=2 * self.max_value()).contains(&(self.max_value() - x))
    }

    /// The terms `Σ 2^i l_i`, most significant bit first, where `l_i` is the (possibly negated)
    /// bit `i` of a bit-vector.
    pub(crate) fn weighted_bits(
        &self,
        bit: impl Fn(u32) -> TaggedName,
        negated: bool,
    ) -> impl Iterator<Item = Term<TaggedName>> {
        (0..self.bits).rev().map(move |i| {
            let name = bit(i);
            let literal = if negated {
                Literal::negative(name)
            } else {
                Literal::positive(name)
            };
            Term::new(1 << i, literal)
        })
    }

    /// `spent >= x` over the spent bits of the given tag.
    pub(crate) fn spent_at_least(&self, x: i64, tag: Tag) -> ProofConstraint {
        let mut constraint = Constraint::new(x);
        constraint.extend(self.weighted_bits(|i| spent_bit(i, tag), false));
        constraint
    }

    /// `budget - spent <= x`, written as `spent + (max_value - budget) >= max_value - x`.
    pub(crate) fn balance_at_most(&self, x: i64, tag: Tag) -> ProofConstraint {
        let mut constraint = Constraint::new(self.max_value() - x);
        constraint.extend(self.weighted_bits(|i| spent_bit(i, tag), false));
        constraint.extend(self.weighted_bits(budget_bit, true));
        constraint
    }

    /// `prime^spent - spent >= cost` (or `<=`), the cost delta of a transition.
    pub(crate) fn delta_at_least(&self, cost: i32) -> ProofConstraint {
        let mut constraint = Constraint::new(self.max_value() + i64::from(cost));
        constraint.extend(self.weighted_bits(|i| spent_bit(i, Tag::Primed), false));
        constraint.extend(self.weighted_bits(|i| spent_bit(i, Tag::Current), true));
        constraint
    }

    pub(crate) fn delta_at_most(&self, cost: i32) -> ProofConstraint {
        let mut constraint = Constraint::new(self.max_value() - i64::from(cost));
        constraint.extend(self.weighted_bits(|i| spent_bit(i, Tag::Current), false));
        constraint.extend(self.weighted_bits(|i| spent_bit(i, Tag::Primed), true));
        constraint
    }

    /// The witness which fixes the budget bits to `value`.
    pub(crate) fn budget_assignment(&self, value: i64) -> Vec<(TaggedName, bool)> {
        (0..self.bits)
            .rev()
            .map(|i| (budget_bit(i), (value >> i) & 1 == 1))
            .collect()
    }

    /// `budget >= value`.
    pub(crate) fn budget_at_least(&self, value: i64) -> ProofConstraint {
        let mut constraint = Constraint::new(value);
        constraint.extend(self.weighted_bits(budget_bit, false));
        constraint
    }

    /// `budget <= value`.
    pub(crate) fn budget_at_most(&self, value: i64) -> ProofConstraint {
        let mut constraint = Constraint::new(self.max_value() - value);
        constraint.extend(self.weighted_bits(budget_bit, true));
        constraint
    }
}

fn spent_bit(i: u32, tag: Tag) -> TaggedName {
    ProofName::SpentBit(i).tagged(tag)
}

fn budget_bit(i: u32) -> TaggedName {
    ProofName::BudgetBit(i).current()
}

/// Both directions of the definition `R ⇔ C`.
#[derive(Clone, Debug)]
pub(crate) struct Bireification {
    /// `R → C`, introduced with the witness `R -> 0`.
    pub(crate) right: ProofConstraint,
    /// `C → R`, introduced with the witness `R -> 1`.
    pub(crate) left: ProofConstraint,
}

/// Defines `reified` as the constraint `C: Σ a l >= k`.
///
/// The right direction is `k ~R + C >= k`, the left direction `(Σa - k + 1) R + ¬C`. A direction
/// which holds regardless of `R` keeps its (trivially satisfied) constraint without the `R` term.
pub(crate) fn bireify(reified: &TaggedName, constraint: ProofConstraint) -> Bireification {
    let right = guarded(Literal::negative(reified.clone()), constraint.clone());
    let left = guarded(Literal::positive(reified.clone()), constraint.negation());

    Bireification { right, left }
}

fn guarded(guard: ProofLiteral, constraint: ProofConstraint) -> ProofConstraint {
    let mut result = Constraint::new(constraint.degree);
    if constraint.degree > 0 {
        result.add_term(constraint.degree as u64, guard);
    }
    result.extend(constraint.terms);
    result
}

/// `Σ 1 l >= n`, i.e. all of the literals hold.
pub(crate) fn conjunction(literals: impl IntoIterator<Item = ProofLiteral>) -> ProofConstraint {
    let mut constraint = Constraint::new(0);
    for literal in literals {
        constraint.add_term(1, literal);
        constraint.degree += 1;
    }
    constraint
}

/// `Σ 1 l >= 1`, i.e. at least one of the literals holds.
pub(crate) fn disjunction(literals: impl IntoIterator<Item = ProofLiteral>) -> ProofConstraint {
    Constraint::clause(literals)
}
