use std::fmt::Display;
use std::fmt::Formatter;

/// A possibly negated boolean variable. Negated literals are written with a `~` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal<Name> {
    pub name: Name,
    pub negated: bool,
}

impl<Name> Literal<Name> {
    pub fn positive(name: Name) -> Self {
        Literal {
            name,
            negated: false,
        }
    }

    pub fn negative(name: Name) -> Self {
        Literal {
            name,
            negated: true,
        }
    }

    /// Flip the polarity of the literal.
    pub fn negate(self) -> Self {
        Literal {
            name: self.name,
            negated: !self.negated,
        }
    }

    /// Evaluate the literal given the truth value of its variable.
    pub fn evaluate(&self, variable_value: bool) -> bool {
        variable_value != self.negated
    }
}

impl<Name: Display> Display for Literal<Name> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "~{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A literal together with its (positive) coefficient.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Term<Name> {
    pub coefficient: u64,
    pub literal: Literal<Name>,
}

impl<Name> Term<Name> {
    pub fn new(coefficient: u64, literal: Literal<Name>) -> Self {
        Term {
            coefficient,
            literal,
        }
    }
}

impl<Name: Display> Display for Term<Name> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.coefficient, self.literal)
    }
}

/// A normalized pseudo-Boolean constraint `Σ a_i l_i >= degree`.
///
/// All coefficients are positive; negative contributions are expressed through negated literals.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Constraint<Name> {
    pub terms: Vec<Term<Name>>,
    pub degree: i64,
}

impl<Name> Constraint<Name> {
    /// Create a constraint without any terms.
    pub fn new(degree: i64) -> Self {
        Constraint {
            terms: Vec::new(),
            degree,
        }
    }

    /// The clause `l_1 ∨ ... ∨ l_n`, i.e. `Σ 1 l_i >= 1`.
    pub fn clause(literals: impl IntoIterator<Item = Literal<Name>>) -> Self {
        Constraint {
            terms: literals.into_iter().map(|lit| Term::new(1, lit)).collect(),
            degree: 1,
        }
    }

    pub fn with_term(mut self, coefficient: u64, literal: Literal<Name>) -> Self {
        self.add_term(coefficient, literal);
        self
    }

    pub fn add_term(&mut self, coefficient: u64, literal: Literal<Name>) {
        self.terms.push(Term::new(coefficient, literal));
    }

    pub fn extend(&mut self, terms: impl IntoIterator<Item = Term<Name>>) {
        self.terms.extend(terms);
    }

    /// The largest value the left-hand side can take.
    pub fn coefficient_sum(&self) -> i64 {
        self.terms.iter().map(|term| term.coefficient as i64).sum()
    }

    /// The negation of the constraint, `Σ a_i ~l_i >= Σ a_i - degree + 1`.
    pub fn negation(self) -> Self {
        let degree = self.coefficient_sum() - self.degree + 1;
        Constraint {
            terms: self
                .terms
                .into_iter()
                .map(|term| Term::new(term.coefficient, term.literal.negate()))
                .collect(),
            degree,
        }
    }

    /// Evaluate the constraint under an assignment of its variables.
    pub fn is_satisfied_by(&self, mut assignment: impl FnMut(&Name) -> bool) -> bool {
        let lhs: i64 = self
            .terms
            .iter()
            .filter(|term| term.literal.evaluate(assignment(&term.literal.name)))
            .map(|term| term.coefficient as i64)
            .sum();

        lhs >= self.degree
    }
}

impl<Name: Display> Display for Constraint<Name> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for term in self.terms.iter() {
            write!(f, "{term} ")?;
        }

        write!(f, ">= {}", self.degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_is_displayed_with_terms_then_degree() {
        let constraint = Constraint::new(2)
            .with_term(2, Literal::negative("x"))
            .with_term(1, Literal::positive("y"));

        assert_eq!("2 ~x 1 y >= 2", constraint.to_string());
    }

    #[test]
    fn negation_flips_literals_and_adjusts_degree() {
        let constraint = Constraint::new(3)
            .with_term(2, Literal::positive("a"))
            .with_term(2, Literal::negative("b"));

        let negated = constraint.negation();

        assert_eq!("2 ~a 2 b >= 2", negated.to_string());
    }

    #[test]
    fn constraint_and_negation_disagree_on_every_assignment() {
        let constraint = Constraint::new(3)
            .with_term(2, Literal::positive("a"))
            .with_term(1, Literal::negative("b"))
            .with_term(1, Literal::positive("c"));
        let negated = constraint.clone().negation();

        for bits in 0..8_u8 {
            let assignment = |name: &&str| match *name {
                "a" => bits & 1 != 0,
                "b" => bits & 2 != 0,
                _ => bits & 4 != 0,
            };

            assert_ne!(
                constraint.is_satisfied_by(assignment),
                negated.is_satisfied_by(assignment)
            );
        }
    }
}
