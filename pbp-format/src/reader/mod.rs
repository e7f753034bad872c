//! Implements the parsing of pseudo-Boolean proof and formula files.
//!
//! See [`ProofReader`] for information on how to parse a proof.

mod error;
mod parser;

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

pub use error::Error;
use parser::LineParser;

use crate::steps::Step;

/// The output of [`ProofReader::next_step`].
pub type ReadStep = Step<String, String>;

/// Used to read and parse pseudo-Boolean proofs.
///
/// The reader will read the proof line-by-line, using the fact that the format is line-based. Any
/// leading or trailing whitespace, and empty lines, will be ignored.
///
/// Note that the reader does not perform any type of validity checking of the proof. It will
/// happily parse a `rup` step that does not follow from the earlier constraints, or a proof
/// without a closing section.
///
/// # Example
/// ```
/// use pbp_format::reader::ProofReader;
/// use pbp_format::steps::*;
/// use pbp_format::Constraint;
/// use pbp_format::Literal;
///
/// let source = r#"
/// pseudo-Boolean proof version 2.0
/// @r_Rreif red 1 ~r 1 x >= 1 ; r -> 0
/// rup 1 r >= 1 ;
/// end pseudo-Boolean proof
/// "#;
///
/// let mut reader = ProofReader::new(source.as_bytes());
///
/// let header = reader.next_step().expect("valid header");
/// assert_eq!(
///     Some(Step::Header {
///         version: "2.0".to_owned()
///     }),
///     header
/// );
///
/// let redundance = reader.next_step().expect("valid red step");
/// let expected = Redundance {
///     label: Some("r_Rreif".to_owned()),
///     constraint: Constraint::new(1)
///         .with_term(1, Literal::negative("r".to_owned()))
///         .with_term(1, Literal::positive("x".to_owned())),
///     witness: vec![("r".to_owned(), false)],
/// };
/// assert_eq!(Some(Step::Redundance(expected)), redundance);
///
/// let rup = reader.next_step().expect("valid rup step");
/// assert!(matches!(rup, Some(Step::ReverseUnitPropagation(_))));
///
/// let end = reader.next_step().expect("valid closing step");
/// assert_eq!(Some(Step::Closing(Closing::End)), end);
///
/// assert_eq!(None, reader.next_step().expect("finished reading source"));
/// ```
#[derive(Debug)]
pub struct ProofReader<R> {
    source: BufReader<R>,
    string_buffer: String,
    line_nr: usize,
}

impl<R: Read> ProofReader<R> {
    /// Construct a new proof reader which reads from `source`.
    pub fn new(source: R) -> ProofReader<R> {
        ProofReader {
            source: BufReader::new(source),
            string_buffer: String::new(),
            line_nr: 0,
        }
    }

    /// Read the next step in the proof.
    ///
    /// If reading is successful, `Some(step)` is returned with the next step, or `None` if the end
    /// of the proof is reached. On an error, be it from IO or other, the `Err` variant is
    /// returned.
    pub fn next_step(&mut self) -> Result<Option<ReadStep>, Error> {
        loop {
            self.string_buffer.clear();
            let read_bytes = self.source.read_line(&mut self.string_buffer)?;
            if read_bytes == 0 {
                return Ok(None);
            }

            self.line_nr += 1;

            if let Some(step) = LineParser::new(&self.string_buffer, self.line_nr).parse()? {
                return Ok(Some(step));
            }
        }
    }

    /// Read all remaining steps.
    pub fn read_to_end(mut self) -> Result<Vec<ReadStep>, Error> {
        let mut steps = Vec::new();
        while let Some(step) = self.next_step()? {
            steps.push(step);
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::Closing;
    use crate::steps::PolItem;
    use crate::Literal;

    fn parse_single(line: &str) -> ReadStep {
        ProofReader::new(line.as_bytes())
            .next_step()
            .expect("valid line")
            .expect("non-empty line")
    }

    #[test]
    fn comment_keeps_its_text() {
        assert_eq!(
            Step::Comment(crate::steps::Comment {
                text: "goal lemma".to_owned()
            }),
            parse_single("* goal lemma\n")
        );
    }

    #[test]
    fn pol_items_are_parsed_in_order() {
        let Step::Polynomial(polynomial) = parse_single("pol @a @b + 2 * 4 d s ;") else {
            panic!("expected a pol step");
        };

        assert_eq!(None, polynomial.label);
        assert_eq!(
            vec![
                PolItem::Step("a".to_owned()),
                PolItem::Step("b".to_owned()),
                PolItem::Add,
                PolItem::Multiply(2),
                PolItem::Divide(4),
                PolItem::Saturate,
            ],
            polynomial.items
        );
    }

    #[test]
    fn numbers_without_an_operator_are_constraint_ids() {
        let Step::Polynomial(polynomial) = parse_single("@p pol 3 @a + 2 2 * + ;") else {
            panic!("expected a pol step");
        };

        assert_eq!(Some("p".to_owned()), polynomial.label);
        assert_eq!(
            vec![
                PolItem::ConstraintId(3),
                PolItem::Step("a".to_owned()),
                PolItem::Add,
                PolItem::ConstraintId(2),
                PolItem::Multiply(2),
                PolItem::Add,
            ],
            polynomial.items
        );
    }

    #[test]
    fn primed_names_are_valid_literals() {
        let Step::ReverseUnitPropagation(rup) =
            parse_single("rup 1 ~invar 1 ~transition 1 prime^invar >= 1 ;")
        else {
            panic!("expected a rup step");
        };

        assert_eq!(
            Literal::positive("prime^invar".to_owned()),
            rup.constraint.terms[2].literal
        );
    }

    #[test]
    fn negative_degrees_are_accepted() {
        let Step::Constraint(formula) = parse_single("1 x >= -3 ;") else {
            panic!("expected a formula constraint");
        };

        assert_eq!(-3, formula.constraint.degree);
    }

    #[test]
    fn closing_section_is_recognised() {
        let steps = ProofReader::new("output NONE\nconclusion NONE\nend pseudo-Boolean proof\n".as_bytes())
            .read_to_end()
            .expect("valid closing section");

        assert_eq!(
            vec![
                Step::Closing(Closing::Output),
                Step::Closing(Closing::Conclusion),
                Step::Closing(Closing::End),
            ],
            steps
        );
    }

    #[test]
    fn missing_semicolon_is_a_parse_error() {
        let result = ProofReader::new("rup 1 x >= 1".as_bytes()).next_step();

        assert!(matches!(result, Err(Error::ParseError { line_nr: 1, .. })));
    }

    #[test]
    fn invalid_identifier_is_reported_with_its_span() {
        let result = ProofReader::new("\nrup 1 (x) >= 1 ;".as_bytes()).next_step();

        match result {
            Err(Error::ParseError { line_nr, span, .. }) => {
                assert_eq!(2, line_nr);
                assert_eq!((6, 9), span);
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}
