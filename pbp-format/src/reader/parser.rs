use crate::is_name_character;
use crate::reader::Error;
use crate::reader::ReadStep;
use crate::steps::Closing;
use crate::steps::Comment;
use crate::steps::FormulaConstraint;
use crate::steps::LoadFormula;
use crate::steps::PolItem;
use crate::steps::Polynomial;
use crate::steps::Redundance;
use crate::steps::ReverseUnitPropagation;
use crate::steps::Step;
use crate::Constraint;
use crate::Literal;

/// Parses a single line to possibly return a proof step.
///
/// See [`LineParser::parse`] for more information.
pub(super) struct LineParser<'src> {
    source: &'src str,
    /// The whitespace separated tokens of the line, together with their byte offset.
    tokens: Vec<(usize, &'src str)>,
    position: usize,
    line_nr: usize,
}

impl<'src> LineParser<'src> {
    pub(super) fn new(line: &'src str, line_nr: usize) -> Self {
        let source = line.trim_end_matches(['\n', '\r']);

        let mut tokens = Vec::new();
        let mut start = None;
        for (offset, c) in source.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(token_start)) => {
                    tokens.push((token_start, &source[token_start..offset]));
                    start = None;
                }
                (false, None) => start = Some(offset),
                _ => {}
            }
        }
        if let Some(token_start) = start {
            tokens.push((token_start, &source[token_start..]));
        }

        LineParser {
            source,
            tokens,
            position: 0,
            line_nr,
        }
    }

    /// Parses a single line from a proof.
    ///
    /// The line may be empty, in which case this returns `Ok(None)`. Otherwise, if there is
    /// content on the line, it either successfully parses a step or returns a parser error.
    pub(super) fn parse(mut self) -> Result<Option<ReadStep>, Error> {
        let trimmed = self.source.trim_start();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if let Some(text) = trimmed.strip_prefix('*') {
            let text = text.strip_prefix(' ').unwrap_or(text);
            return Ok(Some(Step::Comment(Comment {
                text: text.to_owned(),
            })));
        }

        let label = match self.peek() {
            Some((_, token)) if token.starts_with('@') => {
                let (offset, token) = self.consume("label")?;
                Some(self.check_identifier(&token[1..], offset + 1)?.to_owned())
            }
            _ => None,
        };

        let step = match self.peek().map(|(_, token)| token) {
            Some("red") => {
                let _ = self.consume("red")?;
                let constraint = self.consume_constraint()?;
                self.consume_str(";")?;
                let witness = self.consume_witness()?;
                Step::Redundance(Redundance {
                    label,
                    constraint,
                    witness,
                })
            }
            Some("rup") => {
                let _ = self.consume("rup")?;
                let constraint = self.consume_constraint()?;
                self.consume_str(";")?;
                Step::ReverseUnitPropagation(ReverseUnitPropagation { label, constraint })
            }
            Some("pol") => {
                let _ = self.consume("pol")?;
                let items = self.consume_pol_items()?;
                Step::Polynomial(Polynomial { label, items })
            }
            _ if label.is_some() => {
                return Err(self.error_at_current("expected red, rup, or pol after a label"));
            }
            Some("pseudo-Boolean") => {
                self.consume_str("pseudo-Boolean")?;
                self.consume_str("proof")?;
                self.consume_str("version")?;
                let (_, version) = self.consume("version")?;
                Step::Header {
                    version: version.to_owned(),
                }
            }
            Some("f") => {
                self.consume_str("f")?;
                let num_constraints = if self.peek().is_some() {
                    Some(self.consume_u64()?)
                } else {
                    None
                };
                Step::LoadFormula(LoadFormula { num_constraints })
            }
            Some("output") => {
                self.consume_str("output")?;
                self.consume_str("NONE")?;
                Step::Closing(Closing::Output)
            }
            Some("conclusion") => {
                self.consume_str("conclusion")?;
                self.consume_str("NONE")?;
                Step::Closing(Closing::Conclusion)
            }
            Some("end") => {
                self.consume_str("end")?;
                self.consume_str("pseudo-Boolean")?;
                self.consume_str("proof")?;
                Step::Closing(Closing::End)
            }
            _ => {
                let constraint = self.consume_constraint()?;
                self.consume_str(";")?;
                Step::Constraint(FormulaConstraint { constraint })
            }
        };

        if let Some((offset, token)) = self.peek() {
            return Err(Error::ParseError {
                line_nr: self.line_nr,
                reason: format!("unexpected trailing token '{token}'"),
                span: (offset, offset + token.len()),
            });
        }

        Ok(Some(step))
    }

    /// Parses `(<coefficient> <literal>)* ">=" <degree>`.
    fn consume_constraint(&mut self) -> Result<Constraint<String>, Error> {
        let mut constraint = Constraint::new(0);

        loop {
            if let Some((_, ">=")) = self.peek() {
                let _ = self.consume(">=")?;
                constraint.degree = self.consume_signed_integer()?;
                return Ok(constraint);
            }

            let coefficient = self.consume_u64()?;
            let literal = self.consume_literal()?;
            constraint.add_term(coefficient, literal);
        }
    }

    /// Parses `(<name> "->" ("0" | "1"))*` up to the end of the line.
    fn consume_witness(&mut self) -> Result<Vec<(String, bool)>, Error> {
        let mut witness = Vec::new();

        while self.peek().is_some() {
            let (offset, name) = self.consume("witness variable")?;
            let name = self.check_identifier(name, offset)?.to_owned();
            self.consume_str("->")?;

            let (offset, value) = self.consume("witness value")?;
            let value = match value {
                "0" => false,
                "1" => true,
                _ => {
                    return Err(Error::ParseError {
                        line_nr: self.line_nr,
                        reason: format!("expected 0 or 1, got '{value}'"),
                        span: (offset, offset + value.len()),
                    })
                }
            };

            witness.push((name, value));
        }

        Ok(witness)
    }

    fn consume_pol_items(&mut self) -> Result<Vec<PolItem<String>>, Error> {
        let mut items = Vec::new();

        loop {
            let (offset, token) = self.consume("pol item")?;

            let item = match token {
                ";" => return Ok(items),
                "+" => PolItem::Add,
                "s" => PolItem::Saturate,
                _ if token.starts_with('@') => {
                    PolItem::Step(self.check_identifier(&token[1..], offset + 1)?.to_owned())
                }
                _ => {
                    let number = parse_u64(token).ok_or_else(|| Error::ParseError {
                        line_nr: self.line_nr,
                        reason: format!("unexpected pol item '{token}'"),
                        span: (offset, offset + token.len()),
                    })?;

                    // A number is a factor or divisor when an operator follows, and a
                    // constraint id otherwise.
                    match self.peek().map(|(_, next)| next) {
                        Some("*") => {
                            let _ = self.consume("*")?;
                            PolItem::Multiply(number)
                        }
                        Some("d") => {
                            let _ = self.consume("d")?;
                            PolItem::Divide(number)
                        }
                        _ => PolItem::ConstraintId(number),
                    }
                }
            };

            items.push(item);
        }
    }

    fn consume_literal(&mut self) -> Result<Literal<String>, Error> {
        let (offset, token) = self.consume("literal")?;

        match token.strip_prefix('~') {
            Some(name) => Ok(Literal::negative(
                self.check_identifier(name, offset + 1)?.to_owned(),
            )),
            None => Ok(Literal::positive(
                self.check_identifier(token, offset)?.to_owned(),
            )),
        }
    }

    fn consume_u64(&mut self) -> Result<u64, Error> {
        let (offset, token) = self.consume("unsigned integer")?;

        parse_u64(token).ok_or_else(|| Error::ParseError {
            line_nr: self.line_nr,
            reason: format!("expected an unsigned integer, got '{token}'"),
            span: (offset, offset + token.len()),
        })
    }

    fn consume_signed_integer(&mut self) -> Result<i64, Error> {
        let (offset, token) = self.consume("integer")?;

        token.parse::<i64>().map_err(|_| Error::ParseError {
            line_nr: self.line_nr,
            reason: format!("expected an integer, got '{token}'"),
            span: (offset, offset + token.len()),
        })
    }

    fn consume_str(&mut self, expected: &str) -> Result<(), Error> {
        let (offset, token) = self.consume(expected)?;

        if token == expected {
            Ok(())
        } else {
            Err(Error::ParseError {
                line_nr: self.line_nr,
                reason: format!("expected '{expected}', got '{token}'"),
                span: (offset, offset + token.len()),
            })
        }
    }

    fn consume(&mut self, expected: &str) -> Result<(usize, &'src str), Error> {
        let token = self.tokens.get(self.position).copied().ok_or_else(|| {
            Error::ParseError {
                line_nr: self.line_nr,
                reason: format!("expected {expected}, reached end of line"),
                span: (self.source.len(), self.source.len()),
            }
        })?;

        self.position += 1;
        Ok(token)
    }

    fn peek(&self) -> Option<(usize, &'src str)> {
        self.tokens.get(self.position).copied()
    }

    fn check_identifier<'a>(&self, name: &'a str, offset: usize) -> Result<&'a str, Error> {
        let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

        if starts_with_letter && name.chars().all(is_name_character) {
            Ok(name)
        } else {
            Err(Error::ParseError {
                line_nr: self.line_nr,
                reason: format!("'{name}' is not a valid identifier"),
                span: (offset, offset + name.len()),
            })
        }
    }

    fn error_at_current(&self, reason: &str) -> Error {
        let span = self
            .peek()
            .map(|(offset, token)| (offset, offset + token.len()))
            .unwrap_or((self.source.len(), self.source.len()));

        Error::ParseError {
            line_nr: self.line_nr,
            reason: reason.to_owned(),
            span,
        }
    }
}

fn parse_u64(token: &str) -> Option<u64> {
    token.strip_prefix('+').unwrap_or(token).parse().ok()
}
